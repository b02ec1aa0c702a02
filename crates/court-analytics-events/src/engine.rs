use crate::{
    EventParams, EventParamsError, FrameObservation, RallySegment, RallySegmenter, RallyState,
    ShotClassifier, ShotFeatures, ShotType,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Rally segmentation plus shot classification, built from validated
/// [`EventParams`].
#[derive(Clone, Debug)]
pub struct EventEngine {
    params: EventParams,
    segmenter: RallySegmenter,
    classifier: ShotClassifier,
}

impl EventEngine {
    pub fn new(params: EventParams) -> Result<Self, EventParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            segmenter: RallySegmenter::new(
                params.min_rally_duration,
                params.absent_frames_to_close,
            ),
            classifier: ShotClassifier::new(params.smash_speed_threshold),
        })
    }

    #[inline]
    pub fn params(&self) -> &EventParams {
        &self.params
    }

    /// Feed one frame to the rally segmenter.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, obs), fields(frame = obs.frame_idx))
    )]
    pub fn update(&mut self, obs: &FrameObservation) -> Option<RallySegment> {
        self.segmenter.update(obs)
    }

    #[inline]
    pub fn rally_state(&self) -> RallyState {
        self.segmenter.state()
    }

    /// Committed rallies, in stream order.
    #[inline]
    pub fn rallies(&self) -> &[RallySegment] {
        self.segmenter.rallies()
    }

    pub fn classify(&self, features: &ShotFeatures) -> ShotType {
        self.classifier.classify(features)
    }
}
