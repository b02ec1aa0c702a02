use crate::TrackId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub total_distance_m: f64,
    /// Number of court positions recorded for the track.
    pub coverage_points: usize,
}

/// Snapshot of the accumulated metrics, keyed by ascending track id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub shuttle_max_speed_kmh: f64,
    pub players: BTreeMap<TrackId, PlayerSummary>,
}
