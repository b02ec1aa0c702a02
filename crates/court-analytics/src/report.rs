use crate::AnalyticsIoError;
use court_analytics_events::RallySegment;
use court_analytics_metrics::MetricsSummary;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// End-of-stream analytics consumed by the coaching report writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub frames_processed: u64,
    /// False when the session never calibrated; court statistics are then zero.
    pub calibrated: bool,
    pub metrics: MetricsSummary,
    pub rallies: Vec<RallySegment>,
}

impl MatchReport {
    /// Total committed rally time in seconds.
    pub fn total_rally_seconds(&self) -> f64 {
        self.rallies.iter().map(|r| r.duration_seconds).sum()
    }

    /// One-line human summary.
    pub fn summary_line(&self) -> String {
        let distance: f64 = self
            .metrics
            .players
            .values()
            .map(|p| p.total_distance_m)
            .sum();
        let mut line = format!(
            "{} frames, {} players, {:.1} m covered, {} rallies ({:.1}s)",
            self.frames_processed,
            self.metrics.players.len(),
            distance,
            self.rallies.len(),
            self.total_rally_seconds()
        );
        let peak = self.metrics.shuttle_max_speed_kmh;
        line += &format!(", peak shuttle {peak:.1} km/h");
        if !self.calibrated {
            line += " [uncalibrated]";
        }
        line
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, AnalyticsIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
