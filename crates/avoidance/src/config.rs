//! Avoidance configuration

use crate::detection::Detection;
use serde::{Deserialize, Serialize};

/// Avoidance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidanceConfig {
    /// Detections below this confidence are ignored
    pub confidence_threshold: f32,

    /// Labels treated as obstacles; empty means every label
    pub labels: Vec<String>,

    /// Log a per-object breakdown every N frames that contain detections
    pub log_every_frames: u64,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.45,
            labels: Vec::new(),
            log_every_frames: 30,
        }
    }
}

impl AvoidanceConfig {
    /// Whether a detection is an object of interest
    pub fn accepts(&self, detection: &Detection) -> bool {
        detection.confidence >= self.confidence_threshold
            && (self.labels.is_empty() || self.labels.iter().any(|l| l == &detection.label))
    }

    /// Drop detections that are not objects of interest, keeping input order
    pub fn filter(&self, detections: Vec<Detection>) -> Vec<Detection> {
        detections.into_iter().filter(|d| self.accepts(d)).collect()
    }
}
