//! Proximity banding by apparent size

use crate::detection::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Area (px²) above which an object is very close
pub const VERY_CLOSE_AREA: f64 = 50_000.0;
/// Area (px²) above which an object is close
pub const CLOSE_AREA: f64 = 30_000.0;
/// Area (px²) above which an object is at medium range
pub const MEDIUM_AREA: f64 = 15_000.0;

/// Coarse distance estimate, ordered by increasing urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProximityBand {
    Far,
    Medium,
    Close,
    VeryClose,
}

impl ProximityBand {
    /// Close enough to require steering away
    pub fn is_urgent(&self) -> bool {
        matches!(self, ProximityBand::Close | ProximityBand::VeryClose)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProximityBand::Far => "FAR",
            ProximityBand::Medium => "MEDIUM",
            ProximityBand::Close => "CLOSE",
            ProximityBand::VeryClose => "VERY_CLOSE",
        }
    }
}

impl fmt::Display for ProximityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a box by area. Each threshold is an exclusive lower bound.
pub fn classify_proximity(bbox: &BoundingBox) -> ProximityBand {
    let area = bbox.area();
    if area > VERY_CLOSE_AREA {
        ProximityBand::VeryClose
    } else if area > CLOSE_AREA {
        ProximityBand::Close
    } else if area > MEDIUM_AREA {
        ProximityBand::Medium
    } else {
        ProximityBand::Far
    }
}
