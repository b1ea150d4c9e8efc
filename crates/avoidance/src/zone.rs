//! Lateral zone classification

use crate::detection::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Horizontal third of the image an object sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Left,
    Center,
    Right,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Left => "LEFT",
            Zone::Center => "CENTER",
            Zone::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a box by its horizontal center.
///
/// `image_width` must be non-zero; boundaries belong to the zone on their
/// right.
pub fn classify_zone(bbox: &BoundingBox, image_width: u32) -> Zone {
    debug_assert!(image_width > 0, "image width must be positive");

    let width = image_width as f64;
    let x_center = bbox.x_center();
    if x_center < width / 3.0 {
        Zone::Left
    } else if x_center < 2.0 * width / 3.0 {
        Zone::Center
    } else {
        Zone::Right
    }
}
