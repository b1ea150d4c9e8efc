//! Obstacle Avoidance
//!
//! Turns one frame of object detections into a single steering decision:
//! - Lateral zone classification (left / center / right third of the image)
//! - Proximity banding by apparent bounding-box area
//! - Priority policy picking one avoidance action per frame
//!
//! The policy is frame-local: no state is carried between frames.

pub mod config;
pub mod detection;
pub mod policy;
pub mod proximity;
pub mod zone;

pub use config::AvoidanceConfig;
pub use detection::{validate_frame, BoundingBox, Detection, Frame};
pub use policy::{decide, AvoidanceAction, Decision, FrameObservation, Observation};
pub use proximity::{classify_proximity, ProximityBand};
pub use zone::{classify_zone, Zone};

use thiserror::Error;

/// Avoidance error types
#[derive(Error, Debug, PartialEq)]
pub enum AvoidanceError {
    #[error("Invalid image width: {0}")]
    InvalidImageWidth(u32),

    #[error("Invalid bounding box for {label}: {width}x{height}")]
    InvalidBoundingBox {
        label: String,
        width: f32,
        height: f32,
    },
}
