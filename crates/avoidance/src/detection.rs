//! Detector output consumed by the avoidance policy

use crate::AvoidanceError;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Box area in square pixels
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Horizontal center in pixels
    pub fn x_center(&self) -> f64 {
        self.x as f64 + self.width as f64 / 2.0
    }
}

/// Detected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box [x, y, width, height]
    pub bbox: BoundingBox,

    /// Class label from the detector
    pub label: String,

    /// Detection confidence in [0, 1]
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence,
        }
    }
}

/// One frame of detector output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame width in pixels
    pub image_width: u32,

    /// Objects of interest in this frame
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl Frame {
    /// Check the frame satisfies the classifiers' preconditions
    pub fn validate(&self) -> Result<(), AvoidanceError> {
        validate_frame(&self.detections, self.image_width)
    }
}

/// Reject frames the classifiers are not defined for: a zero image width,
/// or any box with a negative or non-finite dimension.
pub fn validate_frame(detections: &[Detection], image_width: u32) -> Result<(), AvoidanceError> {
    if image_width == 0 {
        return Err(AvoidanceError::InvalidImageWidth(image_width));
    }

    for detection in detections {
        let bbox = &detection.bbox;
        let dims_ok = bbox.width.is_finite()
            && bbox.height.is_finite()
            && bbox.x.is_finite()
            && bbox.width >= 0.0
            && bbox.height >= 0.0;
        if !dims_ok {
            return Err(AvoidanceError::InvalidBoundingBox {
                label: detection.label.clone(),
                width: bbox.width,
                height: bbox.height,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_rejected() {
        assert_eq!(
            validate_frame(&[], 0),
            Err(AvoidanceError::InvalidImageWidth(0))
        );
    }

    #[test]
    fn test_negative_box_rejected() {
        let detections = vec![Detection::new(
            "chair",
            BoundingBox::new(10.0, 10.0, -5.0, 20.0),
            0.9,
        )];
        assert!(matches!(
            validate_frame(&detections, 640),
            Err(AvoidanceError::InvalidBoundingBox { .. })
        ));
    }

    #[test]
    fn test_valid_frame_passes() {
        let frame = Frame {
            image_width: 640,
            detections: vec![Detection::new(
                "person",
                BoundingBox::new(0.0, 0.0, 0.0, 0.0),
                0.5,
            )],
        };
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_frame_from_json() {
        let json = r#"{"image_width":640,"detections":[{"bbox":{"x":1,"y":2,"width":3,"height":4},"label":"cup","confidence":0.7}]}"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.image_width, 640);
        assert_eq!(frame.detections[0].label, "cup");
        assert_eq!(frame.detections[0].bbox.area(), 12.0);
    }
}
