//! Per-frame avoidance policy

use crate::detection::{BoundingBox, Detection};
use crate::proximity::{classify_proximity, ProximityBand};
use crate::zone::{classify_zone, Zone};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Discrete steering decision for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvoidanceAction {
    MoveForward,
    TurnLeft,
    TurnRight,
    SlowDown,
    Stop,
}

impl AvoidanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvoidanceAction::MoveForward => "MOVE_FORWARD",
            AvoidanceAction::TurnLeft => "TURN_LEFT",
            AvoidanceAction::TurnRight => "TURN_RIGHT",
            AvoidanceAction::SlowDown => "SLOW_DOWN",
            AvoidanceAction::Stop => "STOP",
        }
    }

    /// Human-readable left/right duty split for operator logs
    pub fn motor_summary(&self) -> &'static str {
        match self {
            AvoidanceAction::MoveForward => "Motors: Left=100%, Right=100%",
            AvoidanceAction::TurnLeft => "Motors: Left=30%, Right=100%",
            AvoidanceAction::TurnRight => "Motors: Left=100%, Right=30%",
            AvoidanceAction::SlowDown => "Motors: Left=50%, Right=50%",
            AvoidanceAction::Stop => "Motors: Left=0%, Right=0%",
        }
    }
}

impl fmt::Display for AvoidanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy output: the action and why it was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: AvoidanceAction,
    pub reason: String,
}

impl Decision {
    fn new(action: AvoidanceAction, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }
}

/// One classified detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    pub label: &'a str,
    pub band: ProximityBand,
    pub bbox: &'a BoundingBox,
}

/// Detections of one frame grouped by zone, input order preserved
#[derive(Debug, Clone, Default)]
pub struct FrameObservation<'a> {
    pub left: Vec<Observation<'a>>,
    pub center: Vec<Observation<'a>>,
    pub right: Vec<Observation<'a>>,
}

impl<'a> FrameObservation<'a> {
    /// Classify every detection and group it by zone
    pub fn classify(detections: &'a [Detection], image_width: u32) -> Self {
        let mut observation = Self::default();
        for detection in detections {
            let zone = classify_zone(&detection.bbox, image_width);
            observation.zone_mut(zone).push(Observation {
                label: &detection.label,
                band: classify_proximity(&detection.bbox),
                bbox: &detection.bbox,
            });
        }
        observation
    }

    pub fn zone(&self, zone: Zone) -> &[Observation<'a>] {
        match zone {
            Zone::Left => &self.left,
            Zone::Center => &self.center,
            Zone::Right => &self.right,
        }
    }

    fn zone_mut(&mut self, zone: Zone) -> &mut Vec<Observation<'a>> {
        match zone {
            Zone::Left => &mut self.left,
            Zone::Center => &mut self.center,
            Zone::Right => &mut self.right,
        }
    }

    /// Most urgent center obstacle; the first one wins on ties
    pub fn nearest_center(&self) -> Option<&Observation<'a>> {
        self.center.iter().fold(None, |best, candidate| match best {
            Some(current) if candidate.band <= current.band => Some(current),
            _ => Some(candidate),
        })
    }

    fn has_urgent(&self, zone: Zone) -> bool {
        self.zone(zone).iter().any(|o| o.band.is_urgent())
    }
}

/// Pick one avoidance action for a frame.
///
/// Rules are checked in priority order and the first match wins:
/// center obstacles, then close obstacles on the left, then on the right.
/// The caller must have validated the frame (see [`crate::validate_frame`]).
pub fn decide(detections: &[Detection], image_width: u32) -> Decision {
    if detections.is_empty() {
        return Decision::new(AvoidanceAction::MoveForward, "no obstacles detected");
    }

    let frame = FrameObservation::classify(detections, image_width);
    debug!(
        left = frame.left.len(),
        center = frame.center.len(),
        right = frame.right.len(),
        "Classified frame"
    );

    if let Some(nearest) = frame.nearest_center() {
        if !nearest.band.is_urgent() {
            return Decision::new(
                AvoidanceAction::SlowDown,
                format!("{} detected ahead - slowing down", nearest.label),
            );
        }

        // Equal counts go right.
        return if frame.left.len() < frame.right.len() {
            Decision::new(
                AvoidanceAction::TurnLeft,
                format!("avoiding {} in center - turning left", nearest.label),
            )
        } else {
            Decision::new(
                AvoidanceAction::TurnRight,
                format!("avoiding {} in center - turning right", nearest.label),
            )
        };
    }

    if frame.has_urgent(Zone::Left) {
        return Decision::new(AvoidanceAction::TurnRight, "obstacle on left - turning right");
    }

    if frame.has_urgent(Zone::Right) {
        return Decision::new(AvoidanceAction::TurnLeft, "obstacle on right - turning left");
    }

    Decision::new(AvoidanceAction::MoveForward, "path clear")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: u32 = 600;

    /// Square box centred at `x_center` with the given area
    fn object(label: &str, x_center: f32, area: f32) -> Detection {
        let side = area.sqrt();
        Detection::new(
            label,
            BoundingBox::new(x_center - side / 2.0, 0.0, side, side),
            0.9,
        )
    }

    fn left(area: f32) -> Detection {
        object("left", 60.0, area)
    }

    fn center(label: &str, area: f32) -> Detection {
        object(label, 300.0, area)
    }

    fn right(area: f32) -> Detection {
        object("right", 540.0, area)
    }

    #[test]
    fn test_empty_frame_moves_forward() {
        assert_eq!(
            decide(&[], WIDTH),
            Decision::new(AvoidanceAction::MoveForward, "no obstacles detected")
        );
    }

    #[test]
    fn test_center_very_close_turns_to_emptier_left() {
        let detections = vec![center("person", 60_000.0), right(1_000.0)];
        assert_eq!(decide(&detections, WIDTH).action, AvoidanceAction::TurnLeft);
    }

    #[test]
    fn test_center_very_close_tie_turns_right() {
        let detections = vec![left(1_000.0), center("person", 60_000.0), right(1_000.0)];
        let decision = decide(&detections, WIDTH);
        assert_eq!(decision.action, AvoidanceAction::TurnRight);
        assert_eq!(decision.reason, "avoiding person in center - turning right");

        let alone = vec![center("person", 60_000.0)];
        assert_eq!(decide(&alone, WIDTH).action, AvoidanceAction::TurnRight);
    }

    #[test]
    fn test_center_medium_slows_down() {
        let decision = decide(&[center("dog", 20_000.0)], WIDTH);
        assert_eq!(decision.action, AvoidanceAction::SlowDown);
        assert_eq!(decision.reason, "dog detected ahead - slowing down");
    }

    #[test]
    fn test_center_far_slows_down_even_with_close_sides() {
        let detections = vec![left(40_000.0), center("cat", 100.0)];
        assert_eq!(decide(&detections, WIDTH).action, AvoidanceAction::SlowDown);
    }

    #[test]
    fn test_most_urgent_center_object_is_chosen() {
        let detections = vec![
            center("bottle", 100.0),
            center("chair", 40_000.0),
            center("table", 35_000.0),
        ];
        let decision = decide(&detections, WIDTH);
        assert_eq!(decision.action, AvoidanceAction::TurnRight);
        assert!(decision.reason.contains("chair"));
    }

    #[test]
    fn test_center_tie_keeps_first_in_input_order() {
        let detections = vec![center("first", 35_000.0), center("second", 40_000.0)];
        let frame = FrameObservation::classify(&detections, WIDTH);
        assert_eq!(frame.nearest_center().map(|o| o.label), Some("first"));
    }

    #[test]
    fn test_close_left_turns_right() {
        let decision = decide(&[left(35_000.0)], WIDTH);
        assert_eq!(decision.action, AvoidanceAction::TurnRight);
        assert_eq!(decision.reason, "obstacle on left - turning right");
    }

    #[test]
    fn test_close_right_turns_left() {
        let decision = decide(&[right(55_000.0)], WIDTH);
        assert_eq!(decision.action, AvoidanceAction::TurnLeft);
    }

    #[test]
    fn test_left_checked_before_right() {
        let detections = vec![right(55_000.0), left(35_000.0)];
        assert_eq!(decide(&detections, WIDTH).action, AvoidanceAction::TurnRight);
    }

    #[test]
    fn test_distant_sides_path_clear() {
        let detections = vec![left(10_000.0), right(20_000.0)];
        assert_eq!(
            decide(&detections, WIDTH),
            Decision::new(AvoidanceAction::MoveForward, "path clear")
        );
    }

    #[test]
    fn test_same_frame_same_decision() {
        let detections = vec![left(35_000.0), right(1.0)];
        assert_eq!(decide(&detections, WIDTH), decide(&detections, WIDTH));
    }
}
