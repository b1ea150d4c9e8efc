//! Command sources feeding the dispatcher

use anyhow::Result;
use avoidance::{decide, AvoidanceConfig, AvoidanceError, Decision, Frame, FrameObservation, Zone};
use drive_dispatch::{map_line, CommandHandle, KeyInput, MovementCommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Manual control: one key per input line until `q` or end of input.
///
/// The command is reset to idle when input ends.
pub async fn run_manual<R>(input: R, handle: &CommandHandle) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    info!("Manual control: d=forward a=backward w=left s=right q=quit, anything else stops");

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match map_line(&line) {
            KeyInput::Quit => {
                info!("Quitting");
                break;
            }
            KeyInput::Command(command) => {
                handle.set(command);
                info!("Status: {}", command.status_label());
            }
        }
    }

    handle.stop();
    Ok(())
}

/// Filters, validates and decides one frame at a time
pub struct FrameProcessor {
    config: AvoidanceConfig,
    frame_count: u64,
}

impl FrameProcessor {
    pub fn new(config: AvoidanceConfig) -> Self {
        Self {
            config,
            frame_count: 0,
        }
    }

    /// Frames seen so far, rejected ones included
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn process(&mut self, frame: Frame) -> Result<Decision, AvoidanceError> {
        self.frame_count += 1;

        let detections = self.config.filter(frame.detections);
        avoidance::validate_frame(&detections, frame.image_width)?;
        let decision = decide(&detections, frame.image_width);

        let every = self.config.log_every_frames;
        if every > 0 && self.frame_count % every == 0 && !detections.is_empty() {
            info!(
                "Frame {}: {} objects | {} | {}",
                self.frame_count,
                detections.len(),
                decision.action,
                decision.action.motor_summary()
            );
            let observed = FrameObservation::classify(&detections, frame.image_width);
            for zone in [Zone::Left, Zone::Center, Zone::Right] {
                for object in observed.zone(zone) {
                    info!("  - {}: {} zone, {}", object.label, zone, object.band);
                }
            }
        }

        Ok(decision)
    }
}

/// Automatic control: one JSON frame per input line.
///
/// Unreadable or invalid frames stop the robot until the next good frame;
/// end of input stops it for good.
pub async fn run_avoidance<R>(input: R, handle: &CommandHandle, config: AvoidanceConfig) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut processor = FrameProcessor::new(config);
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let frame: Frame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Discarding unreadable frame: {}", e);
                handle.stop();
                continue;
            }
        };

        match processor.process(frame) {
            Ok(decision) => handle.set(MovementCommand::from(decision.action)),
            Err(e) => {
                warn!("Rejected frame {}: {}", processor.frame_count(), e);
                handle.stop();
            }
        }
    }

    info!("Detection input ended after {} frames", processor.frame_count());
    handle.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use avoidance::{AvoidanceAction, BoundingBox, Detection};
    use drive_dispatch::{CommandDispatcher, DispatchConfig};
    use tokio::io::BufReader;

    fn dispatcher() -> CommandDispatcher {
        CommandDispatcher::spawn(DispatchConfig::default(), tokio::io::sink()).unwrap()
    }

    fn frame_line(x: f32, width: f32, confidence: f32) -> String {
        serde_json::to_string(&Frame {
            image_width: 600,
            detections: vec![Detection::new(
                "person",
                BoundingBox::new(x, 0.0, width, width),
                confidence,
            )],
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_manual_keys_then_quit() {
        let dispatcher = dispatcher();
        let handle = dispatcher.handle();

        let input = BufReader::new(&b"d\nw\n"[..]);
        // Input ends without `q`, which counts as losing the source.
        run_manual(input, &handle).await.unwrap();
        assert_eq!(handle.current(), MovementCommand::Idle);

        let input = BufReader::new(&b"s\nq\nd\n"[..]);
        run_manual(input, &handle).await.unwrap();
        assert_eq!(handle.current(), MovementCommand::Idle);

        dispatcher.shutdown().await.unwrap();
    }

    #[test]
    fn test_processor_filters_low_confidence() {
        let mut processor = FrameProcessor::new(AvoidanceConfig::default());
        let frame: Frame = serde_json::from_str(&frame_line(200.0, 250.0, 0.2)).unwrap();
        let decision = processor.process(frame).unwrap();
        assert_eq!(decision.action, AvoidanceAction::MoveForward);
        assert_eq!(decision.reason, "no obstacles detected");
    }

    #[test]
    fn test_processor_rejects_bad_frame() {
        let mut processor = FrameProcessor::new(AvoidanceConfig::default());
        let frame = Frame {
            image_width: 0,
            detections: Vec::new(),
        };
        assert_eq!(
            processor.process(frame),
            Err(AvoidanceError::InvalidImageWidth(0))
        );
        assert_eq!(processor.frame_count(), 1);
    }

    #[test]
    fn test_center_obstacle_becomes_right_turn() {
        // A very close obstacle dead ahead, nothing on either side.
        let mut processor = FrameProcessor::new(AvoidanceConfig::default());
        let frame: Frame = serde_json::from_str(&frame_line(175.0, 250.0, 0.9)).unwrap();
        let decision = processor.process(frame).unwrap();
        assert_eq!(decision.action, AvoidanceAction::TurnRight);
        assert_eq!(MovementCommand::from(decision.action), MovementCommand::Right);
    }

    #[tokio::test]
    async fn test_avoidance_run_ends_idle() {
        let dispatcher = dispatcher();
        let handle = dispatcher.handle();

        let input = format!(
            "{}\n\nnot json\n{}\n",
            frame_line(175.0, 250.0, 0.9),
            frame_line(10.0, 20.0, 0.9)
        );
        run_avoidance(BufReader::new(input.as_bytes()), &handle, AvoidanceConfig::default())
            .await
            .unwrap();
        assert_eq!(handle.current(), MovementCommand::Idle);

        let stats = dispatcher.shutdown().await.unwrap();
        assert!(stats.final_stop_sent);
    }
}
