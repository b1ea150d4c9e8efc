//! Command Dispatcher Implementation

use crate::command::MovementCommand;
use crate::config::DispatchConfig;
use crate::DispatchError;
use motor_protocol::{encode_drive, open_port, MotorError, SerialConfig};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Counters reported by the send task when it exits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Ticks whose packet pair was written successfully
    pub ticks_sent: u64,
    /// Ticks whose write failed or timed out
    pub write_failures: u64,
    /// Whether the final stop frame reached the sink
    pub final_stop_sent: bool,
}

/// Cheap, cloneable writer for the current movement command.
///
/// Writes never block and never queue: the send task only ever sees the
/// most recent value.
#[derive(Debug, Clone)]
pub struct CommandHandle {
    tx: Arc<watch::Sender<MovementCommand>>,
}

impl CommandHandle {
    /// Replace the current command
    pub fn set(&self, command: MovementCommand) {
        let previous = self.tx.send_replace(command);
        if previous != command {
            debug!("Command {} -> {}", previous, command);
        }
    }

    /// Reset to idle
    pub fn stop(&self) {
        self.set(MovementCommand::Idle);
    }

    /// Command the next tick will send
    pub fn current(&self) -> MovementCommand {
        *self.tx.borrow()
    }
}

/// Owns the background send task and, through it, the serial sink
pub struct CommandDispatcher {
    handle: CommandHandle,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<DispatchStats>,
}

impl CommandDispatcher {
    /// Start the send loop over `sink`.
    ///
    /// Must be called from within a tokio runtime. The loop sends the
    /// current command every tick until [`shutdown`](Self::shutdown) is
    /// called or the dispatcher is dropped, then sends one stop frame and
    /// releases the sink.
    pub fn spawn<W>(config: DispatchConfig, sink: W) -> Result<Self, DispatchError>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        config.validate()?;

        let (command_tx, command_rx) = watch::channel(MovementCommand::Idle);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            "Starting command dispatcher: address {}, {} ms tick, speed {}",
            config.address, config.tick_ms, config.speed
        );
        let task = tokio::spawn(send_loop(config, sink, command_rx, shutdown_rx));

        Ok(Self {
            handle: CommandHandle {
                tx: Arc::new(command_tx),
            },
            shutdown_tx,
            task,
        })
    }

    /// Open the controller's serial port and start the send loop on it.
    ///
    /// Returns the device path that was opened.
    pub fn connect(
        config: DispatchConfig,
        serial: &SerialConfig,
    ) -> Result<(Self, String), DispatchError> {
        config.validate()?;
        let (port, stream) = open_port(serial)?;
        let dispatcher = Self::spawn(config, stream)?;
        Ok((dispatcher, port))
    }

    /// Handle for command sources
    pub fn handle(&self) -> CommandHandle {
        self.handle.clone()
    }

    /// Stop the robot and wait for the send task to release the sink
    pub async fn shutdown(self) -> Result<DispatchStats, DispatchError> {
        info!("Stopping command dispatcher");
        self.handle.stop();
        // The task may already have exited; the join below reports that.
        let _ = self.shutdown_tx.send(true);

        self.task
            .await
            .map_err(|e| DispatchError::Task(e.to_string()))
    }
}

/// Encode `command` and write it as one motor A + motor B frame
async fn send_frame<W>(
    sink: &mut W,
    config: &DispatchConfig,
    command: MovementCommand,
) -> Result<(), MotorError>
where
    W: AsyncWrite + Unpin,
{
    let (left, right) = command.motor_speeds(config.speed);
    let frame = encode_drive(config.address, left, right);
    let write = async {
        sink.write_all(&frame).await?;
        sink.flush().await
    };

    // A write may take at most one tick.
    match time::timeout(config.tick_period(), write).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(MotorError::Timeout(config.tick_ms)),
    }
}

async fn send_loop<W>(
    config: DispatchConfig,
    mut sink: W,
    command_rx: watch::Receiver<MovementCommand>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> DispatchStats
where
    W: AsyncWrite + Unpin,
{
    let mut stats = DispatchStats::default();
    let mut ticker = time::interval(config.tick_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            // Fires on an explicit shutdown and when the dispatcher is dropped.
            _ = shutdown_rx.changed() => break,
            _ = ticker.tick() => {
                let command = *command_rx.borrow();
                match send_frame(&mut sink, &config, command).await {
                    Ok(()) => {
                        stats.ticks_sent += 1;
                        debug!("Sent {} frame", command);
                    }
                    Err(e) => {
                        stats.write_failures += 1;
                        warn!("Failed to send {} frame ({} failures): {}",
                            command, stats.write_failures, e);
                    }
                }
            }
        }
    }

    match send_frame(&mut sink, &config, MovementCommand::Idle).await {
        Ok(()) => stats.final_stop_sent = true,
        Err(e) => error!("Failed to send final stop frame: {}", e),
    }
    match time::timeout(config.tick_period(), sink.shutdown()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to close motor link: {}", e),
        Err(_) => warn!("Timed out closing motor link"),
    }
    drop(sink);

    info!(
        "Command dispatcher stopped after {} ticks ({} failed)",
        stats.ticks_sent, stats.write_failures
    );
    stats
}
