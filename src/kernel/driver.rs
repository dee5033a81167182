/*!
 * Background Driver
 *
 * Timer-driven task that runs one kernel step per tick. Control goes
 * through a command channel; shutdown is an explicit message rather than a
 * flag, and a step that has started always runs to completion.
 */

use super::Kernel;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, trace, warn};

/// Control messages for the driver task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    /// Stop issuing steps on ticks
    Pause,
    /// Resume issuing steps on ticks
    Resume,
    /// Run one step now, regardless of pause state
    Trigger,
    /// Exit the driver loop
    Shutdown,
}

/// Handle to a running driver task
#[derive(Debug)]
pub struct DriverHandle {
    command_tx: mpsc::UnboundedSender<DriverCommand>,
    handle: Option<JoinHandle<u64>>,
}

impl Kernel {
    /// Spawn the background driver on the current tokio runtime
    pub fn run(&self, interval: Duration) -> DriverHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let kernel = self.clone();

        let handle = tokio::spawn(async move { run_driver_loop(kernel, interval, command_rx).await });

        info!(interval_ms = interval.as_millis() as u64, "Started simulation driver");

        DriverHandle {
            command_tx,
            handle: Some(handle),
        }
    }
}

impl DriverHandle {
    pub fn pause(&self) {
        self.send(DriverCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(DriverCommand::Resume);
    }

    pub fn trigger(&self) {
        self.send(DriverCommand::Trigger);
    }

    /// Whether the driver task is still alive
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the driver and wait for it to exit
    ///
    /// Returns the number of steps the driver executed.
    pub async fn shutdown(mut self) -> u64 {
        self.send(DriverCommand::Shutdown);

        match self.handle.take() {
            Some(handle) => match handle.await {
                Ok(steps) => {
                    info!(steps, "Stopped simulation driver");
                    steps
                }
                Err(e) => {
                    warn!(error = %e, "Driver task shutdown error");
                    0
                }
            },
            None => 0,
        }
    }

    fn send(&self, command: DriverCommand) {
        if self.command_tx.send(command).is_err() {
            trace!(?command, "Driver already stopped");
        }
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.command_tx.send(DriverCommand::Shutdown);
        }
    }
}

async fn run_driver_loop(
    kernel: Kernel,
    period: Duration,
    mut command_rx: mpsc::UnboundedReceiver<DriverCommand>,
) -> u64 {
    let mut active = true;
    let mut steps = 0u64;

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if active && kernel.step().is_some() {
                    steps += 1;
                }
            }

            command = command_rx.recv() => {
                match command {
                    Some(DriverCommand::Pause) => {
                        info!("Simulation driver paused");
                        active = false;
                    }
                    Some(DriverCommand::Resume) => {
                        info!("Simulation driver resumed");
                        active = true;
                    }
                    Some(DriverCommand::Trigger) => {
                        if kernel.step().is_some() {
                            steps += 1;
                        }
                    }
                    Some(DriverCommand::Shutdown) | None => break,
                }
            }
        }
    }

    steps
}
