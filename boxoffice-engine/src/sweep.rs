use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use crate::engine::AllocationEngine;

/// Handle on the running expiry sweep: the stop signal and the task.
pub(crate) struct SweeperHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweep to stop and waits up to `grace` for it to exit.
    pub(crate) async fn stop(self, grace: Duration) {
        let _ = self.stop.send(true);
        match timeout(grace, self.task).await {
            Ok(Ok(())) => info!("expiry sweep stopped"),
            Ok(Err(join_error)) => warn!(%join_error, "expiry sweep task failed"),
            Err(_) => warn!("timed out waiting for the expiry sweep to stop"),
        }
    }
}

/// Spawns the background expiry sweep for the engine.
pub(crate) fn spawn(engine: Arc<AllocationEngine>) -> SweeperHandle {
    let (stop, stop_rx) = watch::channel(false);
    let task = tokio::spawn(run(engine, stop_rx));
    SweeperHandle { stop, task }
}

/// Sweep loop: one expiry cycle per poll interval until stopped.
///
/// A cycle never surfaces an error to foreground callers; anything odd is
/// logged inside the cycle and the loop carries on.
async fn run(engine: Arc<AllocationEngine>, mut stop: watch::Receiver<bool>) {
    let interval = engine.sweep_interval();
    info!(interval_ms = interval.as_millis() as u64, "expiry sweep started");

    loop {
        tokio::select! {
            _ = sleep(interval) => {
                engine.sweep_expired();
            }
            changed = stop.changed() => {
                // a send or a dropped sender both mean we are done
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }
}
