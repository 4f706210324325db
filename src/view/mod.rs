pub mod display;
pub mod proxy;
pub mod source;
pub mod state;

pub use display::PredictionCard;
pub use proxy::ProxyClient;
pub use source::PredictionSource;
pub use state::{PredictionView, ViewSnapshot, ViewState};

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Owns the scheduled refresh task. Stopping or dropping it cancels the timer,
/// including a refresh that is still in flight.
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn stop(&self) {
        self.task.abort();
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the view's refresh loop: one fetch right away (the mount fetch),
/// then one per `interval` regardless of the current state.
pub fn spawn_refresh_loop(view: Arc<PredictionView>, interval: Duration) -> RefreshHandle {
    let task = tokio::spawn(async move {
        info!("Prediction refresh loop started (interval={:?})", interval);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            view.refresh().await;
        }
    });
    RefreshHandle { task }
}
