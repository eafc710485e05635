//! Cancellable one-shot tick timer.

use std::future;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Holds at most one pending tick deadline.
///
/// `fired` is cancel-safe: dropping it (for example when another
/// `select!` branch wins) leaves the deadline armed, and the deadline is only
/// cleared once it has actually elapsed.
#[derive(Debug, Default)]
pub struct TickTimer {
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next tick `after` from now, replacing any pending one.
    pub fn arm(&mut self, after: Duration) {
        self.deadline = Some(Instant::now() + after);
    }

    /// Drop the pending tick. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves when the armed deadline passes; never resolves while disarmed.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => future::pending::<()>().await,
        }
    }
}
