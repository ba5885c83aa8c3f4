use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::domain::TransferDirection;

/// Snapshot handed to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub direction: TransferDirection,
    pub transferred: u64,
    pub total: Option<u64>,
}

impl ProgressEvent {
    /// Completion percentage when the total is known.
    #[must_use]
    pub fn percent(&self) -> Option<u64> {
        let total = self.total?;
        if total == 0 {
            return Some(100);
        }
        let scaled = u128::from(self.transferred.min(total))
            .saturating_mul(100)
            .checked_div(u128::from(total))
            .unwrap_or(0);
        Some(u64::try_from(scaled).unwrap_or(100))
    }
}

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Per-attempt transfer state; owned by the attempt and dropped with it.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    direction: TransferDirection,
    transferred: u64,
    total: Option<u64>,
    started: Instant,
}

impl TransferProgress {
    #[must_use]
    pub fn start(direction: TransferDirection, total: Option<u64>) -> Self {
        Self {
            direction,
            transferred: 0,
            total,
            started: Instant::now(),
        }
    }

    /// Records `bytes` more and returns the resulting snapshot.
    pub fn advance(&mut self, bytes: u64) -> ProgressEvent {
        self.transferred = self.transferred.saturating_add(bytes);
        self.event()
    }

    #[must_use]
    pub const fn event(&self) -> ProgressEvent {
        ProgressEvent {
            direction: self.direction,
            transferred: self.transferred,
            total: self.total,
        }
    }

    #[must_use]
    pub const fn transferred(&self) -> u64 {
        self.transferred
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Forwards `event` when the total size has been advertised.
pub(super) fn notify(progress: Option<&ProgressCallback>, event: ProgressEvent) {
    if event.total.is_none() {
        return;
    }
    if let Some(callback) = progress {
        callback(event);
    }
}
