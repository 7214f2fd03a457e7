use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

// ─── ProgressSource ───────────────────────────────────────────────────────

/// Source of the "completed tasks" count the watcher polls.
///
/// Implemented for any `Fn() -> usize` closure, so callers usually pass
/// something like `move || ledger.completed()`.
pub trait ProgressSource: Send + Sync {
    fn completed(&self) -> usize;
}

impl<F> ProgressSource for F
where
    F: Fn() -> usize + Send + Sync,
{
    fn completed(&self) -> usize {
        self()
    }
}

// ─── WatchTiming ──────────────────────────────────────────────────────────

/// Poll interval, the grace period granted after progress is seen, and how
/// long a terminated child may take to exit before it is killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchTiming {
    pub poll: Duration,
    pub grace: Duration,
    pub kill_after: Duration,
}

impl Default for WatchTiming {
    fn default() -> Self {
        Self {
            poll: Duration::from_secs(2),
            grace: Duration::from_secs(3),
            kill_after: Duration::from_secs(5),
        }
    }
}

// ─── watch ────────────────────────────────────────────────────────────────

/// Poll `progress` until the count rises above `baseline`, then wait out the
/// grace period so the child can finish its final write.
///
/// Returns `true` when the caller should terminate the child, `false` when
/// `stop` was cancelled first (child already exited, or an interrupt).
pub(crate) async fn watch(
    progress: Arc<dyn ProgressSource>,
    baseline: usize,
    timing: WatchTiming,
    stop: CancellationToken,
) -> bool {
    loop {
        tokio::select! {
            _ = stop.cancelled() => return false,
            _ = tokio::time::sleep(timing.poll) => {}
        }

        let completed = progress.completed();
        if completed > baseline {
            tracing::info!(baseline, completed, "task completion detected");
            break;
        }
    }

    tokio::select! {
        _ = stop.cancelled() => false,
        _ = tokio::time::sleep(timing.grace) => true,
    }
}
