//! Query debouncer: collapses a burst of input into one effective query.
//!
//! Two states. Idle holds nothing; Pending holds the latest text and the
//! instant its quiet period ends. `submit` always lands in Pending with a
//! fresh deadline, replacing whatever was there.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::trace;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct Pending {
    text: String,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Records `text` and restarts the quiet period. Any earlier pending text
    /// is superseded and will never be emitted.
    pub fn submit(&mut self, text: impl Into<String>) {
        let next = Pending {
            text: text.into(),
            deadline: Instant::now() + self.quiet,
        };
        if let Some(prev) = self.pending.replace(next) {
            trace!("Debounce superseded {:?}", prev.text);
        }
    }

    /// Resolves with the effective query once the quiet period elapses.
    /// Never resolves while idle. Cancel-safe: dropping the future before it
    /// resolves leaves the pending text in place.
    pub async fn effective(&mut self) -> String {
        let Some(deadline) = self.pending.as_ref().map(|p| p.deadline) else {
            return std::future::pending().await;
        };
        sleep_until(deadline).await;
        match self.pending.take() {
            Some(p) => p.text,
            None => std::future::pending().await,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::{sleep, timeout};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_quiet_period() {
        let mut d = Debouncer::default();
        let start = Instant::now();
        d.submit("React");
        assert_eq!(d.effective().await, "React");
        assert!(start.elapsed() >= DEFAULT_QUIET_PERIOD);
        assert!(timeout(Duration::from_secs(5), d.effective()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_text() {
        let mut d = Debouncer::default();
        let start = Instant::now();
        for text in ["R", "Re"] {
            d.submit(text);
            assert!(timeout(Duration::from_millis(100), d.effective())
                .await
                .is_err());
        }
        d.submit("Rea");
        assert_eq!(d.effective().await, "Rea");
        // 200ms of typing, then a full quiet period from the last keystroke.
        assert!(start.elapsed() >= Duration::from_millis(700));
        assert!(timeout(Duration::from_secs(5), d.effective()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_restarts_timer() {
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.submit("Go");
        sleep(Duration::from_millis(250)).await;
        d.submit("Go");
        let restarted = Instant::now();
        assert_eq!(d.effective().await, "Go");
        assert!(restarted.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_is_dispatched() {
        let mut d = Debouncer::default();
        d.submit("");
        assert_eq!(d.effective().await, "");
    }
}
