//! Crawl pacing
//!
//! The upstream server is protected by a single rule: after every
//! `rate_interval` collected links the crawler pauses for a fixed time.
//! The count is global to a crawl and restarts after each pause.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Performs the pauses requested by a `RateBudget`
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// `Pacer` sleeping on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Counts collected links and says when a pause is due
///
/// The counter is atomic so workers sharing one budget still pause once per
/// `interval` links overall.
#[derive(Debug)]
pub struct RateBudget {
    interval: usize,
    pause: Duration,
    since_pause: AtomicUsize,
}

impl RateBudget {
    /// Creates a budget; `interval` must be at least 1
    pub fn new(interval: usize, pause: Duration) -> Self {
        Self {
            interval: interval.max(1),
            pause,
            since_pause: AtomicUsize::new(0),
        }
    }

    /// Records one collected link
    ///
    /// Returns the pause to take when this link completes an interval.
    pub fn record(&self) -> Option<Duration> {
        let interval = self.interval;
        let previous = self
            .since_pause
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                Some(if count + 1 >= interval { 0 } else { count + 1 })
            })
            .unwrap_or_else(|count| count);

        if previous + 1 >= interval {
            Some(self.pause)
        } else {
            None
        }
    }
}
