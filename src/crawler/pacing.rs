//! Pacing policies for outbound detail requests
//!
//! The page walker asks its policy, after every item, whether to pause before
//! the next one. Swapping the policy changes the request rate without touching
//! the crawl loop.

use crate::config::CrawlerConfig;
use std::time::Duration;

/// Decides the delay injected between items on a page
pub trait PacingPolicy: Send {
    /// Pause to take after the item at `index` (0-based, within the current page)
    fn delay_after(&mut self, index: usize) -> Option<Duration>;
}

/// Pauses for a fixed interval after every `batch_size` items
///
/// With a batch size of 10, a 25-item page pauses after indices 9 and 19.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBatchPacing {
    batch_size: usize,
    interval: Duration,
}

impl FixedBatchPacing {
    /// Creates a batch pacing policy; a batch size of 0 is treated as 1
    pub fn new(batch_size: usize, interval: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            interval,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.pacing_batch_size as usize, config.pacing_interval())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl PacingPolicy for FixedBatchPacing {
    fn delay_after(&mut self, index: usize) -> Option<Duration> {
        ((index + 1) % self.batch_size == 0).then_some(self.interval)
    }
}

/// Never pauses
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl PacingPolicy for NoPacing {
    fn delay_after(&mut self, _index: usize) -> Option<Duration> {
        None
    }
}
