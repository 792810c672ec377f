use crate::state::ItemOutcome;
use chrono::{DateTime, Utc};

/// A search result that could not be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    /// Item identifier, or the raw detail URL when no identifier was found
    pub id: String,
    pub outcome: ItemOutcome,
    pub error: String,
}

/// Running totals for one crawl of one search term
#[derive(Debug, Clone)]
pub struct CrawlProgress {
    pub search_term: String,

    /// Result count reported by the last search page
    pub total_reported: u64,

    /// Search pages whose items were processed
    pub pages_walked: u32,

    /// Search results seen across all pages
    pub items_seen: u64,

    pub items_persisted: u64,
    pub failures: Vec<FailedItem>,

    /// Pacing pauses taken
    pub pauses: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlProgress {
    pub fn new(search_term: &str) -> Self {
        Self {
            search_term: search_term.to_string(),
            total_reported: 0,
            pages_walked: 0,
            items_seen: 0,
            items_persisted: 0,
            failures: Vec::new(),
            pauses: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Records the outcome of one item
    pub fn record(&mut self, id: &str, outcome: ItemOutcome, error: Option<String>) {
        self.items_seen += 1;

        if outcome.is_error() {
            self.failures.push(FailedItem {
                id: id.to_string(),
                outcome,
                error: error.unwrap_or_default(),
            });
        } else {
            self.items_persisted += 1;
        }
    }

    pub fn items_failed(&self) -> u64 {
        self.failures.len() as u64
    }

    /// Number of failed items with the given outcome
    pub fn count(&self, outcome: ItemOutcome) -> u64 {
        if outcome == ItemOutcome::Persisted {
            return self.items_persisted;
        }
        self.failures.iter().filter(|f| f.outcome == outcome).count() as u64
    }

    /// Fraction of seen items that were persisted (1.0 when nothing was seen)
    pub fn success_rate(&self) -> f64 {
        if self.items_seen == 0 {
            return 1.0;
        }
        self.items_persisted as f64 / self.items_seen as f64
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the crawl in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}
