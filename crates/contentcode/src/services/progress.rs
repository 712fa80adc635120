//! Progress Reporter - Elapsed time, average latency and ETA across batches

use std::time::Duration;

/// Counters for a multi-batch run
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    processed: usize,
    batches: usize,
}

/// Snapshot after one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    /// One-based batch number
    pub batch: usize,
    pub processed: usize,
    pub total: usize,
    pub batch_elapsed: Duration,
    pub total_elapsed: Duration,
    pub average: Duration,
    pub remaining: Duration,
    pub percent_complete: f32,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            batches: 0,
        }
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Record a finished batch of `items` and derive the progress figures
    ///
    /// `total_elapsed` is measured from the start of the run.
    pub fn record_batch(
        &mut self,
        items: usize,
        batch_elapsed: Duration,
        total_elapsed: Duration,
    ) -> BatchProgress {
        self.batches += 1;
        self.processed += items;

        let average = if self.processed == 0 {
            Duration::ZERO
        } else {
            total_elapsed.div_f64(self.processed as f64)
        };
        let left = self.total.saturating_sub(self.processed);
        let percent_complete = if self.total == 0 {
            100.0
        } else {
            self.processed as f32 / self.total as f32 * 100.0
        };

        BatchProgress {
            batch: self.batches,
            processed: self.processed,
            total: self.total,
            batch_elapsed,
            total_elapsed,
            average,
            remaining: average.mul_f64(left as f64),
            percent_complete,
        }
    }
}

impl std::fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "batch {}: {}ms ({:.2}% complete, {:.2?} remaining)",
            self.batch,
            self.batch_elapsed.as_millis(),
            self.percent_complete,
            self.remaining
        )
    }
}
