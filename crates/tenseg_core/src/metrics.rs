//! Performance metrics collection for the kernel.
//!
//! Provides structured logging and counters for monitoring tick
//! throughput and behavior activity across instances.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Global metrics collector for kernel statistics.
pub struct Metrics {
    tick_count: AtomicU64,
    interval_count: AtomicU64,
    face_count: AtomicU64,
    behavior_passes: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Creates a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            interval_count: AtomicU64::new(0),
            face_count: AtomicU64::new(0),
            behavior_passes: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick batch with the instance's live counts.
    pub fn record_iterate(&self, ticks: u64, intervals: usize, faces: usize) {
        let total = self.tick_count.fetch_add(ticks, Ordering::Relaxed) + ticks;
        self.interval_count
            .store(intervals as u64, Ordering::Relaxed);
        self.face_count.store(faces as u64, Ordering::Relaxed);

        if total.is_multiple_of(10_000) {
            tracing::info!(
                ticks = total,
                intervals = intervals,
                faces = faces,
                "Simulation progress"
            );
        }
    }

    /// Records one behavior application pass.
    pub fn record_behavior(&self, visited: usize) {
        self.behavior_passes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(visited, "Behavior pass recorded");
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Total ticks recorded so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    /// Behavior passes recorded so far.
    #[must_use]
    pub fn behavior_passes(&self) -> u64 {
        self.behavior_passes.load(Ordering::Relaxed)
    }

    /// Elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.behavior_passes(), 0);
    }

    #[test]
    fn test_record_iterate_accumulates_ticks() {
        let metrics = Metrics::new();
        metrics.record_iterate(40, 12, 4);
        metrics.record_iterate(60, 12, 4);
        assert_eq!(metrics.tick_count(), 100);
    }

    #[test]
    fn test_record_behavior() {
        let metrics = Metrics::new();
        metrics.record_behavior(8);
        metrics.record_behavior(8);
        assert_eq!(metrics.behavior_passes(), 2);
    }
}
