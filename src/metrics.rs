//! Pipeline observability counters.
//!
//! Lock-free process-wide counters for the translation path: cache traffic,
//! translator calls and failures, rate-limiter denials. Observational only:
//! nothing in the pipeline branches on these values.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global pipeline metrics singleton.
pub struct PipelineMetrics {
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
    translator_calls: AtomicUsize,
    translator_failures: AtomicUsize,
    rate_limited: AtomicUsize,
}

static METRICS: OnceLock<PipelineMetrics> = OnceLock::new();

impl PipelineMetrics {
    /// Get the global metrics instance.
    pub fn global() -> &'static PipelineMetrics {
        METRICS.get_or_init(|| PipelineMetrics {
            cache_hits: AtomicUsize::new(0),
            cache_misses: AtomicUsize::new(0),
            translator_calls: AtomicUsize::new(0),
            translator_failures: AtomicUsize::new(0),
            rate_limited: AtomicUsize::new(0),
        })
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translator_call(&self) {
        self.translator_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translator_failure(&self) {
        self.translator_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn translator_calls(&self) -> usize {
        self.translator_calls.load(Ordering::Relaxed)
    }

    pub fn translator_failures(&self) -> usize {
        self.translator_failures.load(Ordering::Relaxed)
    }

    pub fn rate_limited(&self) -> usize {
        self.rate_limited.load(Ordering::Relaxed)
    }

    /// Generate a snapshot report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let lookups = hits + misses;
        let cache_hit_rate = if lookups > 0 {
            (hits as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        let calls = self.translator_calls();
        let failures = self.translator_failures();
        let translator_success_rate = if calls > 0 {
            ((calls - failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            translator_calls: calls,
            translator_failures: failures,
            translator_success_rate,
            rate_limited: self.rate_limited(),
        }
    }

    /// Reset all counters to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.translator_calls.store(0, Ordering::Relaxed);
        self.translator_failures.store(0, Ordering::Relaxed);
        self.rate_limited.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of the pipeline counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,
    pub translator_calls: usize,
    pub translator_failures: usize,
    /// Translator success rate as a percentage (0-100)
    pub translator_success_rate: f64,
    pub rate_limited: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn reset_metrics() {
        PipelineMetrics::global().reset();
    }

    #[test]
    #[serial]
    fn test_counters_increment() {
        reset_metrics();
        let metrics = PipelineMetrics::global();

        metrics.record_cache_hit();
        metrics.record_cache_miss();
        metrics.record_translator_call();
        metrics.record_translator_failure();
        metrics.record_rate_limited();

        assert_eq!(metrics.cache_hits(), 1);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.translator_calls(), 1);
        assert_eq!(metrics.translator_failures(), 1);
        assert_eq!(metrics.rate_limited(), 1);
    }

    #[test]
    #[serial]
    fn test_report_rates() {
        reset_metrics();
        let metrics = PipelineMetrics::global();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_miss();

        // 4 calls, 1 failure = 75% success rate
        for _ in 0..4 {
            metrics.record_translator_call();
        }
        metrics.record_translator_failure();

        let report = metrics.report();
        assert_eq!(report.cache_hit_rate, 75.0);
        assert_eq!(report.translator_success_rate, 75.0);
    }

    #[test]
    #[serial]
    fn test_report_empty() {
        reset_metrics();
        let report = PipelineMetrics::global().report();

        assert_eq!(report.cache_hits, 0);
        assert_eq!(report.cache_hit_rate, 0.0);
        assert_eq!(report.translator_success_rate, 0.0);
        assert_eq!(report.rate_limited, 0);
    }

    #[test]
    #[serial]
    fn test_global_returns_same_instance() {
        let m1 = PipelineMetrics::global();
        let m2 = PipelineMetrics::global();
        assert!(std::ptr::eq(m1, m2));
    }
}
