//! Resolution metrics module.
//!
//! Tracks how validation messages were produced: from the catalog, from a
//! rule's default template, or not at all.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Counters for message resolution outcomes.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    /// Messages found in the catalog
    catalog_hits: AtomicUsize,

    /// Messages rendered from a rule's default template
    default_fallbacks: AtomicUsize,

    /// Resolutions that produced an empty message
    empty_results: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<ResolutionMetrics> = OnceLock::new();

impl ResolutionMetrics {
    /// Create a standalone set of counters, all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide metrics instance.
    pub fn global() -> &'static ResolutionMetrics {
        METRICS.get_or_init(ResolutionMetrics::new)
    }

    pub fn record_catalog_hit(&self) {
        self.catalog_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_default_fallback(&self) {
        self.default_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_result(&self) {
        self.empty_results.fetch_add(1, Ordering::Relaxed);
    }

    pub fn catalog_hits(&self) -> usize {
        self.catalog_hits.load(Ordering::Relaxed)
    }

    pub fn default_fallbacks(&self) -> usize {
        self.default_fallbacks.load(Ordering::Relaxed)
    }

    pub fn empty_results(&self) -> usize {
        self.empty_results.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.catalog_hits();
        let fallbacks = self.default_fallbacks();
        let empty = self.empty_results();
        let total = hits + fallbacks + empty;
        let catalog_hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            catalog_hits: hits,
            default_fallbacks: fallbacks,
            empty_results: empty,
            total_resolutions: total,
            catalog_hit_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.catalog_hits.store(0, Ordering::Relaxed);
        self.default_fallbacks.store(0, Ordering::Relaxed);
        self.empty_results.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of resolution statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub catalog_hits: usize,
    pub default_fallbacks: usize,
    pub empty_results: usize,
    pub total_resolutions: usize,

    /// Share of resolutions answered by the catalog, as a percentage (0-100)
    pub catalog_hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_catalog_hit() {
        let metrics = ResolutionMetrics::new();
        assert_eq!(metrics.catalog_hits(), 0);
        metrics.record_catalog_hit();
        metrics.record_catalog_hit();
        assert_eq!(metrics.catalog_hits(), 2);
    }

    #[test]
    fn test_record_default_fallback_and_empty() {
        let metrics = ResolutionMetrics::new();
        metrics.record_default_fallback();
        metrics.record_empty_result();
        assert_eq!(metrics.default_fallbacks(), 1);
        assert_eq!(metrics.empty_results(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = ResolutionMetrics::new().report();
        assert_eq!(report.total_resolutions, 0);
        assert_eq!(report.catalog_hit_rate, 0.0);
    }

    #[test]
    fn test_report_catalog_hit_rate() {
        let metrics = ResolutionMetrics::new();

        // 3 hits, 1 fallback = 75% hit rate
        metrics.record_catalog_hit();
        metrics.record_catalog_hit();
        metrics.record_catalog_hit();
        metrics.record_default_fallback();

        let report = metrics.report();
        assert_eq!(report.total_resolutions, 4);
        assert_eq!(report.catalog_hit_rate, 75.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = ResolutionMetrics::new();
        metrics.record_empty_result();
        let json = serde_json::to_value(metrics.report()).expect("Should serialize");
        assert_eq!(json["empty_results"], 1);
    }

    #[test]
    fn test_reset() {
        let metrics = ResolutionMetrics::new();
        metrics.record_catalog_hit();
        metrics.reset();
        assert_eq!(metrics.catalog_hits(), 0);
    }

    // ==================== Singleton Tests ====================

    #[test]
    fn test_global_returns_same_instance() {
        let metrics1 = ResolutionMetrics::global();
        let metrics2 = ResolutionMetrics::global();
        assert!(std::ptr::eq(metrics1, metrics2));
    }
}
