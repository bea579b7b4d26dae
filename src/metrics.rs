//! Performance metrics and statistics tracking for the prediction pipeline.

use crate::types::Outcome;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for pipeline performance
pub struct PipelineMetrics {
    /// Total predictions produced
    pub predictions_processed: AtomicU64,
    /// Requests that ended in an error response
    pub predictions_failed: AtomicU64,
    /// Predictions by outcome label
    predictions_by_outcome: RwLock<HashMap<Outcome, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Confidence distribution buckets (0-10%, ..., 90-100%)
    confidence_buckets: RwLock<[u64; 10]>,
    /// Fraction of schema columns backed by real statistics, per prediction
    coverages: RwLock<Vec<f64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions_processed: AtomicU64::new(0),
            predictions_failed: AtomicU64::new(0),
            predictions_by_outcome: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            confidence_buckets: RwLock::new([0; 10]),
            coverages: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, processing_time: Duration, outcome: Outcome, confidence: f64, coverage: f64) {
        self.predictions_processed.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        if let Ok(mut by_outcome) = self.predictions_by_outcome.write() {
            *by_outcome.entry(outcome).or_insert(0) += 1;
        }

        // Confidence is a percentage
        let bucket = ((confidence / 10.0).max(0.0) as usize).min(9);
        if let Ok(mut buckets) = self.confidence_buckets.write() {
            buckets[bucket] += 1;
        }

        if let Ok(mut coverages) = self.coverages.write() {
            coverages.push(coverage);
            if coverages.len() > 1000 {
                coverages.drain(0..500);
            }
        }
    }

    /// Record a failed request
    pub fn record_failure(&self) {
        self.predictions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let Ok(times) = self.processing_times.read() else {
            return ProcessingStats::default();
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Get average feature coverage
    pub fn get_avg_coverage(&self) -> f64 {
        match self.coverages.read() {
            Ok(coverages) if !coverages.is_empty() => coverages.iter().sum::<f64>() / coverages.len() as f64,
            _ => 0.0,
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_processed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get confidence distribution
    pub fn get_confidence_distribution(&self) -> [u64; 10] {
        self.confidence_buckets.read().map(|b| *b).unwrap_or_default()
    }

    /// Get predictions by outcome
    pub fn get_predictions_by_outcome(&self) -> HashMap<Outcome, u64> {
        self.predictions_by_outcome
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let processed = self.predictions_processed.load(Ordering::Relaxed);
        let failed = self.predictions_failed.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();
        let by_outcome = self.get_predictions_by_outcome();
        let confidence = self.get_confidence_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            MATCH PREDICTION PIPELINE - METRICS SUMMARY        ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Predictions: {:>8}  │  Failed: {:>6}  │  {:>6.2} req/s      ║",
            processed,
            failed,
            self.get_throughput()
        );
        info!(
            "║ Processing Time (μs): mean={:>7} p50={:>7} p95={:>7} p99={:>7} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!(
            "║ Feature Coverage: {:>5.1}% of schema columns from statistics  ║",
            self.get_avg_coverage() * 100.0
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Predictions by Outcome:                                      ║");
        for outcome in Outcome::ALL {
            let count = by_outcome.get(&outcome).copied().unwrap_or(0);
            let pct = if processed > 0 {
                (count as f64 / processed as f64) * 100.0
            } else {
                0.0
            };
            info!("║   {}: {:>6} ({:>5.1}%)                                       ║", outcome, count, pct);
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Confidence Distribution:                                     ║");
        let total: u64 = confidence.iter().sum();
        for (i, &count) in confidence.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!("║   {:>3}-{:<3}%: {:>6} ({:>5.1}%) {}", i * 10, (i + 1) * 10, count, pct, bar);
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), Outcome::HomeWin, 70.0, 0.9);
        metrics.record_prediction(Duration::from_micros(300), Outcome::Draw, 100.0, 0.5);
        metrics.record_failure();

        assert_eq!(metrics.predictions_processed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.predictions_failed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.get_predictions_by_outcome().get(&Outcome::Draw), Some(&1));

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 200);
        assert_eq!(stats.max_us, 300);
    }

    #[test]
    fn test_confidence_buckets() {
        let metrics = PipelineMetrics::new();
        metrics.record_prediction(Duration::from_micros(1), Outcome::AwayWin, 45.0, 1.0);
        metrics.record_prediction(Duration::from_micros(1), Outcome::HomeWin, 100.0, 1.0);

        let dist = metrics.get_confidence_distribution();
        assert_eq!(dist[4], 1);
        assert_eq!(dist[9], 1);
    }

    #[test]
    fn test_average_coverage() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.get_avg_coverage(), 0.0);

        metrics.record_prediction(Duration::from_micros(1), Outcome::HomeWin, 50.0, 1.0);
        metrics.record_prediction(Duration::from_micros(1), Outcome::HomeWin, 50.0, 0.5);
        assert!((metrics.get_avg_coverage() - 0.75).abs() < 1e-12);
    }
}
