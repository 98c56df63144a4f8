//! Lock-free metrics collection and reporting
//!
//! NOTE: All atomics use Relaxed ordering intentionally. These are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use crate::domain::types::SensorId;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Update an atomic max value using compare-and-swap loop
#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

#[derive(Debug, Default)]
pub struct Metrics {
    detections_a: AtomicU64,
    detections_b: AtomicU64,
    evaluations: AtomicU64,
    unlocks: AtomicU64,
    mismatches: AtomicU64,
    /// Sensor reads spent waiting for an occlusion to end
    release_polls_total: AtomicU64,
    release_polls_max: AtomicU64,
    egress_failures: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSummary {
    pub detections_a: u64,
    pub detections_b: u64,
    pub evaluations: u64,
    pub unlocks: u64,
    pub mismatches: u64,
    pub release_polls_total: u64,
    pub release_polls_max: u64,
    pub egress_failures: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_detection(&self, sensor: SensorId, release_polls: u64) {
        match sensor {
            SensorId::A => self.detections_a.fetch_add(1, Ordering::Relaxed),
            SensorId::B => self.detections_b.fetch_add(1, Ordering::Relaxed),
        };
        self.release_polls_total.fetch_add(release_polls, Ordering::Relaxed);
        update_atomic_max(&self.release_polls_max, release_polls);
    }

    pub fn record_unlock(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.unlocks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mismatch(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.mismatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_egress_failure(&self) {
        self.egress_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> MetricsSummary {
        MetricsSummary {
            detections_a: self.detections_a.load(Ordering::Relaxed),
            detections_b: self.detections_b.load(Ordering::Relaxed),
            evaluations: self.evaluations.load(Ordering::Relaxed),
            unlocks: self.unlocks.load(Ordering::Relaxed),
            mismatches: self.mismatches.load(Ordering::Relaxed),
            release_polls_total: self.release_polls_total.load(Ordering::Relaxed),
            release_polls_max: self.release_polls_max.load(Ordering::Relaxed),
            egress_failures: self.egress_failures.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            detections_a = %self.detections_a,
            detections_b = %self.detections_b,
            evaluations = %self.evaluations,
            unlocks = %self.unlocks,
            mismatches = %self.mismatches,
            release_polls_total = %self.release_polls_total,
            release_polls_max = %self.release_polls_max,
            egress_failures = %self.egress_failures,
            "metrics_summary"
        );
    }
}
