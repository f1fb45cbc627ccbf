use archivist_types::ProxyMode;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ModeStats {
    pub requests: AtomicU64,
    pub successes: AtomicU64,
    pub failures: AtomicU64,
}

impl ModeStats {
    fn snapshot(&self) -> ModeStatsSnapshot {
        ModeStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeStatsSnapshot {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
}

/// Per-mode request/success/failure counters (spec §4.1 "Statistics"),
/// queryable as telemetry without a metrics backend.
#[derive(Debug, Default)]
pub struct ProxyStats {
    by_mode: DashMap<ProxyMode, ModeStats>,
}

impl ProxyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self, mode: ProxyMode) {
        self.by_mode
            .entry(mode)
            .or_default()
            .requests
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, mode: ProxyMode) {
        self.by_mode
            .entry(mode)
            .or_default()
            .successes
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, mode: ProxyMode) {
        self.by_mode
            .entry(mode)
            .or_default()
            .failures
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, mode: ProxyMode) -> ModeStatsSnapshot {
        self.by_mode
            .get(&mode)
            .map(|s| s.snapshot())
            .unwrap_or_default()
    }
}
