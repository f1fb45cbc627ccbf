use serde::{Deserialize, Serialize};

/// Fetch-proxy cost tier, ordered low to high (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyMode {
    NoJs,
    Standard,
    Premium,
    Stealth,
}

impl ProxyMode {
    pub fn escalate(self) -> Option<ProxyMode> {
        match self {
            ProxyMode::NoJs => Some(ProxyMode::Standard),
            ProxyMode::Standard => Some(ProxyMode::Premium),
            ProxyMode::Premium => Some(ProxyMode::Stealth),
            ProxyMode::Stealth => None,
        }
    }

    /// Per-mode retry attempts before escalating (spec §4.1).
    pub fn retry_attempts(self) -> u32 {
        match self {
            ProxyMode::NoJs | ProxyMode::Standard | ProxyMode::Premium => 2,
            ProxyMode::Stealth => 1,
        }
    }
}

/// Per-host memo of the cheapest proxy mode known to work (spec §3, §4.1
/// algorithm step 1 and §8 property 5). Read-mostly: one winning write per
/// host, then many cheap reads — callers protect this with a
/// `RwLock`/`DashMap` rather than this type doing its own locking, so it
/// stays a plain value type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostCapabilityCache {
    pub mode: Option<ProxyMode>,
    pub recent_failures: u32,
    pub successes: u32,
}

impl HostCapabilityCache {
    pub fn record_success(&mut self, mode: ProxyMode) {
        self.mode = Some(mode);
        self.successes += 1;
        self.recent_failures = 0;
    }

    pub fn record_failure(&mut self) {
        self.recent_failures += 1;
    }
}
