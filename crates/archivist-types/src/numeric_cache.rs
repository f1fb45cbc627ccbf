use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-session ephemeral key-value cache of numeric values extracted from
/// prior assistant replies (spec §3 NumericContextCache, §4.7 Calculation
/// shortcut). Re-implemented per spec §9's redesign flag as a plain struct
/// with explicit TTL rather than a mutable dict living forever: entries
/// expire after `ttl` of inactivity, and the whole cache is dropped with
/// its session.
#[derive(Debug, Clone)]
pub struct NumericContextCache {
    entries: HashMap<String, Entry>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct Entry {
    value: f64,
    raw: String,
    inserted_at: Instant,
}

pub const TAKE_HOME_SALARY: &str = "take_home_salary";
pub const GROSS_SALARY: &str = "gross_salary";
pub const LAST_QUERY: &str = "last_query";
pub const LAST_RESPONSE: &str = "last_response";

impl NumericContextCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(30 * 60))
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64, raw: impl Into<String>) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                raw: raw.into(),
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).and_then(|e| {
            if e.inserted_at.elapsed() < self.ttl {
                Some(e.value)
            } else {
                None
            }
        })
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.raw.as_str())
    }

    pub fn evict_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.inserted_at.elapsed() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_entries_are_not_returned() {
        let mut cache = NumericContextCache::new(Duration::from_millis(1));
        cache.set(TAKE_HOME_SALARY, 1_144_180.0, "₹1,144,180");
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(TAKE_HOME_SALARY), None);
    }

    #[test]
    fn fresh_entries_round_trip() {
        let mut cache = NumericContextCache::with_default_ttl();
        cache.set(TAKE_HOME_SALARY, 1_144_180.0, "₹1,144,180");
        assert_eq!(cache.get(TAKE_HOME_SALARY), Some(1_144_180.0));
    }
}
