//! # Usage meter: named counters shared by jobs.
//!
//! Jobs receive an `Arc<UsageMeter>` when they are registered and add to it
//! while they run; the snapshot emitter reads it once per refresh cycle.
//! Counters are cumulative for the lifetime of the process and survive
//! generation changes.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Thread-safe set of monotonically increasing counters.
#[derive(Debug, Default)]
pub struct UsageMeter {
    counters: Mutex<BTreeMap<String, u64>>,
}

impl UsageMeter {
    /// Creates an empty meter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `n` to `label` (saturating).
    pub fn add(&self, label: &str, n: u64) {
        let mut counters = self.counters.lock().unwrap_or_else(|p| p.into_inner());
        match counters.get_mut(label) {
            Some(v) => *v = v.saturating_add(n),
            None => {
                counters.insert(label.to_string(), n);
            }
        }
    }

    /// Current value of `label` (0 if never touched).
    pub fn get(&self, label: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|p| p.into_inner());
        counters.get(label).copied().unwrap_or(0)
    }

    /// Copy of all counters, ordered by label.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counters
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_and_saturates() {
        let m = UsageMeter::new();
        m.add("log", 2);
        m.add("log", 3);
        assert_eq!(m.get("log"), 5);

        m.add("big", u64::MAX);
        m.add("big", 1);
        assert_eq!(m.get("big"), u64::MAX);
        assert_eq!(m.get("missing"), 0);
    }

    #[test]
    fn snapshot_is_ordered() {
        let m = UsageMeter::new();
        m.add("b", 1);
        m.add("a", 1);
        let keys: Vec<_> = m.snapshot().into_keys().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
