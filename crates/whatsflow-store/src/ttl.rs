//! Expiry bookkeeping for cache entries.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-key expiry deadlines.
///
/// A `None` TTL disables expiry: nothing is tracked and no key ever
/// expires. With a TTL set, untracked keys count as expired.
#[derive(Debug)]
pub struct ExpiryLedger {
    deadlines: HashMap<String, Instant>,
    ttl: Option<Duration>,
}

impl ExpiryLedger {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            deadlines: HashMap::new(),
            ttl,
        }
    }

    /// Push a key's deadline out by one full TTL.
    pub fn touch(&mut self, key: &str) {
        if let Some(ttl) = self.ttl {
            self.deadlines.insert(key.to_string(), Instant::now() + ttl);
        }
    }

    /// Whether a key's deadline has passed.
    pub fn is_expired(&self, key: &str) -> bool {
        if self.ttl.is_none() {
            return false;
        }
        match self.deadlines.get(key) {
            Some(deadline) => *deadline <= Instant::now(),
            None => true,
        }
    }

    /// Stop tracking a key.
    pub fn remove(&mut self, key: &str) {
        self.deadlines.remove(key);
    }

    /// Drop every passed deadline, returning the affected keys.
    pub fn drain_expired(&mut self) -> Vec<String> {
        let now = Instant::now();
        let expired: Vec<String> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.deadlines.remove(key);
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_ledger_expires_nothing() {
        let mut ledger = ExpiryLedger::new(None);
        ledger.touch("a");
        assert!(!ledger.is_expired("a"));
        assert!(!ledger.is_expired("never-touched"));
        assert!(ledger.drain_expired().is_empty());
    }

    #[test]
    fn test_keys_expire_past_their_deadline() {
        let mut ledger = ExpiryLedger::new(Some(Duration::from_millis(10)));
        ledger.touch("a");
        assert!(!ledger.is_expired("a"));

        std::thread::sleep(Duration::from_millis(20));
        assert!(ledger.is_expired("a"));
        assert_eq!(ledger.drain_expired(), ["a"]);
        // Drained entries are gone; untracked keys count as expired.
        assert!(ledger.is_expired("a"));
    }

    #[test]
    fn test_touch_pushes_the_deadline_out() {
        let mut ledger = ExpiryLedger::new(Some(Duration::from_millis(40)));
        ledger.touch("a");
        std::thread::sleep(Duration::from_millis(25));
        ledger.touch("a");
        std::thread::sleep(Duration::from_millis(25));
        assert!(!ledger.is_expired("a"));
    }
}
