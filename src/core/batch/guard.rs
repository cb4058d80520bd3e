//! Duplicate claims inside one run

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Result of [`DuplicateGuard::claim`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimResult {
    Accepted,
    Duplicate,
}

/// Rejects keys that already exist in the record store or were claimed
/// earlier in the same run.
///
/// The existing keys are a snapshot taken when the run starts; writes made by
/// other runs afterwards are not seen here.
pub struct DuplicateGuard {
    existing: HashSet<String>,
    claimed: Mutex<HashSet<String>>,
    rejected: AtomicUsize,
}

impl DuplicateGuard {
    pub fn new<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            existing: existing
                .into_iter()
                .map(|k| k.as_ref().trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            claimed: Mutex::new(HashSet::new()),
            rejected: AtomicUsize::new(0),
        }
    }

    /// Claim `key` for this run. Blank keys are never accepted.
    pub fn claim(&self, key: &str) -> ClaimResult {
        let key = key.trim();
        if key.is_empty() || self.existing.contains(key) {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return ClaimResult::Duplicate;
        }

        if self.claimed.lock().insert(key.to_string()) {
            ClaimResult::Accepted
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            ClaimResult::Duplicate
        }
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn accepted_count(&self) -> usize {
        self.claimed.lock().len()
    }
}
