//! Process-wide unique sequence number issuance.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::SequenceId;

/// Issues unique sequence numbers to any number of concurrent callers.
///
/// Two calls never return the same value. Concurrent callers may observe
/// interleaved numbers; only uniqueness is promised, not that values become
/// visible in real invocation order.
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    /// Create a generator whose first issued value is 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Take the next unused sequence number.
    pub fn next(&self) -> SequenceId {
        // Uniqueness is the whole contract; no ordering with other shared
        // state is needed here.
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier, Mutex};
    use std::thread;

    #[test]
    fn first_value_is_one_and_values_increase() {
        let generator = SequenceGenerator::new();
        assert_eq!(generator.next(), 1);
        assert_eq!(generator.next(), 2);
        assert_eq!(generator.next(), 3);
    }

    #[test]
    fn concurrent_callers_never_share_a_value() {
        let generator = Arc::new(SequenceGenerator::new());
        let workers = 8;
        let per_worker = 1000;
        let barrier = Arc::new(Barrier::new(workers));
        let seen: Arc<Mutex<HashSet<u64>>> = Arc::new(Mutex::new(HashSet::new()));

        let mut handles = Vec::new();
        for _ in 0..workers {
            let generator = Arc::clone(&generator);
            let barrier = Arc::clone(&barrier);
            let seen = Arc::clone(&seen);
            handles.push(thread::spawn(move || {
                barrier.wait();
                let mut local = Vec::with_capacity(per_worker);
                for _ in 0..per_worker {
                    local.push(generator.next());
                }
                let mut guard = seen.lock().expect("seen mutex poisoned");
                for value in local {
                    // Each issued value must be globally fresh.
                    assert!(guard.insert(value), "sequence id {value} issued twice");
                }
            }));
        }

        for handle in handles {
            handle.join().expect("generator thread panicked");
        }

        let guard = seen.lock().expect("seen mutex poisoned");
        assert_eq!(guard.len(), workers * per_worker);
    }
}
