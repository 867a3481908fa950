//! Request id generation
//!
//! Every request needs an id that no other in-flight request from the same
//! client shares. The envelope builder never makes one up; it takes whatever
//! the client's [`IdGenerator`] hands out.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of request ids
///
/// Implementations must be safe to call from many tasks at once and must not
/// return the same id twice while those ids can still be in flight. A counter
/// is allowed to wrap once its range is used up.
pub trait IdGenerator: Send + Sync {
    /// Produce the next id
    fn next_id(&self) -> u64;
}

/// Monotonic counter starting at 1
///
/// Ids are unique for 2^64 calls. After handing out `u64::MAX` the counter
/// wraps to 0 and starts repeating earlier ids.
#[derive(Debug)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    /// Start counting at 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start counting at `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.next_id(), 3);
    }

    #[test]
    fn test_custom_start() {
        let ids = SequentialIds::starting_at(100);
        assert_eq!(ids.next_id(), 100);
        assert_eq!(ids.next_id(), 101);
    }

    #[test]
    fn test_wraps_after_max() {
        let ids = SequentialIds::starting_at(u64::MAX);
        assert_eq!(ids.next_id(), u64::MAX);
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_concurrent_ids_are_distinct() {
        let ids = Arc::new(SequentialIds::new());
        let threads = 8;
        let per_thread = 1000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..per_thread).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), threads * per_thread);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tasks_get_distinct_ids() {
        let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIds::new());

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let ids = ids.clone();
                tokio::spawn(async move { ids.next_id() })
            })
            .collect();

        let mut seen = HashSet::new();
        for task in tasks {
            assert!(seen.insert(task.await.unwrap()));
        }
        assert_eq!(seen.len(), 64);
    }
}
