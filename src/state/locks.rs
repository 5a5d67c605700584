//! Per (student, quiz) serialization of answer submissions
//!
//! "Record answer, then pick the next question" must run as one step per
//! (student, quiz) pair. Distinct pairs never share a lock. An entry lives
//! only while a guard holds it or a caller waits on it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

type QuizKey = (i64, i64);
type LockMap = HashMap<QuizKey, Arc<AsyncMutex<()>>>;

/// Registry of async mutexes keyed by (student_id, quiz_id)
#[derive(Debug, Clone, Default)]
pub struct QuizLockRegistry {
    locks: Arc<Mutex<LockMap>>,
}

/// Exclusive access to one (student, quiz) pair; the entry is dropped with
/// the last guard or waiter
#[derive(Debug)]
pub struct QuizLockGuard {
    key: QuizKey,
    locks: Arc<Mutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl QuizLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a (student, quiz) pair
    pub async fn acquire(&self, student_id: i64, quiz_id: i64) -> QuizLockGuard {
        let key = (student_id, quiz_id);
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks
                .entry(key)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        debug!(student_id = student_id, quiz_id = quiz_id, "Acquiring quiz submission lock");
        QuizLockGuard {
            key,
            locks: Arc::clone(&self.locks),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of (student, quiz) pairs currently held or waited on
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for QuizLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Only the map still references the mutex: nobody holds or waits on it
        if locks.get(&self.key).map_or(false, |lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_pair_is_exclusive() {
        let registry = QuizLockRegistry::new();
        let guard = registry.acquire(1, 1).await;

        let contender = registry.clone();
        let wait = Duration::from_millis(50);
        let blocked = tokio::time::timeout(wait, contender.acquire(1, 1)).await;
        assert!(blocked.is_err());

        drop(guard);
        let acquired = tokio::time::timeout(wait, registry.acquire(1, 1)).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_distinct_pairs_do_not_contend() {
        let registry = QuizLockRegistry::new();
        let _first = registry.acquire(1, 1).await;
        let other_quiz = tokio::time::timeout(Duration::from_millis(50), registry.acquire(1, 2))
            .await
            .unwrap();
        let other_student = tokio::time::timeout(Duration::from_millis(50), registry.acquire(2, 1))
            .await
            .unwrap();
        assert_eq!(registry.len(), 3);

        drop(other_quiz);
        drop(other_student);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_entry_removed_after_last_guard() {
        let registry = QuizLockRegistry::new();
        let held = registry.acquire(1, 1).await;

        let waiter = {
            let registry = registry.clone();
            tokio::spawn(async move {
                let _guard = registry.acquire(1, 1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(held);
        // The waiter still references the entry
        waiter.await.unwrap();
        assert!(registry.is_empty());

        drop(registry.acquire(2, 2).await);
        assert!(registry.is_empty());
    }
}
