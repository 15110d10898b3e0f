//! Per-task single-flight locks.

use crate::task::domain::TaskId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = HashMap<TaskId, Arc<AsyncMutex<()>>>;

/// Serializes execution attempts that target the same task.
///
/// Attempts on different tasks never contend. A task's entry is removed once
/// its last holder or waiter goes away, so the table only holds tasks with
/// an attempt in flight.
#[derive(Debug, Default)]
pub(crate) struct TaskLocks {
    table: Arc<Mutex<LockTable>>,
}

impl TaskLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Waits until no other attempt holds `task_id`.
    pub(crate) async fn acquire(&self, task_id: TaskId) -> TaskLockGuard {
        let entry = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                table
                    .entry(task_id)
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        let held = entry.lock_owned().await;
        TaskLockGuard {
            task_id,
            table: Arc::clone(&self.table),
            held: Some(held),
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held for the duration of one attempt.
#[derive(Debug)]
pub(crate) struct TaskLockGuard {
    task_id: TaskId,
    table: Arc<Mutex<LockTable>>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for TaskLockGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Release first so the count below only sees the table and waiters.
        drop(self.held.take());
        let idle = table
            .get(&self.task_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1);
        if idle {
            table.remove(&self.task_id);
        }
    }
}
