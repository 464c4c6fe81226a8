use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::errors::ExecutorError;
use crate::traits::executor::{TaskExecutor, TaskFuture};

/// Parallel executor backed by the tokio runtime.
///
/// Every submitted task is spawned immediately, so `submit` never blocks
/// the caller; the spawned task acquires a semaphore permit before polling
/// the actual work, which is what bounds how many tasks run at once.
///
/// `shutdown` closes the semaphore: further submissions are rejected with
/// [`ExecutorError::ShutDown`].
pub struct WorkerPoolExecutor {
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
}

impl WorkerPoolExecutor {
    /// Create a pool allowing up to `max_concurrency` concurrently running
    /// tasks. Clamped to a minimum of 1.
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}

impl Default for WorkerPoolExecutor {
    /// Concurrency sized to the available parallelism, falling back to 4
    /// when it cannot be determined.
    fn default() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(concurrency)
    }
}

#[async_trait]
impl TaskExecutor for WorkerPoolExecutor {
    async fn submit(&self, task: TaskFuture) -> Result<(), ExecutorError> {
        if self.semaphore.is_closed() {
            return Err(ExecutorError::ShutDown);
        }

        let semaphore = self.semaphore.clone();
        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            task.await;
        });

        Ok(())
    }

    fn shutdown(&self) {
        self.semaphore.close();
    }

    fn is_shut_down(&self) -> bool {
        self.semaphore.is_closed()
    }
}
