use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::ExecutorError;
use crate::traits::executor::{TaskExecutor, TaskFuture};

/// Cooperative executor that drives every task to completion in place, on
/// the submitting task's thread.
///
/// Submissions execute one after another with no parallelism at all, which
/// makes runs fully deterministic. Meant for tests that count invocations
/// or assert ordering, and for environments where handing work to other
/// threads is hostile.
#[derive(Debug, Default)]
pub struct SerialExecutor {
    shut_down: AtomicBool,
}

impl SerialExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskExecutor for SerialExecutor {
    async fn submit(&self, task: TaskFuture) -> Result<(), ExecutorError> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(ExecutorError::ShutDown);
        }
        task.await;
        Ok(())
    }

    fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
    }

    fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_tasks_complete_before_submit_returns() {
        let executor = SerialExecutor::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = counter.clone();
            executor
                .submit(Box::pin(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }))
                .await
                .unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_rejected() {
        let executor = SerialExecutor::new();
        executor.shutdown();

        let result = executor.submit(Box::pin(async {})).await;
        assert_eq!(result, Err(ExecutorError::ShutDown));
    }
}
