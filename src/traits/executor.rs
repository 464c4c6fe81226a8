use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

use crate::errors::ExecutorError;

/// A unit of work handed to an executor. The future owns everything it
/// needs, including the channel sender it reports its completion through,
/// so executors never see task results.
pub type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Narrow worker-pool abstraction the scheduler submits tasks through.
///
/// `submit` hands over one task; how much runs in parallel is entirely the
/// executor's business. After `shutdown`, `submit` returns
/// [`ExecutorError::ShutDown`]. Whoever constructed the executor owns its
/// shutdown: the scheduler only shuts down executors it created itself.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn submit(&self, task: TaskFuture) -> Result<(), ExecutorError>;

    fn shutdown(&self);

    fn is_shut_down(&self) -> bool;
}
