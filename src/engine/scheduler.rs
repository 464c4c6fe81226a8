//! Dependency-ordered parallel task scheduler.
//!
//! This module implements the execution loop of the analysis core: it
//! drains the ready set produced by dependency initialization, turns each
//! ready analyzer into tasks, submits those tasks through the executor
//! abstraction and routes completions back into dependency resolution
//! until the graph is exhausted.
//!
//! # Coordination model
//!
//! A single coordinator - the [`run`] future itself - owns every piece of
//! mutable state: the edge tracker, the ready queue, per-analyzer pending
//! result buffers, the accumulated dependency results and the cache.
//! Worker tasks execute nothing but `analyze` bodies; they report through
//! an unbounded completion channel and never touch coordinator state, so
//! no state needs locking. The coordinator blocks in exactly one place,
//! the channel `recv` ("wait for any completion").
//!
//! # Failure semantics
//!
//! A failing analyzer (task generation or any task) is logged once,
//! removed together with the transitive closure of its dependants and
//! never delivers anything; unrelated analyzers continue. Still-running
//! sibling tasks of a failed analyzer are not interrupted - their eventual
//! completions are discarded against the failed set. A failing result
//! sink is logged per occurrence and does not affect scheduling.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::analysis::{AnalysisResult, TaskCall, TaskDigest};
use crate::engine::cache::TaskCache;
use crate::engine::initializer::{initialize_dependencies, DependencyPlan};
use crate::errors::{BearError, ExecutionError};
use crate::executors::WorkerPoolExecutor;
use crate::observability::messages::core::{
    BearCompleted, BearExecutionFailed, DependantsUnscheduled, ExecutionCompleted,
    ExecutionStarted, ResultHandlingFailed, TaskCacheHit,
};
use crate::observability::messages::StructuredLog;
use crate::traits::bear::{Bear, BearId, DependencyResults};
use crate::traits::executor::{TaskExecutor, TaskFuture};

/// Error type the result sink may return; opaque to the core.
pub type SinkError = anyhow::Error;

/// Execute the given analyzers and every dependency they pull in.
///
/// * `bears` - seed analyzer instances; may be empty.
/// * `on_result` - invoked once per result value, in completion order. An
///   `Err` is logged and the value still counts as delivered.
/// * `cache` - optional task-result cache consulted per task and populated
///   on successful completion. `None` disables caching.
/// * `executor` - optional executor to submit tasks through. A supplied
///   executor is borrowed and left running; when omitted, a
///   [`WorkerPoolExecutor`] is created, owned, and shut down before this
///   function returns, on success and failure alike.
///
/// Returns every delivered result value in completion order.
pub async fn run<F>(
    bears: Vec<Arc<dyn Bear>>,
    on_result: F,
    cache: Option<&mut TaskCache>,
    executor: Option<Arc<dyn TaskExecutor>>,
) -> Result<Vec<AnalysisResult>, ExecutionError>
where
    F: FnMut(&AnalysisResult) -> Result<(), SinkError>,
{
    let (executor, owned) = match executor {
        Some(executor) => (executor, false),
        None => (
            Arc::new(WorkerPoolExecutor::default()) as Arc<dyn TaskExecutor>,
            true,
        ),
    };

    run_with(bears, on_result, cache, executor, owned).await
}

/// `run` with executor ownership made explicit. An owned executor is shut
/// down before returning, whether the run succeeded or not.
pub(crate) async fn run_with<F>(
    bears: Vec<Arc<dyn Bear>>,
    on_result: F,
    cache: Option<&mut TaskCache>,
    executor: Arc<dyn TaskExecutor>,
    owned: bool,
) -> Result<Vec<AnalysisResult>, ExecutionError>
where
    F: FnMut(&AnalysisResult) -> Result<(), SinkError>,
{
    let outcome = drive(bears, on_result, cache, executor.clone()).await;

    if owned {
        executor.shutdown();
    }

    outcome
}

async fn drive<F>(
    bears: Vec<Arc<dyn Bear>>,
    on_result: F,
    cache: Option<&mut TaskCache>,
    executor: Arc<dyn TaskExecutor>,
) -> Result<Vec<AnalysisResult>, ExecutionError>
where
    F: FnMut(&AnalysisResult) -> Result<(), SinkError>,
{
    let plan = initialize_dependencies(bears)?;
    let bear_count = plan.bears.len();

    ExecutionStarted { bear_count }.log();
    let started = Instant::now();

    let (tx, rx) = mpsc::unbounded_channel();
    let ready: VecDeque<BearId> = plan.ready.iter().copied().collect();

    let mut scheduler = Scheduler {
        plan,
        on_result,
        cache,
        executor,
        tx,
        rx,
        ready,
        running: HashMap::new(),
        total_running: 0,
        pending_results: HashMap::new(),
        dependency_results: HashMap::new(),
        failed: HashSet::new(),
        results: Vec::new(),
    };

    let results = scheduler.execute().await?;

    ExecutionCompleted {
        bear_count,
        result_count: results.len(),
        duration: started.elapsed(),
    }
    .log();

    Ok(results)
}

/// A finished task, reported by the worker future (or synthesized for a
/// cache hit).
struct TaskCompletion {
    bear: BearId,
    outcome: Result<Vec<AnalysisResult>, BearError>,
    /// Digest to store the results under on success. `None` when caching
    /// is off or the completion was served from the cache.
    digest: Option<TaskDigest>,
}

struct Scheduler<'c, F> {
    plan: DependencyPlan,
    on_result: F,
    cache: Option<&'c mut TaskCache>,
    executor: Arc<dyn TaskExecutor>,
    tx: mpsc::UnboundedSender<TaskCompletion>,
    rx: mpsc::UnboundedReceiver<TaskCompletion>,
    /// Ready analyzers not yet dispatched, FIFO.
    ready: VecDeque<BearId>,
    /// Outstanding task count per dispatched analyzer.
    running: HashMap<BearId, usize>,
    /// Outstanding tasks overall, including ones owned by failed analyzers
    /// whose completions will be discarded.
    total_running: usize,
    /// Results buffered per analyzer until its last task completes.
    pending_results: HashMap<BearId, Vec<AnalysisResult>>,
    /// Dependency results accumulated for not-yet-dispatched dependants.
    dependency_results: HashMap<BearId, DependencyResults>,
    failed: HashSet<BearId>,
    results: Vec<AnalysisResult>,
}

impl<F> Scheduler<'_, F>
where
    F: FnMut(&AnalysisResult) -> Result<(), SinkError>,
{
    async fn execute(&mut self) -> Result<Vec<AnalysisResult>, ExecutionError> {
        self.submit_ready().await?;

        while self.total_running > 0 {
            let Some(completion) = self.rx.recv().await else {
                break;
            };
            self.handle_completion(completion);
            self.submit_ready().await?;
        }

        Ok(std::mem::take(&mut self.results))
    }

    /// Dispatch every ready analyzer: populate its dependency results,
    /// generate its tasks and submit them. Analyzers generating zero tasks
    /// complete on the spot, which may push further analyzers onto the
    /// ready queue consumed by this same loop.
    async fn submit_ready(&mut self) -> Result<(), ExecutionError> {
        while let Some(id) = self.ready.pop_front() {
            if self.failed.contains(&id) {
                continue;
            }
            let Some(bear) = self.plan.bears.get(&id).cloned() else {
                continue;
            };

            let dependency_results = self.dependency_results.remove(&id).unwrap_or_default();

            let tasks = match bear.generate_tasks(&dependency_results) {
                Ok(tasks) => tasks,
                Err(error) => {
                    BearExecutionFailed {
                        bear: id.class_name(),
                        error: &error,
                    }
                    .log();
                    self.fail_bear(id);
                    continue;
                }
            };

            if tasks.is_empty() {
                self.complete_bear(id);
                continue;
            }

            self.running.insert(id, tasks.len());
            for task in tasks {
                self.submit_task(id, bear.clone(), task).await?;
            }
        }

        Ok(())
    }

    async fn submit_task(
        &mut self,
        id: BearId,
        bear: Arc<dyn Bear>,
        task: TaskCall,
    ) -> Result<(), ExecutionError> {
        let digest = if self.cache.is_some() {
            match task.digest() {
                Ok(digest) => Some(digest),
                Err(error) => {
                    tracing::warn!(
                        bear = id.class_name(),
                        error = %error,
                        "task arguments are not digestible, bypassing the cache"
                    );
                    None
                }
            }
        } else {
            None
        };

        if let (Some(cache), Some(digest)) = (self.cache.as_deref(), digest.as_ref()) {
            if let Some(results) = cache.lookup(id.class_name(), digest) {
                TaskCacheHit {
                    bear: id.class_name(),
                    digest,
                }
                .log();
                let cached = results.clone();
                self.total_running += 1;
                // An already-completed future: route the cached results
                // through the regular completion path without executing.
                let _ = self.tx.send(TaskCompletion {
                    bear: id,
                    outcome: Ok(cached),
                    digest: None,
                });
                return Ok(());
            }
        }

        let tx = self.tx.clone();
        let job: TaskFuture = Box::pin(async move {
            let outcome = bear.analyze(task).await;
            let _ = tx.send(TaskCompletion {
                bear: id,
                outcome,
                digest,
            });
        });

        self.total_running += 1;
        self.executor.submit(job).await?;
        Ok(())
    }

    fn handle_completion(&mut self, completion: TaskCompletion) {
        self.total_running -= 1;

        let id = completion.bear;
        if self.failed.contains(&id) {
            // A straggler task of an already-failed analyzer.
            return;
        }

        match completion.outcome {
            Ok(task_results) => {
                for value in &task_results {
                    if let Err(error) = (self.on_result)(value) {
                        ResultHandlingFailed { error: &error }.log();
                    }
                    self.results.push(value.clone());
                }

                if !task_results.is_empty() {
                    self.pending_results
                        .entry(id)
                        .or_default()
                        .extend(task_results.iter().cloned());
                }

                if let (Some(cache), Some(digest)) =
                    (self.cache.as_deref_mut(), completion.digest)
                {
                    cache.insert(id.class_name(), digest, task_results);
                }

                let finished = match self.running.get_mut(&id) {
                    Some(remaining) => {
                        *remaining -= 1;
                        *remaining == 0
                    }
                    None => false,
                };
                if finished {
                    self.running.remove(&id);
                    self.complete_bear(id);
                }
            }
            Err(error) => {
                BearExecutionFailed {
                    bear: id.class_name(),
                    error: &error,
                }
                .log();
                self.fail_bear(id);
            }
        }
    }

    /// All tasks of `id` finished successfully: hand its buffered results
    /// to every dependant and promote the newly ready ones.
    fn complete_bear(&mut self, id: BearId) {
        let buffer = self.pending_results.remove(&id).unwrap_or_default();

        BearCompleted {
            bear: id.class_name(),
            result_count: buffer.len(),
        }
        .log();

        if !buffer.is_empty() {
            for dependant in self.plan.tracker.get_dependants(id) {
                self.dependency_results
                    .entry(dependant)
                    .or_default()
                    .entry(id.class_name())
                    .or_default()
                    .extend(buffer.iter().cloned());
            }
        }

        let newly_ready = self.plan.tracker.resolve(id);
        self.ready.extend(newly_ready);
    }

    /// Unschedule `id` and the transitive closure of its dependants. The
    /// closure members were never dispatched (they still had unresolved
    /// dependencies), so dropping their accumulated state suffices.
    fn fail_bear(&mut self, id: BearId) {
        self.failed.insert(id);
        self.running.remove(&id);
        self.pending_results.remove(&id);
        self.dependency_results.remove(&id);

        let dropped = self.plan.tracker.remove_subtree(id);
        if !dropped.is_empty() {
            DependantsUnscheduled {
                bear: id.class_name(),
                count: dropped.len(),
            }
            .log();
        }
        for dependant in dropped {
            self.failed.insert(dependant);
            self.pending_results.remove(&dependant);
            self.dependency_results.remove(&dependant);
            self.running.remove(&dependant);
        }
    }
}
