// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for execution-core lifecycle and failure events.
//!
//! The two ERROR-class messages carry stable prefixes that downstream
//! tooling matches on; the prefix text must not change:
//!
//! * `"An exception was thrown during bear execution."`
//! * `"An exception was thrown during result-handling."`

use crate::errors::BearError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A run started.
///
/// # Log Level
/// `info!`
pub struct ExecutionStarted {
    pub bear_count: usize,
}

impl Display for ExecutionStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting analysis run with {} bears in the dependency graph",
            self.bear_count
        )
    }
}

impl StructuredLog for ExecutionStarted {
    fn log(&self) {
        tracing::info!(bear_count = self.bear_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("execution", span_name = name, bear_count = self.bear_count)
    }
}

/// A run finished and the result list is about to be returned.
///
/// # Log Level
/// `info!`
pub struct ExecutionCompleted {
    pub bear_count: usize,
    pub result_count: usize,
    pub duration: std::time::Duration,
}

impl Display for ExecutionCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Analysis run completed: {} bears, {} results in {:?}",
            self.bear_count, self.result_count, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted {
    fn log(&self) {
        tracing::info!(
            bear_count = self.bear_count,
            result_count = self.result_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            bear_count = self.bear_count,
            result_count = self.result_count,
        )
    }
}

/// An analyzer failed inside `generate_tasks` or `analyze`.
///
/// Emitted exactly once per failing bear; its transitive dependants are
/// unscheduled afterwards.
///
/// # Log Level
/// `error!`
pub struct BearExecutionFailed<'a> {
    pub bear: &'a str,
    pub error: &'a BearError,
}

impl Display for BearExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "An exception was thrown during bear execution. bear={} error={}",
            self.bear, self.error
        )
    }
}

impl StructuredLog for BearExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(bear = self.bear, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "bear_execution_failed",
            span_name = name,
            bear = self.bear,
            error = %self.error,
        )
    }
}

/// The caller's result sink rejected a delivered value.
///
/// Scheduling continues; the offending result counts as delivered.
///
/// # Log Level
/// `error!`
pub struct ResultHandlingFailed<'a> {
    pub error: &'a anyhow::Error,
}

impl Display for ResultHandlingFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "An exception was thrown during result-handling. error={}",
            self.error
        )
    }
}

impl StructuredLog for ResultHandlingFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("result_handling_failed", span_name = name, error = %self.error)
    }
}

/// All tasks of an analyzer completed successfully.
///
/// # Log Level
/// `debug!`
pub struct BearCompleted<'a> {
    pub bear: &'a str,
    pub result_count: usize,
}

impl Display for BearCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bear {} completed all tasks with {} results",
            self.bear, self.result_count
        )
    }
}

impl StructuredLog for BearCompleted<'_> {
    fn log(&self) {
        tracing::debug!(bear = self.bear, result_count = self.result_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "bear_completed",
            span_name = name,
            bear = self.bear,
            result_count = self.result_count,
        )
    }
}

/// A task was answered from the result cache instead of being executed.
///
/// # Log Level
/// `debug!`
pub struct TaskCacheHit<'a> {
    pub bear: &'a str,
    pub digest: &'a crate::analysis::TaskDigest,
}

impl Display for TaskCacheHit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cache hit for bear {} task {}", self.bear, self.digest)
    }
}

impl StructuredLog for TaskCacheHit<'_> {
    fn log(&self) {
        tracing::debug!(bear = self.bear, digest = %self.digest, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("task_cache_hit", span_name = name, bear = self.bear)
    }
}

/// Transitive dependants of a failed analyzer were removed from the run.
///
/// # Log Level
/// `warn!`
pub struct DependantsUnscheduled<'a> {
    pub bear: &'a str,
    pub count: usize,
}

impl Display for DependantsUnscheduled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Unscheduled {} dependants of failed bear {}",
            self.count, self.bear
        )
    }
}

impl StructuredLog for DependantsUnscheduled<'_> {
    fn log(&self) {
        tracing::warn!(bear = self.bear, count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "dependants_unscheduled",
            span_name = name,
            bear = self.bear,
            count = self.count,
        )
    }
}
