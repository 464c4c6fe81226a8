// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::GraphError;

/// Errors from the executor abstraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// `submit` was called after `shutdown`.
    #[error("cannot schedule new tasks after shutdown")]
    ShutDown,
}

/// Umbrella error returned by [`crate::run`].
///
/// Analyzer failures are deliberately absent: a failing analyzer is logged
/// and unscheduled together with its dependants while the rest of the run
/// continues, so it never surfaces here.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}
