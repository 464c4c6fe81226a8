// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod bear;
mod config;
mod execution;
mod graph;

pub use bear::BearError;
pub use config::ConfigError;
pub use execution::{ExecutionError, ExecutorError};
pub use graph::GraphError;
