// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::{CoreConfig, ExecutorKind};
use crate::executors::serial::SerialExecutor;
use crate::executors::worker_pool::WorkerPoolExecutor;
use crate::traits::TaskExecutor;

/// Factory for creating task executors from configuration
pub struct ExecutorFactory;

impl ExecutorFactory {
    /// Create a task executor based on the configured kind
    pub fn from_config(cfg: &CoreConfig) -> Arc<dyn TaskExecutor> {
        let max_concurrency = cfg.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        });

        match cfg.executor {
            ExecutorKind::WorkerPool => Arc::new(WorkerPoolExecutor::new(max_concurrency)),
            ExecutorKind::Serial => Arc::new(SerialExecutor::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_configured_kind() {
        let cfg = CoreConfig {
            executor: ExecutorKind::Serial,
            max_concurrency: None,
        };

        let executor = ExecutorFactory::from_config(&cfg);
        assert!(!executor.is_shut_down());
    }

    #[test]
    fn test_factory_defaults_to_worker_pool() {
        let cfg = CoreConfig::default();

        let executor = ExecutorFactory::from_config(&cfg);
        assert!(!executor.is_shut_down());
    }
}
