// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::ConfigError;

/// Engine options for the execution core.
///
/// Typically loaded from a YAML document:
///
/// ```yaml
/// executor: worker_pool
/// max_concurrency: 4
/// ```
///
/// Config-file *discovery* is the embedder's concern; the core only
/// parses and validates what it is handed.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CoreConfig {
    #[serde(default)]
    pub executor: ExecutorKind,
    /// Upper bound on concurrently running tasks. `None` means "size to
    /// the machine".
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == Some(0) {
            return Err(ConfigError::InvalidMaxConcurrency);
        }
        Ok(())
    }
}

/// Which executor implementation to run tasks on.
///
/// * `WorkerPool` - parallel, tokio-spawned workers (default)
/// * `Serial` - cooperative in-place execution, fully deterministic
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    #[default]
    WorkerPool,
    Serial,
}

/// Parse and validate a configuration document.
pub fn parse_config(contents: &str) -> Result<CoreConfig, ConfigError> {
    let config: CoreConfig = serde_yaml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<CoreConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config("executor: serial\nmax_concurrency: 2\n").unwrap();

        assert_eq!(
            config,
            CoreConfig {
                executor: ExecutorKind::Serial,
                max_concurrency: Some(2),
            }
        );
    }

    #[test]
    fn test_defaults_apply() {
        let config = parse_config("{}").unwrap();

        assert_eq!(config.executor, ExecutorKind::WorkerPool);
        assert_eq!(config.max_concurrency, None);
    }

    #[test]
    fn test_unknown_executor_kind_is_rejected() {
        assert!(matches!(
            parse_config("executor: distributed"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        assert!(matches!(
            parse_config("max_concurrency: 0"),
            Err(ConfigError::InvalidMaxConcurrency)
        ));
    }
}
