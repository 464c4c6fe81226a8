// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failure reported by an analyzer from `generate_tasks` or `analyze`.
///
/// The core never inspects the contents; the value is logged and the
/// analyzer, together with its transitive dependants, is unscheduled.
#[derive(Debug, Error)]
pub enum BearError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BearError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}
