// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements:
//!
//! * `Display` - human-readable output with a stable prefix
//! * `StructuredLog` - log emission with machine-readable fields and span
//!   creation for tracing
//!
//! # Usage
//!
//! ```ignore
//! use ursine::observability::messages::{StructuredLog, core::ExecutionStarted};
//!
//! ExecutionStarted { bear_count: 5 }.log();
//! ```

pub mod core;

use tracing::Span;

/// Trait for messages that support structured logging and tracing.
///
/// `log` emits the event at the level matching the message's semantic
/// meaning, carrying both the `Display` text and the structured fields.
/// `span` creates a `tracing::Span` with the same fields as attributes.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
