// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic messages are centralized as struct types implementing
//! `Display` (human-readable text with stable prefixes) and
//! `StructuredLog` (machine-readable fields plus span creation). Keeping
//! the text in one place means the stable prefixes consumers grep for live
//! next to the fields dashboards query for.

pub mod messages;
