// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod section;
mod task;

pub use section::Section;
pub use task::{TaskCall, TaskDigest};

use std::collections::HashMap;

/// File contents a run operates on, keyed by path. The core never reads
/// this; it exists for analyzer domain logic and for scheduling identity.
pub type FileDict = HashMap<String, Vec<String>>;

/// A single value produced by an analyzer task. Opaque to the core: values
/// are delivered to the result sink and to dependants, never interpreted.
pub type AnalysisResult = serde_json::Value;
