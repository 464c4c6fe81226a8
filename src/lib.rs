// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod analysis;      // scheduling context + opaque task/result values
pub mod config;        // engine options
pub mod engine;        // dependency resolution + scheduling
pub mod errors;        // error handling
pub mod executors;     // task executor implementations
pub mod observability;
pub mod traits;        // unified abstractions

pub use analysis::{AnalysisResult, FileDict, Section, TaskCall, TaskDigest};
pub use engine::{initialize_dependencies, run, DependencyPlan, DependencyTracker, TaskCache};
pub use traits::{Bear, BearClass, BearId, DependencyResults, TaskExecutor};
