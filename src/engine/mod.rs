// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod cache;
pub mod initializer;
pub mod scheduler;
pub mod tracker;

pub use cache::TaskCache;
pub use initializer::{initialize_dependencies, BearPool, DependencyPlan};
pub use scheduler::run;
pub use tracker::DependencyTracker;
