// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod bear;
pub mod executor;

pub use bear::{Bear, BearClass, BearId, DependencyResults};
pub use executor::{TaskExecutor, TaskFuture};
