// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod serial;
pub mod worker_pool;

pub use factory::ExecutorFactory;
pub use serial::SerialExecutor;
pub use worker_pool::WorkerPoolExecutor;
