// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Agents
//!
//! The function-calling agent loop, its step types, and the observer hooks
//! frontends use to follow a run.

pub mod function_agent;
pub mod observer;
pub mod types;

pub use function_agent::{FunctionAgent, DEFAULT_MAX_STEPS, STOPPED_EARLY_MESSAGE};
pub use observer::{AgentObserver, LoggingObserver, NoopObserver};
pub use types::*;
