// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! erniebot-agent - a function-calling agent harness for ERNIE Bot.
//!
//! This crate exposes the runtime used by the `ernie` CLI (`src/main.rs`).
//!
//! Architecture highlights:
//! - `catalog`: static table of known model identifiers
//! - `llm`: chat model abstraction, stream accumulation, retry, and the ERNIE Bot client
//! - `agents`: the streaming function-calling loop and its step types
//! - `memory`: append-only conversation history
//! - `tools`: tool trait, registry, executor, and the calculator tool
//! - `config`, `cli`, `error`: settings, argument parsing, error types

pub mod agents;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod tools;

pub use error::{AgentError, Result};
