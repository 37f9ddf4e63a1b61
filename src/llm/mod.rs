// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat model module
//!
//! Provides the chat model abstraction, message types, and the ERNIE Bot
//! client.

pub mod message;
pub mod mock_provider;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod streaming;

pub use message::*;
pub use provider::*;
