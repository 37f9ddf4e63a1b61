// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Conversation memory
//!
//! Memory is the ordered history the agent sends to the chat model on each
//! turn. It is append-only: entries are never reordered or removed.

mod whole;

pub use whole::WholeMemory;

use crate::llm::message::Message;

/// Ordered, append-only conversation history
pub trait Memory: Send + Sync {
    /// Append a message at the end
    fn append(&mut self, message: Message);

    /// All stored messages, oldest first
    fn get_messages(&self) -> &[Message];

    fn len(&self) -> usize {
        self.get_messages().len()
    }

    fn is_empty(&self) -> bool {
        self.get_messages().is_empty()
    }

    /// The most recent message
    fn last(&self) -> Option<&Message> {
        self.get_messages().last()
    }
}
