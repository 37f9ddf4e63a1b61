// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::llm::message::Message;

use super::Memory;

/// Memory that keeps every message
#[derive(Debug, Clone, Default)]
pub struct WholeMemory {
    messages: Vec<Message>,
}

impl WholeMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Memory for WholeMemory {
    fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn get_messages(&self) -> &[Message] {
        &self.messages
    }
}
