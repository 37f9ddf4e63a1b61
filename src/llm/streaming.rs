// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Streaming response handling
//!
//! Folds streamed chunks into a single assistant message, separate from the
//! I/O that produces them.

use crate::error::{AgentError, Result};
use crate::llm::message::{FunctionCall, Message};
use crate::llm::provider::{ChatChunk, Usage};

/// Accumulator for streamed chat chunks
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    /// Text received so far
    content: String,
    /// Function call assembled so far
    function_call: Option<FunctionCall>,
    /// Usage from the stream, if reported
    usage: Option<Usage>,
    /// Whether the end marker has been seen
    finished: bool,
    chunk_count: usize,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a chunk and return any text delta to display
    pub fn push(&mut self, chunk: ChatChunk) -> Option<String> {
        self.chunk_count += 1;
        if chunk.usage.is_some() {
            self.usage = chunk.usage;
        }
        if chunk.is_end {
            self.finished = true;
        }

        if let Some(call) = chunk.function_call {
            match &mut self.function_call {
                // Fragments of the same call arrive with the same name
                Some(existing) if existing.name == call.name || call.name.is_empty() => {
                    existing.arguments.push_str(&call.arguments);
                    if call.thoughts.is_some() {
                        existing.thoughts = call.thoughts;
                    }
                }
                _ => self.function_call = Some(call),
            }
        }

        if chunk.content.is_empty() {
            None
        } else {
            self.content.push_str(&chunk.content);
            Some(chunk.content)
        }
    }

    /// Text received so far
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether a function call has been seen
    pub fn has_function_call(&self) -> bool {
        self.function_call.is_some()
    }

    /// Whether the end marker has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn usage(&self) -> Option<Usage> {
        self.usage
    }

    /// Consume the accumulator and build the assistant message
    pub fn finish(self) -> Result<Message> {
        if self.chunk_count == 0 {
            return Err(AgentError::ModelResponseMalformed(
                "stream ended without any chunks".to_string(),
            ));
        }
        match self.function_call {
            Some(call) => {
                if call.name.is_empty() {
                    return Err(AgentError::ModelResponseMalformed(
                        "function call without a name".to_string(),
                    ));
                }
                Ok(Message::ai_chunk(self.content, Some(call)))
            }
            None if self.content.is_empty() => Err(AgentError::ModelResponseMalformed(
                "response has neither content nor function call".to_string(),
            )),
            None => Ok(Message::ai(self.content)),
        }
    }
}
