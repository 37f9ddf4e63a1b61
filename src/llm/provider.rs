// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat model trait and related types
//!
//! Defines the seam between the agent loop and a chat backend.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::Result;
use crate::llm::message::{FunctionCall, Message};

/// Stream of response chunks from a chat model
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatChunk>> + Send>>;

/// Main trait for chat backends
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Backend name (e.g., "ernie-bot", "mock")
    fn name(&self) -> &str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Non-streaming completion
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Streaming completion
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream>;
}

/// Request for a chat completion
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// Full message history, oldest first
    pub messages: Vec<Message>,

    /// Functions the model may call
    pub functions: Vec<FunctionDefinition>,

    /// System prompt
    pub system: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

/// Complete response from a chat model
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Response ID
    pub id: String,

    /// The assistant message, possibly carrying a function call
    pub message: Message,

    /// Token usage
    pub usage: Usage,
}

/// One piece of a streamed response
#[derive(Debug, Clone, Default)]
pub struct ChatChunk {
    /// Text delta
    pub content: String,

    /// Function call (or a fragment of one)
    pub function_call: Option<FunctionCall>,

    /// Whether this is the last chunk
    pub is_end: bool,

    /// Token usage, usually only on the last chunk
    pub usage: Option<Usage>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl std::ops::AddAssign for Usage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

/// Function schema offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,

    /// What the function does
    pub description: String,

    /// Parameter schema (JSON Schema)
    pub parameters: ToolInputSchema,

    /// Response schema, if the tool documents one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<ToolInputSchema>,
}

/// JSON schema object for tool parameters or responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    /// Schema type (always "object")
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Property definitions
    pub properties: serde_json::Value,

    /// Required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ChatRequest {
    /// Create a new request
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Set the functions
    pub fn with_functions(mut self, functions: Vec<FunctionDefinition>) -> Self {
        self.functions = functions;
        self
    }

    /// Set the system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl ChatChunk {
    /// A text-only chunk
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Mark this chunk as the last one
    pub fn end(mut self) -> Self {
        self.is_end = true;
        self
    }
}
