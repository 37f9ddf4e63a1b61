// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Message types for chat interactions
//!
//! Messages are immutable once built: fields are private and only readable
//! through accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AgentError, Result};

/// Role of the message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Prompt from the user
    Human,
    /// Complete assistant response
    Ai,
    /// Assistant response assembled from a stream
    AiChunk,
    /// Result of a function call, fed back to the model
    Function,
}

impl Role {
    /// Role name on the chat API wire
    pub fn api_role(&self) -> &'static str {
        match self {
            Role::Human => "user",
            Role::Ai | Role::AiChunk => "assistant",
            Role::Function => "function",
        }
    }

    /// Whether the message was produced by the model
    pub fn is_ai(&self) -> bool {
        matches!(self, Role::Ai | Role::AiChunk)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Human => write!(f, "human"),
            Role::Ai => write!(f, "ai"),
            Role::AiChunk => write!(f, "ai-chunk"),
            Role::Function => write!(f, "function"),
        }
    }
}

/// A structured request from the model to invoke a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name
    pub name: String,
    /// Arguments as raw JSON text, exactly as the model produced them
    pub arguments: String,
    /// The model's reasoning for the call, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thoughts: Option<String>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
            thoughts: None,
        }
    }

    /// Parse the arguments as a JSON value
    pub fn parse_arguments(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.arguments).map_err(|e| {
            AgentError::ModelResponseMalformed(format!(
                "arguments for '{}' are not valid JSON: {}",
                self.name, e
            ))
        })
    }
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    role: Role,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    /// Function name, set on function results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    timestamp: DateTime<Utc>,
}

impl Message {
    fn build(
        role: Role,
        content: String,
        function_call: Option<FunctionCall>,
        name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            function_call,
            name,
            timestamp: Utc::now(),
        }
    }

    /// Create a human message
    pub fn human(content: impl Into<String>) -> Self {
        Self::build(Role::Human, content.into(), None, None)
    }

    /// Create a complete AI message
    pub fn ai(content: impl Into<String>) -> Self {
        Self::build(Role::Ai, content.into(), None, None)
    }

    /// Create an AI message that requests a function call
    pub fn ai_function_call(function_call: FunctionCall) -> Self {
        Self::build(Role::Ai, String::new(), Some(function_call), None)
    }

    /// Create an AI message assembled from streamed chunks
    pub fn ai_chunk(content: impl Into<String>, function_call: Option<FunctionCall>) -> Self {
        Self::build(Role::AiChunk, content.into(), function_call, None)
    }

    /// Create a function result message
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::build(Role::Function, content.into(), None, Some(name.into()))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn function_call(&self) -> Option<&FunctionCall> {
        self.function_call.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Check if the message asks for a tool
    pub fn has_function_call(&self) -> bool {
        self.function_call.is_some()
    }

    /// Serialize to the chat API message shape
    pub fn to_api_value(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "role": self.role.api_role(),
            "content": self.content,
        });
        if let Some(name) = &self.name {
            value["name"] = serde_json::json!(name);
        }
        if let Some(call) = &self.function_call {
            value["function_call"] = serde_json::json!({
                "name": call.name,
                "arguments": call.arguments,
            });
            if let Some(thoughts) = &call.thoughts {
                value["function_call"]["thoughts"] = serde_json::json!(thoughts);
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_message() {
        let message = Message::human("Hello");
        assert_eq!(message.role(), Role::Human);
        assert_eq!(message.content(), "Hello");
        assert!(!message.has_function_call());
        assert!(message.name().is_none());
    }

    #[test]
    fn test_function_message_carries_name() {
        let message = Message::function("calculator", r#"{"formula_result": 5}"#);
        assert_eq!(message.role(), Role::Function);
        assert_eq!(message.name(), Some("calculator"));
    }

    #[test]
    fn test_ai_chunk_with_function_call() {
        let call = FunctionCall::new("calculator", r#"{"math_formula": "1+4"}"#);
        let message = Message::ai_chunk("", Some(call));
        assert_eq!(message.role(), Role::AiChunk);
        assert!(message.role().is_ai());
        assert_eq!(message.function_call().unwrap().name, "calculator");
    }

    #[test]
    fn test_messages_get_distinct_ids() {
        assert_ne!(Message::human("a").id(), Message::human("a").id());
    }

    #[test]
    fn test_parse_arguments() {
        let call = FunctionCall::new("calculator", r#"{"math_formula": "1+4"}"#);
        let args = call.parse_arguments().unwrap();
        assert_eq!(args["math_formula"], "1+4");
    }

    #[test]
    fn test_parse_arguments_invalid_json() {
        let call = FunctionCall::new("calculator", "{math_formula");
        let err = call.parse_arguments().unwrap_err();
        assert!(matches!(err, AgentError::ModelResponseMalformed(_)));
    }

    #[test]
    fn test_api_roles() {
        assert_eq!(Role::Human.api_role(), "user");
        assert_eq!(Role::Ai.api_role(), "assistant");
        assert_eq!(Role::AiChunk.api_role(), "assistant");
        assert_eq!(Role::Function.api_role(), "function");
    }

    #[test]
    fn test_to_api_value_function_call() {
        let mut call = FunctionCall::new("calculator", r#"{"math_formula":"1+4"}"#);
        call.thoughts = Some("需要计算".to_string());
        let value = Message::ai_chunk("", Some(call)).to_api_value();

        assert_eq!(value["role"], "assistant");
        assert_eq!(value["function_call"]["name"], "calculator");
        assert_eq!(value["function_call"]["thoughts"], "需要计算");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_to_api_value_function_result() {
        let value = Message::function("calculator", "{}").to_api_value();
        assert_eq!(value["role"], "function");
        assert_eq!(value["name"], "calculator");
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::AiChunk.to_string(), "ai-chunk");
    }
}
