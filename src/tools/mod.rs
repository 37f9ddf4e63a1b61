// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Tool system
//!
//! Tools are functions the chat model may call during an agent run. Each tool
//! describes itself with a [`FunctionDefinition`] and takes and returns JSON.

pub mod builtin;
pub mod definition;
pub mod executor;

pub use builtin::CalculatorTool;
pub use definition::*;
pub use executor::*;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::llm::provider::FunctionDefinition;

/// Outcome of running a tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// The tool returned a JSON value
    Success(Value),
    /// The tool failed; the message is fed back to the model
    Error(String),
}

impl ToolOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Error(_))
    }

    /// The JSON payload sent back to the model
    pub fn to_value(&self) -> Value {
        match self {
            ToolOutput::Success(value) => value.clone(),
            ToolOutput::Error(message) => serde_json::json!({ "error": message }),
        }
    }

    /// Function message content: the payload as compact JSON text
    pub fn to_content(&self) -> String {
        self.to_value().to_string()
    }
}

/// Trait for tools the agent can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the function definition sent to the chat model
    fn definition(&self) -> FunctionDefinition;

    /// Execute the tool with the parsed call arguments
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Registry of available tools
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in tools
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CalculatorTool::new()));
        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!(target: "erniebot.tools", tool = %name, "replaced registered tool");
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Get all tool definitions, ordered by name
    pub fn definitions(&self) -> Vec<FunctionDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Get all tool names, ordered
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
