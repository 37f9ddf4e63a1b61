// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Tool execution engine
//!
//! Resolves a function call to a registered tool and runs it. An unknown
//! tool name is an error for the caller; a failure inside the tool becomes a
//! [`ToolOutput::Error`] so the model can see it.

use std::time::Instant;

use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::llm::provider::FunctionDefinition;

use super::{ToolOutput, ToolRegistry};

/// Tool executor over a registry
#[derive(Debug, Clone, Default)]
pub struct ToolExecutor {
    registry: ToolRegistry,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Get tool definitions for the chat model
    pub fn tool_definitions(&self) -> Vec<FunctionDefinition> {
        self.registry.definitions()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Get mutable access to the tool registry for registration of additional tools
    pub fn registry_mut(&mut self) -> &mut ToolRegistry {
        &mut self.registry
    }

    /// Run the named tool
    pub async fn execute(&self, tool_name: &str, args: Value) -> Result<ToolOutput> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| AgentError::ToolNotFound(tool_name.to_string()))?
            .clone();

        let started = Instant::now();
        let output = match tool.execute(args).await {
            Ok(value) => ToolOutput::Success(value),
            Err(e) => {
                tracing::warn!(target: "erniebot.tools", tool = tool_name, error = %e, "tool failed");
                ToolOutput::Error(e.to_string())
            }
        };
        tracing::debug!(
            target: "erniebot.tools",
            tool = tool_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            is_error = output.is_error(),
            "tool finished"
        );

        Ok(output)
    }
}
