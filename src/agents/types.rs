// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Step and response types for agent runs

use serde::Serialize;

use crate::llm::message::Message;
use crate::llm::provider::Usage;
use crate::tools::ToolOutput;

/// One iteration record of an agent run
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    /// The model called a tool and the tool ran
    Tool(ToolStep),
    /// The run finished; always the last step
    End(EndStep),
}

impl AgentStep {
    pub fn is_end(&self) -> bool {
        matches!(self, AgentStep::End(_))
    }

    pub fn as_tool(&self) -> Option<&ToolStep> {
        match self {
            AgentStep::Tool(step) => Some(step),
            AgentStep::End(_) => None,
        }
    }

    pub fn as_end(&self) -> Option<&EndStep> {
        match self {
            AgentStep::End(step) => Some(step),
            AgentStep::Tool(_) => None,
        }
    }
}

/// The tool invocation the model requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub tool_name: String,
    /// Arguments as the raw JSON text from the model
    pub tool_args: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolStep {
    pub info: ToolInfo,
    pub outcome: ToolOutput,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The model answered without calling a tool
    Completed,
    /// The model kept calling tools past the step limit
    MaxStepsReached,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndReason::Completed => write!(f, "completed"),
            EndReason::MaxStepsReached => write!(f, "max steps reached"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndStep {
    pub reason: EndReason,
    /// The final answer text
    pub result: String,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// The final answer text
    pub text: String,
    /// Every message of the run: the human message, tool-call and function
    /// messages, then the final AI message
    pub chat_history: Vec<Message>,
    /// Steps in the order they were yielded
    pub steps: Vec<AgentStep>,
    pub status: EndReason,
    /// Token usage summed over every model call of the run
    pub usage: Usage,
}

impl AgentResponse {
    /// Tool steps of the run, in order
    pub fn tool_steps(&self) -> impl Iterator<Item = &ToolStep> {
        self.steps.iter().filter_map(AgentStep::as_tool)
    }
}
