// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Observer hooks for agent runs.
//!
//! Frontends can implement [`AgentObserver`] to render streamed text and
//! tool activity while a run is in progress. An error returned from a hook
//! ends the run.

use serde_json::Value;

use crate::error::Result;
use crate::llm::provider::Usage;
use crate::tools::ToolOutput;

use super::types::EndStep;

pub trait AgentObserver: Send + Sync {
    fn on_run_start(&mut self, _prompt: &str) -> Result<()> {
        Ok(())
    }

    /// Called before each chat model request; `step` starts at 1.
    fn on_model_call(&mut self, _step: usize) -> Result<()> {
        Ok(())
    }

    fn on_text_delta(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    /// Called after a model response that reported token usage.
    fn on_usage(&mut self, _usage: &Usage) -> Result<()> {
        Ok(())
    }

    fn on_tool_invocation(&mut self, _tool_name: &str, _args: &Value) -> Result<()> {
        Ok(())
    }

    fn on_tool_result(&mut self, _tool_name: &str, _output: &ToolOutput) -> Result<()> {
        Ok(())
    }

    fn on_run_end(&mut self, _end: &EndStep) -> Result<()> {
        Ok(())
    }
}

/// No-op observer for callers that don't need output hooks.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}

/// Observer that reports run progress through `tracing`.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl AgentObserver for LoggingObserver {
    fn on_run_start(&mut self, prompt: &str) -> Result<()> {
        tracing::info!(target: "erniebot.agent", prompt_chars = prompt.chars().count(), "agent run started");
        Ok(())
    }

    fn on_model_call(&mut self, step: usize) -> Result<()> {
        tracing::debug!(target: "erniebot.agent", step, "calling chat model");
        Ok(())
    }

    fn on_text_delta(&mut self, text: &str) -> Result<()> {
        tracing::trace!(target: "erniebot.agent", delta = text);
        Ok(())
    }

    fn on_usage(&mut self, usage: &Usage) -> Result<()> {
        tracing::debug!(
            target: "erniebot.agent",
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "model usage"
        );
        Ok(())
    }

    fn on_tool_invocation(&mut self, tool_name: &str, args: &Value) -> Result<()> {
        tracing::info!(target: "erniebot.agent", tool = tool_name, args = %args, "invoking tool");
        Ok(())
    }

    fn on_tool_result(&mut self, tool_name: &str, output: &ToolOutput) -> Result<()> {
        if output.is_error() {
            tracing::warn!(target: "erniebot.agent", tool = tool_name, output = %output.to_content(), "tool returned an error");
        } else {
            tracing::debug!(target: "erniebot.agent", tool = tool_name, output = %output.to_content(), "tool returned");
        }
        Ok(())
    }

    fn on_run_end(&mut self, end: &EndStep) -> Result<()> {
        tracing::info!(target: "erniebot.agent", reason = %end.reason, "agent run finished");
        Ok(())
    }
}
