// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::error::{AgentError, Result};
use crate::llm::providers::chat_endpoint;

use super::{ChatConfig, Settings};

impl ChatConfig {
    /// Get the access token, checking the env var first.
    pub fn resolve_access_token(&self) -> Option<String> {
        std::env::var(&self.access_token_env)
            .ok()
            .filter(|token| !token.is_empty())
            .or_else(|| self.access_token.clone())
    }
}

impl Settings {
    /// Reject values the agent cannot run with.
    pub fn validate(&self) -> Result<()> {
        if chat_endpoint(&self.chat.model).is_none() {
            return Err(AgentError::Config(format!(
                "model '{}' is not a chat model",
                self.chat.model
            )));
        }
        if self.agent.max_steps == 0 {
            return Err(AgentError::Config(
                "agent.max_steps must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.resilience.jitter) {
            return Err(AgentError::Config(
                "resilience.jitter must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }
}
