// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management
//!
//! Handles loading and saving settings from ~/.erniebot/settings.json

use serde::{Deserialize, Serialize};

mod io;
mod validation;

/// Main settings structure, stored in ~/.erniebot/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Chat API configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentSettings,

    /// Retry and resilience settings for API calls
    #[serde(default)]
    pub resilience: ResilienceConfig,
}

/// Which service hosts the chat API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Baidu Qianfan platform
    #[default]
    Qianfan,
    /// Baidu AI Studio
    Aistudio,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Qianfan => write!(f, "qianfan"),
            Backend::Aistudio => write!(f, "aistudio"),
        }
    }
}

/// Chat API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatConfig {
    /// Backend hosting the API
    #[serde(default)]
    pub backend: Backend,

    /// Default model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Access token (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Environment variable name for the access token
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,

    /// API key for the ak/sk token exchange (qianfan)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ak: Option<String>,

    /// Secret key for the ak/sk token exchange (qianfan)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sk: Option<String>,

    /// Base URL for the API (for proxies and tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Agent loop settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSettings {
    /// Maximum tool steps before a run is stopped
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// System prompt sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Retry configuration for chat API calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResilienceConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds (cap for backoff)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Jitter percentage (0.0 to 1.0) for randomizing delays
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

fn default_model() -> String {
    "ernie-3.5".to_string()
}

fn default_access_token_env() -> String {
    "EB_ACCESS_TOKEN".to_string()
}

fn default_max_steps() -> usize {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    16000
}

fn default_jitter() -> f64 {
    0.25
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model: default_model(),
            access_token: None,
            access_token_env: default_access_token_env(),
            ak: None,
            sk: None,
            base_url: None,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            system_prompt: None,
        }
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chat.backend, Backend::Qianfan);
        assert_eq!(settings.chat.model, "ernie-3.5");
        assert_eq!(settings.chat.access_token_env, "EB_ACCESS_TOKEN");
        assert_eq!(settings.agent.max_steps, 5);
        assert_eq!(settings.resilience.max_retries, 3);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_json() {
        let settings: Settings = serde_json::from_str(
            r#"{"chat": {"backend": "aistudio", "model": "ernie-4.0"}, "agent": {"max_steps": 2}}"#,
        )
        .unwrap();
        assert_eq!(settings.chat.backend, Backend::Aistudio);
        assert_eq!(settings.chat.model, "ernie-4.0");
        assert_eq!(settings.chat.access_token_env, "EB_ACCESS_TOKEN");
        assert_eq!(settings.agent.max_steps, 2);
        assert!((settings.resilience.jitter - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_secrets_not_serialized_when_absent() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert!(value["chat"].get("access_token").is_none());
        assert!(value["chat"].get("ak").is_none());
        assert_eq!(value["chat"]["backend"], "qianfan");
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Aistudio.to_string(), "aistudio");
    }
}
