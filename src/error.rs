// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for the agent harness
//!
//! Tool failures are normally captured into conversation content by the
//! executor; the variants here are the conditions that end a run.

use thiserror::Error;

/// Main error type for agent operations
#[derive(Error, Debug)]
pub enum AgentError {
    /// Chat API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A function call named a tool that is not registered
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool execution errors
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    /// The chat model returned a response without the expected fields
    #[error("Malformed model response: {0}")]
    ModelResponseMalformed(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// API-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed (bad access token or ak/sk)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limited by the API
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Requested model has no chat endpoint
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Timeout waiting for response
    #[error("Request timed out")]
    Timeout,

    /// Streaming error
    #[error("Streaming error: {0}")]
    StreamError(String),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::ToolExecution(err.to_string())
    }
}
