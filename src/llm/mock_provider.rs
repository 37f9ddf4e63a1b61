// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock chat model for testing
//!
//! Scripted implementation of the ChatModel trait that can drive the agent
//! loop in tests without making real API calls.

use async_trait::async_trait;
use futures::stream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{AgentError, ApiError, Result};
use crate::llm::message::{FunctionCall, Message};
use crate::llm::provider::{ChatChunk, ChatModel, ChatRequest, ChatResponse, ChunkStream, Usage};

/// A pre-configured response for the mock model
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Plain answer, streamed in pieces of `chunk_chars` characters
    Text(String),
    /// Function call with raw JSON arguments
    FunctionCall { name: String, arguments: String },
    /// A response carrying neither text nor a function call
    Empty,
    /// A server error (status 503)
    Error(String),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        MockResponse::Text(text.into())
    }

    pub fn function_call(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        MockResponse::FunctionCall {
            name: name.into(),
            arguments: arguments.to_string(),
        }
    }
}

/// A scripted chat model
#[derive(Clone)]
pub struct MockChatModel {
    model: String,
    /// Responses returned in order; the last one repeats
    responses: Arc<Mutex<Vec<MockResponse>>>,
    call_count: Arc<AtomicUsize>,
    recorded_requests: Arc<Mutex<Vec<ChatRequest>>>,
    chunk_chars: usize,
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("mock chat model lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl MockChatModel {
    /// Create a mock that answers "Mock response"
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Arc::new(Mutex::new(vec![MockResponse::text("Mock response")])),
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(vec![])),
            chunk_chars: 4,
        }
    }

    /// Queue responses (returned in order, the last one repeats)
    pub fn with_responses(self, responses: Vec<MockResponse>) -> Self {
        *lock(&self.responses) = responses;
        self
    }

    /// Answer every request with a plain text response
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.with_responses(vec![MockResponse::text(text)])
    }

    /// Set how many characters each streamed text chunk carries
    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Number of chat calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// All recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        lock(&self.recorded_requests).clone()
    }

    /// The last request made
    pub fn last_request(&self) -> Option<ChatRequest> {
        lock(&self.recorded_requests).last().cloned()
    }

    fn next_response(&self, request: &ChatRequest) -> Option<MockResponse> {
        lock(&self.recorded_requests).push(request.clone());
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        let responses = lock(&self.responses);
        if responses.is_empty() {
            None
        } else {
            Some(responses[count.min(responses.len() - 1)].clone())
        }
    }

    fn usage() -> Usage {
        Usage {
            prompt_tokens: 10,
            completion_tokens: 20,
            total_tokens: 30,
        }
    }

    fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(self.chunk_chars)
            .map(|c| c.iter().collect())
            .collect()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let message = match self.next_response(&request) {
            Some(MockResponse::Text(text)) => Message::ai(text),
            Some(MockResponse::FunctionCall { name, arguments }) => {
                Message::ai_function_call(FunctionCall::new(name, arguments))
            }
            Some(MockResponse::Error(message)) => {
                return Err(AgentError::Api(ApiError::ServerError {
                    status: 503,
                    message,
                }))
            }
            Some(MockResponse::Empty) | None => Message::ai(""),
        };

        Ok(ChatResponse {
            id: format!("mock-{}", uuid::Uuid::new_v4().simple()),
            message,
            usage: Self::usage(),
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let mut chunks = match self.next_response(&request) {
            Some(MockResponse::Text(text)) => self
                .split_text(&text)
                .into_iter()
                .map(ChatChunk::text)
                .collect::<Vec<_>>(),
            Some(MockResponse::FunctionCall { name, arguments }) => vec![ChatChunk {
                function_call: Some(FunctionCall::new(name, arguments)),
                ..Default::default()
            }],
            Some(MockResponse::Error(message)) => {
                return Err(AgentError::Api(ApiError::ServerError {
                    status: 503,
                    message,
                }))
            }
            Some(MockResponse::Empty) | None => vec![],
        };

        if chunks.is_empty() {
            chunks.push(ChatChunk::default());
        }
        if let Some(last) = chunks.last_mut() {
            last.is_end = true;
            last.usage = Some(Self::usage());
        }

        Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
    }
}
