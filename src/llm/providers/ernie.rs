// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! ERNIE Bot chat model
//!
//! Implements the ChatModel trait against the ERNIE Bot chat API, reachable
//! through two backends:
//! - `qianfan`: access token passed as a query parameter; an ak/sk pair is
//!   exchanged for a token at the OAuth endpoint and cached
//! - `aistudio`: access token passed as `Authorization: token <...>`

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::settings::{Backend, ChatConfig};
use crate::error::{AgentError, ApiError, Result};
use crate::llm::message::{FunctionCall, Message};
use crate::llm::provider::{ChatChunk, ChatModel, ChatRequest, ChatResponse, ChunkStream, Usage};

const QIANFAN_BASE_URL: &str = "https://aip.baidubce.com";
const AISTUDIO_BASE_URL: &str = "https://aistudio.baidu.com";

/// Credentials for the chat API
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Ready-to-use access token
    pub access_token: Option<String>,
    /// API key (qianfan only)
    pub ak: Option<String>,
    /// Secret key (qianfan only)
    pub sk: Option<String>,
}

/// ERNIE Bot chat model
pub struct ErnieBot {
    client: Client,
    model: String,
    endpoint: &'static str,
    backend: Backend,
    base_url: String,
    credentials: Credentials,
    /// Token obtained from ak/sk, reused until the process exits
    exchanged_token: Mutex<Option<String>>,
}

/// Map a catalog model id to its chat endpoint
pub fn chat_endpoint(model: &str) -> Option<&'static str> {
    match model {
        "ernie-3.5" => Some("completions"),
        "ernie-turbo" => Some("eb-instant"),
        "ernie-4.0" => Some("completions_pro"),
        "ernie-3.5-8k" => Some("ernie-3.5-8k"),
        "ernie-speed" => Some("ernie_speed"),
        "ernie-speed-128k" => Some("ernie-speed-128k"),
        "ernie-tiny-8k" => Some("ernie-tiny-8k"),
        "ernie-char-8k" => Some("ernie-char-8k"),
        _ => None,
    }
}

impl ErnieBot {
    /// Create a client for the backend's public endpoint
    pub fn new(model: impl Into<String>, backend: Backend, credentials: Credentials) -> Result<Self> {
        let base_url = match backend {
            Backend::Qianfan => QIANFAN_BASE_URL,
            Backend::Aistudio => AISTUDIO_BASE_URL,
        };
        Self::with_base_url(model, backend, credentials, base_url)
    }

    /// Create with a custom base URL
    pub fn with_base_url(
        model: impl Into<String>,
        backend: Backend,
        credentials: Credentials,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let model = model.into();
        let endpoint = chat_endpoint(&model)
            .ok_or_else(|| AgentError::Api(ApiError::ModelNotFound(model.clone())))?;

        let has_token = credentials.access_token.is_some();
        let has_key_pair = credentials.ak.is_some() && credentials.sk.is_some();
        match backend {
            Backend::Aistudio if !has_token => {
                return Err(AgentError::Config(
                    "the aistudio backend requires an access token".to_string(),
                ))
            }
            Backend::Qianfan if !has_token && !has_key_pair => {
                return Err(AgentError::Config(
                    "the qianfan backend requires an access token or an ak/sk pair".to_string(),
                ))
            }
            _ => {}
        }

        Ok(Self {
            client: Client::new(),
            model,
            endpoint,
            backend,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            exchanged_token: Mutex::new(None),
        })
    }

    /// Build a client from settings
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let credentials = Credentials {
            access_token: config.resolve_access_token(),
            ak: config.ak.clone(),
            sk: config.sk.clone(),
        };
        match &config.base_url {
            Some(url) => Self::with_base_url(&config.model, config.backend, credentials, url),
            None => Self::new(&config.model, config.backend, credentials),
        }
    }

    fn chat_url(&self) -> String {
        match self.backend {
            Backend::Qianfan => format!(
                "{}/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/{}",
                self.base_url, self.endpoint
            ),
            Backend::Aistudio => format!("{}/llm/lmapi/v1/chat/{}", self.base_url, self.endpoint),
        }
    }

    /// Resolve the token to send, exchanging ak/sk on first use
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = &self.credentials.access_token {
            return Ok(token.clone());
        }

        let mut cached = self.exchanged_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let (ak, sk) = match (&self.credentials.ak, &self.credentials.sk) {
            (Some(ak), Some(sk)) => (ak, sk),
            _ => {
                return Err(AgentError::Api(ApiError::AuthenticationFailed(
                    "no access token and no ak/sk pair".to_string(),
                )))
            }
        };

        tracing::debug!(target: "erniebot.llm", "exchanging ak/sk for an access token");
        let response = self
            .client
            .post(format!("{}/oauth/2.0/token", self.base_url))
            .query(&[
                ("grant_type", "client_credentials"),
                ("client_id", ak.as_str()),
                ("client_secret", sk.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Api(ApiError::InvalidResponse(e.to_string())))?;

        match body.access_token {
            Some(token) => {
                *cached = Some(token.clone());
                Ok(token)
            }
            None => Err(AgentError::Api(ApiError::AuthenticationFailed(
                body.error_description
                    .or(body.error)
                    .unwrap_or_else(|| "token exchange failed".to_string()),
            ))),
        }
    }

    fn build_body(&self, request: &ChatRequest, stream: bool) -> Result<serde_json::Value> {
        let messages: Vec<serde_json::Value> =
            request.messages.iter().map(Message::to_api_value).collect();

        let mut body = serde_json::json!({
            "messages": messages,
            "stream": stream,
        });
        if !request.functions.is_empty() {
            body["functions"] = serde_json::to_value(&request.functions)?;
        }
        if let Some(system) = &request.system {
            body["system"] = serde_json::json!(system);
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        Ok(body)
    }

    async fn send(&self, request: &ChatRequest, stream: bool) -> Result<reqwest::Response> {
        let token = self.access_token().await?;
        let body = self.build_body(request, stream)?;

        tracing::debug!(
            target: "erniebot.llm",
            model = %self.model,
            messages = request.messages.len(),
            functions = request.functions.len(),
            stream,
            "sending chat request"
        );

        let builder = self.client.post(self.chat_url()).json(&body);
        let builder = match self.backend {
            Backend::Qianfan => builder.query(&[("access_token", token.as_str())]),
            Backend::Aistudio => builder.header("Authorization", format!("token {}", token)),
        };

        let response = builder.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Api(ApiError::ServerError {
                status,
                message: format!("ERNIE Bot API error: {}", body),
            }));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatModel for ErnieBot {
    fn name(&self) -> &str {
        "ernie-bot"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let response = self.send(&request, false).await?;
        let body: ErnieResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Api(ApiError::InvalidResponse(e.to_string())))?;
        body.check()?;

        let message = match body.function_call {
            Some(call) => Message::ai_function_call(call.into()),
            None => Message::ai(body.result),
        };

        Ok(ChatResponse {
            id: body
                .id
                .unwrap_or_else(|| format!("ernie-{}", uuid::Uuid::new_v4())),
            message,
            usage: body.usage.unwrap_or_default(),
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let response = self.send(&request, true).await?;

        // Errors come back as a plain JSON body rather than an event stream
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);
        if is_json {
            let body: ErnieResponse = response
                .json()
                .await
                .map_err(|e| AgentError::Api(ApiError::InvalidResponse(e.to_string())))?;
            body.check()?;
            let chunk = body.into_chunk().end();
            return Ok(Box::pin(futures::stream::iter(vec![Ok::<_, AgentError>(chunk)])));
        }

        let mut events = response.bytes_stream().eventsource();

        let event_stream = async_stream::try_stream! {
            while let Some(event) = events.next().await {
                let event = event
                    .map_err(|e| AgentError::Api(ApiError::StreamError(e.to_string())))?;
                if let Some(chunk) = parse_event_data(&event.data)? {
                    yield chunk;
                }
            }
        };

        Ok(Box::pin(event_stream))
    }
}

/// Parse the data field of one server-sent event into a chunk
fn parse_event_data(data: &str) -> Result<Option<ChatChunk>> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }

    let body: ErnieResponse = serde_json::from_str(data)
        .map_err(|e| AgentError::Api(ApiError::InvalidResponse(e.to_string())))?;
    body.check()?;
    Ok(Some(body.into_chunk()))
}

/// Classify a failed request: timeouts and connection failures are
/// retryable API errors, anything else stays a plain HTTP error
fn transport_error(error: reqwest::Error) -> AgentError {
    if error.is_timeout() {
        AgentError::Api(ApiError::Timeout)
    } else if error.is_connect() || error.is_request() {
        AgentError::Api(ApiError::Network(error.to_string()))
    } else {
        AgentError::Http(error)
    }
}

/// Map an API error code to an error
fn api_error(code: i64, message: String) -> AgentError {
    let api_error = match code {
        110 | 111 => ApiError::AuthenticationFailed(message),
        4 | 17 | 18 | 336501 | 336502 => ApiError::RateLimited(message),
        336003 => ApiError::InvalidResponse(message),
        _ => ApiError::ServerError {
            status: 200,
            message: format!("error code {}: {}", code, message),
        },
    };
    AgentError::Api(api_error)
}

// ERNIE Bot API types

#[derive(Debug, Deserialize)]
struct ErnieResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    result: String,
    #[serde(default)]
    is_end: bool,
    #[serde(default)]
    function_call: Option<ErnieFunctionCall>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_msg: Option<String>,
}

impl ErnieResponse {
    fn check(&self) -> Result<()> {
        match self.error_code {
            Some(code) if code != 0 => Err(api_error(
                code,
                self.error_msg.clone().unwrap_or_default(),
            )),
            _ => Ok(()),
        }
    }

    fn into_chunk(self) -> ChatChunk {
        ChatChunk {
            content: self.result,
            function_call: self.function_call.map(Into::into),
            is_end: self.is_end,
            usage: self.usage,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErnieFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
    #[serde(default)]
    thoughts: Option<String>,
}

impl From<ErnieFunctionCall> for FunctionCall {
    fn from(call: ErnieFunctionCall) -> Self {
        FunctionCall {
            name: call.name,
            arguments: call.arguments,
            thoughts: call.thoughts,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}
