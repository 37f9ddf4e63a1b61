// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Function-calling agent
//!
//! Each run sends the conversation to the chat model, runs any tool the
//! model calls, feeds the result back, and repeats until the model answers
//! in plain text. The run is a pull-based stream yielding one step per
//! iteration.
//!
//! Messages produced while the run is in progress live in a run-local
//! working history. Memory only receives the human message and the final AI
//! message, both appended together once the answer is known, so a failed or
//! abandoned run leaves memory unchanged.

use std::sync::Arc;

use futures::{Stream, StreamExt};

use crate::config::settings::Settings;
use crate::error::{AgentError, Result};
use crate::llm::message::Message;
use crate::llm::provider::{ChatModel, ChatRequest, Usage};
use crate::llm::retry::{with_retry, RetryConfig};
use crate::llm::streaming::ChunkAccumulator;
use crate::memory::{Memory, WholeMemory};
use crate::tools::{ToolExecutor, ToolRegistry};

use super::observer::{AgentObserver, LoggingObserver};
use super::types::{AgentResponse, AgentStep, EndReason, EndStep, ToolInfo, ToolStep};

/// Default limit on tool steps per run
pub const DEFAULT_MAX_STEPS: usize = 5;

/// Final AI message when a run hits the step limit
pub const STOPPED_EARLY_MESSAGE: &str = "Agent run stopped early.";

/// Agent that lets the chat model call tools
pub struct FunctionAgent {
    llm: Arc<dyn ChatModel>,
    executor: ToolExecutor,
    memory: Box<dyn Memory>,
    observer: Box<dyn AgentObserver>,
    max_steps: usize,
    system_prompt: Option<String>,
    retry: RetryConfig,
    /// Usage of the current or most recent run
    run_usage: Usage,
}

impl FunctionAgent {
    /// Create an agent with empty whole memory
    pub fn new(llm: Arc<dyn ChatModel>, tools: ToolRegistry) -> Self {
        Self {
            llm,
            executor: ToolExecutor::new(tools),
            memory: Box::new(WholeMemory::new()),
            observer: Box::new(LoggingObserver),
            max_steps: DEFAULT_MAX_STEPS,
            system_prompt: None,
            retry: RetryConfig::default(),
            run_usage: Usage::default(),
        }
    }

    /// Apply the agent and resilience sections of the settings
    pub fn with_settings(self, settings: &Settings) -> Self {
        let agent = self
            .with_max_steps(settings.agent.max_steps)
            .with_retry_config(RetryConfig::from(&settings.resilience));
        match &settings.agent.system_prompt {
            Some(prompt) => agent.with_system_prompt(prompt.clone()),
            None => agent,
        }
    }

    pub fn with_memory(mut self, memory: impl Memory + 'static) -> Self {
        self.memory = Box::new(memory);
        self
    }

    pub fn with_observer(mut self, observer: impl AgentObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Set the tool step limit (at least 1)
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn memory(&self) -> &dyn Memory {
        self.memory.as_ref()
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.executor.registry()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Run the agent on a prompt, yielding each step with the messages it
    /// produced.
    ///
    /// A tool step carries the AI function-call message and the function
    /// result. The end step is yielded exactly once, last, with the final AI
    /// message.
    pub fn run_stream<'a>(
        &'a mut self,
        prompt: &str,
    ) -> impl Stream<Item = Result<(AgentStep, Vec<Message>)>> + 'a {
        let prompt = prompt.to_string();

        async_stream::try_stream! {
            self.run_usage = Usage::default();
            self.observer.on_run_start(&prompt)?;

            let human = Message::human(prompt);
            let mut working = vec![human.clone()];
            let functions = self.executor.tool_definitions();
            let mut tool_steps = 0usize;

            loop {
                let messages: Vec<Message> = self
                    .memory
                    .get_messages()
                    .iter()
                    .chain(working.iter())
                    .cloned()
                    .collect();
                let mut request = ChatRequest::new(messages).with_functions(functions.clone());
                if let Some(system) = &self.system_prompt {
                    request = request.with_system(system.clone());
                }

                self.observer.on_model_call(tool_steps + 1)?;
                let llm = Arc::clone(&self.llm);
                let mut chunks = with_retry(
                    || {
                        let llm = Arc::clone(&llm);
                        let request = request.clone();
                        async move { llm.chat_stream(request).await }
                    },
                    &self.retry,
                    "chat_stream",
                )
                .await?;

                let mut accumulator = ChunkAccumulator::new();
                while let Some(chunk) = chunks.next().await {
                    if let Some(delta) = accumulator.push(chunk?) {
                        self.observer.on_text_delta(&delta)?;
                    }
                }
                if let Some(usage) = accumulator.usage() {
                    self.run_usage += usage;
                    self.observer.on_usage(&usage)?;
                }
                let message = accumulator.finish()?;

                let call = match message.function_call().cloned() {
                    Some(call) => call,
                    None => {
                        let end = EndStep {
                            reason: EndReason::Completed,
                            result: message.content().to_string(),
                        };
                        self.memory.append(human.clone());
                        self.memory.append(message.clone());
                        self.observer.on_run_end(&end)?;
                        yield (AgentStep::End(end), vec![message]);
                        break;
                    }
                };

                if tool_steps >= self.max_steps {
                    tracing::warn!(
                        target: "erniebot.agent",
                        max_steps = self.max_steps,
                        tool = %call.name,
                        "step limit reached, stopping run"
                    );
                    let stopped = Message::ai(STOPPED_EARLY_MESSAGE);
                    let end = EndStep {
                        reason: EndReason::MaxStepsReached,
                        result: STOPPED_EARLY_MESSAGE.to_string(),
                    };
                    self.memory.append(human.clone());
                    self.memory.append(stopped.clone());
                    self.observer.on_run_end(&end)?;
                    yield (AgentStep::End(end), vec![stopped]);
                    break;
                }

                let args = call.parse_arguments()?;
                self.observer.on_tool_invocation(&call.name, &args)?;
                let outcome = self.executor.execute(&call.name, args).await?;
                self.observer.on_tool_result(&call.name, &outcome)?;

                let result = Message::function(call.name.clone(), outcome.to_content());
                working.push(message.clone());
                working.push(result.clone());
                tool_steps += 1;

                let step = ToolStep {
                    info: ToolInfo {
                        tool_name: call.name,
                        tool_args: call.arguments,
                    },
                    outcome,
                };
                yield (AgentStep::Tool(step), vec![message, result]);
            }
        }
    }

    /// Run the agent to completion
    pub async fn run(&mut self, prompt: &str) -> Result<AgentResponse> {
        let mut steps = Vec::new();
        let mut run_messages = Vec::new();
        {
            let stream = self.run_stream(prompt);
            futures::pin_mut!(stream);
            while let Some(item) = stream.next().await {
                let (step, messages) = item?;
                steps.push(step);
                run_messages.extend(messages);
            }
        }

        let (text, status) = match steps.last().and_then(AgentStep::as_end) {
            Some(end) => (end.result.clone(), end.reason),
            None => {
                return Err(AgentError::ModelResponseMalformed(
                    "run ended without a final answer".to_string(),
                ))
            }
        };

        // The human message of this run is the second-to-last memory entry
        let mut chat_history: Vec<Message> = self
            .memory
            .get_messages()
            .iter()
            .rev()
            .nth(1)
            .cloned()
            .into_iter()
            .collect();
        chat_history.extend(run_messages);

        Ok(AgentResponse {
            text,
            chat_history,
            steps,
            status,
            usage: self.run_usage,
        })
    }
}

impl std::fmt::Debug for FunctionAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionAgent")
            .field("model", &self.llm.model())
            .field("tools", self.executor.registry())
            .field("memory_len", &self.memory.len())
            .field("max_steps", &self.max_steps)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}
