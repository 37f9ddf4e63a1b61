// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Subcommand implementations

use std::io::{self, Write};
use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value;

use crate::agents::{AgentObserver, AgentStep, EndReason, FunctionAgent};
use crate::catalog;
use crate::config::Settings;
use crate::error::Result;
use crate::llm::providers::ErnieBot;
use crate::tools::{ToolOutput, ToolRegistry};

use super::args::{AskArgs, ModelsArgs, OutputFormat};

/// Print the model catalog
pub fn run_models(args: &ModelsArgs, out: &mut impl Write) -> Result<()> {
    match args.format {
        OutputFormat::Text => {
            for entry in catalog::list() {
                writeln!(out, "{:<22}{}", entry.id, entry.display_name)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, catalog::list())?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Streams answer text to stdout and tool activity to stderr.
struct AskObserver;

impl AgentObserver for AskObserver {
    fn on_text_delta(&mut self, text: &str) -> Result<()> {
        print!("{}", text);
        io::stdout().flush()?;
        Ok(())
    }

    fn on_tool_invocation(&mut self, tool_name: &str, args: &Value) -> Result<()> {
        eprintln!("  → Using tool: {} {}", tool_name, args);
        Ok(())
    }

    fn on_tool_result(&mut self, _tool_name: &str, output: &ToolOutput) -> Result<()> {
        match output {
            ToolOutput::Success(value) => eprintln!("    ✓ {}", value),
            ToolOutput::Error(message) => eprintln!("    ✗ Error: {}", message),
        }
        Ok(())
    }
}

/// Run the function agent on one prompt
pub async fn run_ask(args: AskArgs, mut settings: Settings) -> Result<()> {
    if let Some(model) = args.model {
        settings.chat.model = model;
    }
    if let Some(max_steps) = args.max_steps {
        settings.agent.max_steps = max_steps;
    }

    let llm = Arc::new(ErnieBot::from_config(&settings.chat)?);
    let tools = if args.no_tools {
        ToolRegistry::new()
    } else {
        ToolRegistry::with_builtins()
    };

    tracing::debug!(
        target: "erniebot.agent",
        model = %settings.chat.model,
        backend = %settings.chat.backend,
        tools = tools.len(),
        "starting ask"
    );

    let mut agent = FunctionAgent::new(llm, tools)
        .with_settings(&settings)
        .with_observer(AskObserver);

    let stream = agent.run_stream(&args.prompt);
    futures::pin_mut!(stream);
    while let Some(item) = stream.next().await {
        let (step, _messages) = item?;
        if let AgentStep::End(end) = step {
            // Completed answers were already streamed through the observer
            if end.reason == EndReason::MaxStepsReached {
                print!("{}", end.result);
            }
        }
    }

    // Always terminate with a newline.
    println!();

    Ok(())
}
