// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! ernie - function-calling agent for ERNIE Bot
//!
//! Entry point for the ernie CLI application.

use clap::Parser;

use erniebot_agent::cli::{run_ask, run_models, Cli, Commands};
use erniebot_agent::config::Settings;
use erniebot_agent::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // `-v` turns on the crate's own targets; `-vv` adds per-chunk tracing.
    // `RUST_LOG` still takes precedence.
    if cli.verbose > 0 {
        let level = if cli.verbose > 1 { "trace" } else { "debug" };
        for target in ["erniebot.agent", "erniebot.llm", "erniebot.tools"] {
            if let Ok(parsed) = format!("{}={}", target, level).parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to appropriate command
    match cli.command {
        Commands::Models(args) => {
            let mut stdout = std::io::stdout().lock();
            run_models(&args, &mut stdout)?;
        }
        Commands::Ask(args) => {
            let settings = match &cli.config {
                Some(path) => Settings::load_from(path)?,
                None => Settings::load()?,
            };
            run_ask(args, settings).await?;
        }
    }

    Ok(())
}
