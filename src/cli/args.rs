// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ernie - function-calling agent for ERNIE Bot
#[derive(Parser, Debug)]
#[command(name = "ernie")]
#[command(version, about = "Function-calling agent for ERNIE Bot")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the model catalog
    Models(ModelsArgs),

    /// Ask a single question, letting the model call tools
    Ask(AskArgs),
}

/// Arguments for the models subcommand
#[derive(clap::Args, Debug, Default)]
pub struct ModelsArgs {
    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the ask subcommand
#[derive(clap::Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    pub prompt: String,

    /// Model to use (overrides settings)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Do not offer any tools to the model
    #[arg(long)]
    pub no_tools: bool,

    /// Maximum tool steps (overrides settings)
    #[arg(long)]
    pub max_steps: Option<usize>,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_models_json() {
        let cli = Cli::try_parse_from(["ernie", "models", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Models(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected models"),
        }
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "ernie",
            "-v",
            "ask",
            "1+4等于几？",
            "-m",
            "ernie-4.0",
            "--max-steps",
            "3",
            "--no-tools",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.prompt, "1+4等于几？");
                assert_eq!(args.model.as_deref(), Some("ernie-4.0"));
                assert_eq!(args.max_steps, Some(3));
                assert!(args.no_tools);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["ernie"]).is_err());
    }
}
