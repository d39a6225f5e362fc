//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for replaying and inspecting tutoring sessions.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "steplight")]
#[command(about = "Replay and inspect steplight tutoring sessions")]
#[command(version)]
pub struct Cli {
    /// Session settings file (JSON)
    #[arg(short = 'c', long = "config", global = true, env = "STEPLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
