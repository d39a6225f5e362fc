//! Available subcommands.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scripted session and print the render state after each step
    Replay {
        /// Path to the replay script (JSON)
        script: PathBuf,

        /// Print full render states as JSON lines instead of summaries
        #[arg(long)]
        json: bool,

        /// Start the session signed in
        #[arg(long)]
        authenticated: bool,

        /// Only show the sign-in overlay after a gated click
        #[arg(long)]
        no_passive_overlay: bool,

        /// Number of recent notices kept in the render state
        #[arg(long)]
        notice_history: Option<usize>,
    },

    /// Validate a settings file and print the effective settings
    CheckConfig {
        /// Settings file (defaults to --config)
        file: Option<PathBuf>,
    },
}
