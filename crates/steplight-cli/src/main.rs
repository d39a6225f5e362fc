//! CLI entry point - the composition root.
//!
//! Parses arguments, sets up logging, loads settings, and routes each
//! subcommand to its handler.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use steplight_cli::config::{apply_overrides, load_settings};
use steplight_cli::{Cli, CliError, Commands, handlers};
use steplight_core::SettingsUpdate;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Logs go to stderr so replay output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Replay {
            script,
            json,
            authenticated,
            no_passive_overlay,
            notice_history,
        } => {
            let update = SettingsUpdate {
                passive_guest_overlay: no_passive_overlay.then_some(false),
                notice_history,
                ..SettingsUpdate::default()
            };
            let settings = apply_overrides(load_settings(cli.config.as_deref())?, &update)?;
            handlers::replay::execute(&script, settings, authenticated, json).await
        }
        Commands::CheckConfig { file } => handlers::check_config::execute(file.or(cli.config).as_deref()),
    }
}
