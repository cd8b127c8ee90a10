//! Critic - cached AI code review for GitHub repositories
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use critic::cli::{commands, Cli, Commands};
use critic::config::ConfigManager;
use critic::error::CriticResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CriticResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load_with_env().await?;

    // The service reports requests at info even without -v
    let verbosity = match cli.command {
        Commands::Serve(_) => cli.verbose.max(1),
        _ => cli.verbose,
    };
    init_tracing(verbosity, &config.general.log_format);
    debug!("Configuration loaded from {}", manager.path().display());

    match cli.command {
        Commands::Serve(args) => commands::serve(args, &config).await,
        Commands::Review(args) => commands::review(args, &config).await,
        Commands::Status => commands::status(&config).await,
        Commands::Cache(args) => commands::cache(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &manager).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `RUST_LOG` wins when set
fn init_tracing(verbosity: u8, format: &str) {
    let default = match verbosity {
        0 => "critic=warn",
        1 => "critic=info,tower_http=info",
        _ => "critic=debug,tower_http=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
