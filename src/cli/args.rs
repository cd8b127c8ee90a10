//! CLI argument definitions using clap derive

use crate::review::DeveloperLevel;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Critic - cached AI code review for GitHub repositories
///
/// Reviews every eligible file of a repository against task requirements,
/// grades the repository and caches the result by content fingerprint.
#[derive(Parser, Debug)]
#[command(name = "critic")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CRITIC_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP review service
    Serve(ServeArgs),

    /// Review one repository and print the result
    Review(ReviewArgs),

    /// Check the cache store and credentials
    Status,

    /// Inspect cached reviews
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Arguments for the review command
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// Repository link (https://github.com/owner/repository)
    #[arg(short, long)]
    pub url: String,

    /// Declared experience level of the author
    #[arg(short, long, value_enum)]
    pub level: LevelArg,

    /// Task requirements the code is reviewed against
    #[arg(short, long, default_value = "")]
    pub requirements: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Developer level as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    Junior,
    Middle,
    Senior,
}

impl From<LevelArg> for DeveloperLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Junior => DeveloperLevel::Junior,
            LevelArg::Middle => DeveloperLevel::Middle,
            LevelArg::Senior => DeveloperLevel::Senior,
        }
    }
}

/// Output format for commands printing a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// The review as JSON
    Json,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Print a cached entry
    #[command(group(clap::ArgGroup::new("target").required(true).args(["repo", "file"])))]
    Show {
        /// Repository identity (commit sha)
        #[arg(long)]
        repo: Option<String>,

        /// File path inside the repository
        #[arg(long, requires = "sha")]
        file: Option<String>,

        /// File content fingerprint (blob sha)
        #[arg(long, requires = "file")]
        sha: Option<String>,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (secrets redacted)
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
