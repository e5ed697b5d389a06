use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;

use cli::{AuthPlatform, GlobalArgs};

/// Peer review labeling and auto-merge bot for pull requests
#[derive(Debug, Parser)]
#[command(name = "peer-review-bot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./peer-review-bot.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository URL or owner/repo shorthand
    #[arg(long, global = true, env = "PEER_REVIEW_BOT_REPOSITORY")]
    repository: Option<String>,

    /// Merge PRs as soon as they are approved
    #[arg(long, global = true, env = "PEER_REVIEW_BOT_MERGE_ON_REVIEW")]
    merge_on_review: bool,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server; GET / triggers a review pass
    Serve {
        /// Address to listen on (overrides server.listen)
        #[arg(long, env = "PEER_REVIEW_BOT_LISTEN")]
        listen: Option<String>,
    },
    /// Run a single review pass over all open PRs and wait for it
    Scan,
    /// Check which token would be used and that it works
    Auth {
        #[command(subcommand)]
        platform: AuthPlatform,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise info, or debug with --verbose
    let default_filter = if cli.verbose {
        "peer_review_bot=debug"
    } else {
        "peer_review_bot=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let globals = GlobalArgs {
        config: cli.config,
        repository: cli.repository,
        merge_on_review: cli.merge_on_review,
    };

    match cli.command {
        Commands::Serve { listen } => cli::serve::run_serve(&globals, listen).await,
        Commands::Scan => cli::scan::run_scan(&globals).await,
        Commands::Auth { platform } => cli::auth::run_auth(platform).await,
    }
}
