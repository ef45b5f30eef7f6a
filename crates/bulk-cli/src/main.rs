//! Bulk Builder CLI entrypoint.

use bulk_scheduler::RawBulkRequest;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod handlers;
mod history_store;
mod workspace;

use commands::{Commands, ConfigCommands, HistoryCommands};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "bulk")]
#[command(author, version, about = "Trigger builds across many jobs at once", long_about = None)]
struct Cli {
    /// Workspace file, overrides the configured one
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = CliConfig::load().unwrap_or_default();
    if let Some(workspace) = cli.workspace {
        config.workspace = workspace;
    }

    match cli.command {
        Commands::Build {
            action,
            criterion,
            pattern,
            view,
            params,
            param_build,
        } => {
            let request = RawBulkRequest {
                action: Some(action),
                build: Some(criterion),
                params,
                param_build: param_build.then(|| "on".to_string()),
                pattern,
                view,
            };
            handlers::build(&config, request).await?
        }
        Commands::Jobs => handlers::list_jobs(&config).await?,
        Commands::Views => handlers::list_views(&config).await?,
        Commands::History { command } => match command {
            HistoryCommands::List => handlers::list_history(&config).await?,
            HistoryCommands::Clear => handlers::clear_history(&config).await?,
        },
        Commands::Queue => handlers::queue(&config).await?,
        Commands::Schema => handlers::schema()?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => handlers::show_config(&config)?,
            ConfigCommands::Set { key, value } => handlers::set_config(&key, &value)?,
        },
    }

    Ok(())
}
