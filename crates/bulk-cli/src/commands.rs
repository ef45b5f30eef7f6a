//! CLI command definitions.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Trigger builds or SCM polls across selected jobs
    Build {
        /// immediate_build or poll_scm
        #[arg(short, long, default_value = "immediate_build")]
        action: String,

        /// all, failed, failed_only, unstable, unstable_only, not_built,
        /// not_build_only, aborted, pattern or byview
        #[arg(short, long)]
        criterion: String,

        /// Job name pattern, `*` matches any run of characters
        #[arg(short, long)]
        pattern: Option<String>,

        /// Restrict selection to a view and its nested views
        #[arg(long)]
        view: Option<String>,

        /// Parameter overrides as key=value&key=value
        #[arg(long)]
        params: Option<String>,

        /// Build parameterized jobs with the supplied overrides
        #[arg(long)]
        param_build: bool,
    },

    /// List jobs in the workspace
    Jobs,

    /// List views, nested ones included
    Views,

    /// Recently used patterns
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Show build queue depth
    Queue,

    /// Print the JSON schema of the workspace file
    Schema,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List patterns, newest first
    List,

    /// Forget all patterns
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },
}
