//! Command handlers.

use crate::config::{CliConfig, OutputFormat};
use crate::history_store::FileHistoryStore;
use crate::workspace::{LocalBuildSystem, Workspace};
use bulk_core::ports::{BuildSubmitter, JobProvider};
use bulk_scheduler::{BulkBuilder, DispatchOutcome, History, RawBulkRequest};
use console::style;
use serde::Serialize;
use std::sync::Arc;

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

/// Workspace, history, and builder wired together for one invocation.
struct Session {
    system: Arc<LocalBuildSystem>,
    store: FileHistoryStore,
    builder: BulkBuilder,
}

/// Load the persisted pattern history. Needs no workspace file.
async fn open_history(
    config: &CliConfig,
) -> Result<(FileHistoryStore, Arc<History>), Box<dyn std::error::Error>> {
    config.builder.validate()?;
    let store = FileHistoryStore::new(config.history_path()?);
    let history = History::init(&store, config.builder.history_capacity).await?;
    Ok((store, Arc::new(history)))
}

impl Session {
    async fn open(config: &CliConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let (store, history) = open_history(config).await?;
        let system = Arc::new(LocalBuildSystem::open(&config.workspace).await?);
        let builder = BulkBuilder::new(
            system.clone(),
            system.clone(),
            history,
            config.builder.clone(),
        );
        Ok(Self {
            system,
            store,
            builder,
        })
    }
}

/// Print `value` as JSON or YAML. Returns false for table output so the
/// caller renders its own layout.
fn print_structured<T: Serialize>(
    format: OutputFormat,
    value: &T,
) -> Result<bool, Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => Ok(false),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
            Ok(true)
        }
    }
}

/// Run one bulk build pass.
pub async fn build(config: &CliConfig, request: RawBulkRequest) -> HandlerResult {
    let session = Session::open(config).await?;

    let report = session.builder.submit(&request).await?;

    if request.pattern.as_deref().is_some_and(|p| !p.is_empty()) {
        session.builder.history().persist(&session.store).await?;
    }

    if print_structured(config.output_format, &report)? {
        return Ok(());
    }

    for (job, outcome) in &report.outcomes {
        match outcome {
            DispatchOutcome::Built => println!("{} {} queued", style("✓").green(), job),
            DispatchOutcome::BuiltWithParameters(n) => {
                println!("{} {} queued with {} parameters", style("✓").green(), job, n)
            }
            DispatchOutcome::Polled => println!("{} {} polling SCM", style("✓").green(), job),
            DispatchOutcome::Denied => {
                println!("{} {} skipped: permission denied", style("!").yellow(), job)
            }
            DispatchOutcome::Failed(reason) => {
                println!("{} {} failed: {}", style("✗").red(), job, reason)
            }
        }
    }

    println!(
        "\n{} {} of {} selected jobs scheduled (batch {})",
        style("i").blue(),
        report.dispatched,
        report.selected,
        report.batch_id
    );
    if report.denied > 0 || report.failed > 0 {
        println!("  denied: {}  failed: {}", report.denied, report.failed);
    }
    Ok(())
}

#[derive(Serialize)]
struct JobRow {
    name: String,
    display_name: String,
    last_outcome: Option<String>,
    buildable: bool,
    can_build: bool,
    parameters: usize,
}

/// List jobs.
pub async fn list_jobs(config: &CliConfig) -> HandlerResult {
    let session = Session::open(config).await?;

    let mut rows = Vec::new();
    for job in session.system.list_jobs().await? {
        rows.push(JobRow {
            name: job.name.to_string(),
            display_name: job.display_name().to_string(),
            last_outcome: job.last_outcome.map(|o| o.to_string()),
            buildable: job.buildable,
            can_build: session.system.has_build_permission(&job).await,
            parameters: job.parameters.as_ref().map_or(0, |p| p.len()),
        });
    }

    if print_structured(config.output_format, &rows)? {
        return Ok(());
    }

    if rows.is_empty() {
        println!("No jobs in {}", session.system.path().display());
        return Ok(());
    }

    println!(
        "{:<30} {:<12} {:<10} {:<10} {}",
        "NAME", "OUTCOME", "ENABLED", "ALLOWED", "PARAMS"
    );
    for row in rows {
        println!(
            "{:<30} {:<12} {:<10} {:<10} {}",
            row.display_name,
            row.last_outcome.as_deref().unwrap_or("-"),
            if row.buildable { "yes" } else { "no" },
            if row.can_build { "yes" } else { "no" },
            row.parameters
        );
    }
    Ok(())
}

/// List views.
pub async fn list_views(config: &CliConfig) -> HandlerResult {
    let session = Session::open(config).await?;
    let views = session.builder.views().await?;

    let names: Vec<String> = views.iter().map(|v| v.name.to_string()).collect();
    if print_structured(config.output_format, &names)? {
        return Ok(());
    }

    if views.is_empty() {
        println!("No views defined");
        return Ok(());
    }
    for view in views {
        println!("  {} ({} direct jobs)", style(&view.name).cyan(), view.jobs.len());
    }
    Ok(())
}

/// List recently used patterns.
pub async fn list_history(config: &CliConfig) -> HandlerResult {
    let (_, history) = open_history(config).await?;
    let items = history.get_all().await;

    if print_structured(config.output_format, &items)? {
        return Ok(());
    }

    if items.is_empty() {
        println!("No patterns used yet");
        return Ok(());
    }
    for item in items {
        println!(
            "  {}  {}",
            style(item.used_at.format("%Y-%m-%d %H:%M:%S")).dim(),
            item.pattern
        );
    }
    Ok(())
}

/// Forget all patterns.
pub async fn clear_history(config: &CliConfig) -> HandlerResult {
    let (store, history) = open_history(config).await?;
    let count = history.size().await;
    history.clear().await;
    history.persist(&store).await?;

    println!("{} Cleared {} patterns", style("✓").green(), count);
    Ok(())
}

/// Show build queue depth.
pub async fn queue(config: &CliConfig) -> HandlerResult {
    let session = Session::open(config).await?;
    let depth = session.builder.queue_depth().await?;

    if print_structured(config.output_format, &depth)? {
        return Ok(());
    }
    println!("{} {} builds queued", style("i").blue(), depth);
    Ok(())
}

/// Print the workspace file schema.
pub fn schema() -> HandlerResult {
    let schema = schemars::schema_for!(Workspace);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Show configuration.
pub fn show_config(config: &CliConfig) -> HandlerResult {
    println!("Current configuration:");
    println!("  workspace: {}", config.workspace.display());
    match config.history_path() {
        Ok(path) => println!("  history_file: {}", path.display()),
        Err(_) => println!("  history_file: (not set)"),
    }
    println!("  output_format: {:?}", config.output_format);
    println!("  history_capacity: {}", config.builder.history_capacity);
    println!(
        "  dispatch_concurrency: {}",
        config.builder.dispatch_concurrency
    );

    if let Ok(path) = CliConfig::config_path() {
        println!("\nConfig file: {}", path.display());
    }

    Ok(())
}

/// Set configuration.
pub fn set_config(key: &str, value: &str) -> HandlerResult {
    let mut config = CliConfig::load().unwrap_or_default();
    config.set(key, value)?;
    config.save()?;

    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}
