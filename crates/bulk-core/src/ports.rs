//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the selection engine and the
//! host build system that owns jobs, views, and the build queue.

use crate::Result;
use crate::history::HistoryItem;
use crate::job::{Job, View};
use crate::parameters::ParameterValue;
use async_trait::async_trait;

/// Source of jobs and views.
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// List all top-level jobs in their natural order.
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    /// List top-level views; nested views hang off their parents.
    async fn list_views(&self) -> Result<Vec<View>>;

    /// Jobs belonging to a named view, nested views included.
    /// `None` when no view has that name.
    async fn resolve_view(&self, name: &str) -> Result<Option<Vec<Job>>>;
}

/// Sink for scheduling requests.
///
/// Calls return once the request is accepted; they never wait for a build.
#[async_trait]
pub trait BuildSubmitter: Send + Sync {
    /// Queue a build. `None` means no explicit parameters; the job's own
    /// default handling applies.
    async fn schedule_build(&self, job: &Job, parameters: Option<&[ParameterValue]>)
    -> Result<()>;

    /// Ask the job to check its source for changes.
    async fn schedule_poll(&self, job: &Job) -> Result<()>;

    /// Whether the current caller may build this job.
    async fn has_build_permission(&self, job: &Job) -> bool;

    /// Number of items waiting in the build queue.
    async fn queue_depth(&self) -> Result<usize>;
}

/// Persistence for the pattern history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load items, newest first.
    async fn load(&self) -> Result<Vec<HistoryItem>>;

    /// Replace the stored items.
    async fn save(&self, items: &[HistoryItem]) -> Result<()>;
}
