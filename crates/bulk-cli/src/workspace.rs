//! Local workspace file acting as the host build system.
//!
//! Jobs, views and the build queue live in one YAML document. Scheduled
//! builds are appended to the queue and written back immediately.

use async_trait::async_trait;
use bulk_core::ids::JobName;
use bulk_core::job::{Job, View};
use bulk_core::parameters::ParameterValue;
use bulk_core::ports::{BuildSubmitter, JobProvider};
use bulk_core::{Error, Result};
use bulk_scheduler::views::{find_view, jobs_in_view};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A job entry plus the caller's permission on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkspaceJob {
    #[serde(flatten)]
    pub job: Job,
    /// Whether the operator may trigger this job.
    #[serde(default = "default_can_build")]
    pub can_build: bool,
}

fn default_can_build() -> bool {
    true
}

/// A build waiting in the local queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QueueEntry {
    pub job: JobName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterValue>>,
}

/// The workspace document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Workspace {
    #[serde(default)]
    pub jobs: Vec<WorkspaceJob>,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(default)]
    pub queue: Vec<QueueEntry>,
}

impl Workspace {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn find(&self, name: &str) -> Option<&WorkspaceJob> {
        self.jobs.iter().find(|entry| entry.job.name.as_str() == name)
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.iter().map(|entry| entry.job.clone()).collect()
    }
}

/// [`JobProvider`] and [`BuildSubmitter`] backed by a workspace file.
pub struct LocalBuildSystem {
    path: PathBuf,
    workspace: Mutex<Workspace>,
}

impl LocalBuildSystem {
    /// Open an existing workspace file.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Error::Config(format!("cannot read workspace {}: {}", path.display(), e))
        })?;
        let workspace = Workspace::from_yaml(&content)?;
        debug!(path = %path.display(), jobs = workspace.jobs.len(), "Opened workspace");
        Ok(Self::new(path, workspace))
    }

    pub fn new(path: PathBuf, workspace: Workspace) -> Self {
        Self {
            path,
            workspace: Mutex::new(workspace),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> Workspace {
        self.workspace.lock().await.clone()
    }

    async fn save(&self, workspace: &Workspace) -> Result<()> {
        tokio::fs::write(&self.path, workspace.to_yaml()?).await?;
        Ok(())
    }
}

#[async_trait]
impl JobProvider for LocalBuildSystem {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        Ok(self.workspace.lock().await.jobs())
    }

    async fn list_views(&self) -> Result<Vec<View>> {
        Ok(self.workspace.lock().await.views.clone())
    }

    async fn resolve_view(&self, name: &str) -> Result<Option<Vec<Job>>> {
        let workspace = self.workspace.lock().await;
        let jobs = workspace.jobs();
        Ok(find_view(&workspace.views, name).map(|view| jobs_in_view(&jobs, view)))
    }
}

#[async_trait]
impl BuildSubmitter for LocalBuildSystem {
    async fn schedule_build(
        &self,
        job: &Job,
        parameters: Option<&[ParameterValue]>,
    ) -> Result<()> {
        let mut workspace = self.workspace.lock().await;
        if workspace.find(job.name.as_str()).is_none() {
            return Err(Error::JobNotFound(job.name.to_string()));
        }
        workspace.queue.push(QueueEntry {
            job: job.name.clone(),
            parameters: parameters.map(<[ParameterValue]>::to_vec),
        });
        if let Err(e) = self.save(&workspace).await {
            workspace.queue.pop();
            return Err(e);
        }
        info!(job = %job.name, depth = workspace.queue.len(), "Queued build");
        Ok(())
    }

    async fn schedule_poll(&self, job: &Job) -> Result<()> {
        let workspace = self.workspace.lock().await;
        if workspace.find(job.name.as_str()).is_none() {
            return Err(Error::JobNotFound(job.name.to_string()));
        }
        info!(job = %job.name, "Requested SCM poll");
        Ok(())
    }

    async fn has_build_permission(&self, job: &Job) -> bool {
        self.workspace
            .lock()
            .await
            .find(job.name.as_str())
            .is_some_and(|entry| entry.can_build)
    }

    async fn queue_depth(&self) -> Result<usize> {
        Ok(self.workspace.lock().await.queue.len())
    }
}
