//! Mock collaborators for bulk builder tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bulk_core::job::{Job, Outcome, View};
use bulk_core::parameters::ParameterValue;
use bulk_core::ports::{BuildSubmitter, JobProvider};
use bulk_core::{Error, Result};
use bulk_scheduler::views::{find_view, jobs_in_view};
use std::sync::Mutex;

pub struct MockJobProvider {
    pub jobs: Vec<Job>,
    pub views: Vec<View>,
}

impl MockJobProvider {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            views: vec![],
        }
    }

    pub fn with_views(mut self, views: Vec<View>) -> Self {
        self.views = views;
        self
    }
}

#[async_trait]
impl JobProvider for MockJobProvider {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        Ok(self.jobs.clone())
    }

    async fn list_views(&self) -> Result<Vec<View>> {
        Ok(self.views.clone())
    }

    async fn resolve_view(&self, name: &str) -> Result<Option<Vec<Job>>> {
        Ok(find_view(&self.views, name).map(|view| jobs_in_view(&self.jobs, view)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Build {
        job: String,
        parameters: Option<Vec<ParameterValue>>,
    },
    Poll {
        job: String,
    },
}

#[derive(Default)]
pub struct MockSubmitter {
    pub submissions: Mutex<Vec<Submission>>,
    pub denied: Vec<String>,
    pub failing: Vec<String>,
}

impl MockSubmitter {
    pub fn denying(jobs: &[&str]) -> Self {
        Self {
            denied: jobs.iter().map(|j| j.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(jobs: &[&str]) -> Self {
        Self {
            failing: jobs.iter().map(|j| j.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn built_jobs(&self) -> Vec<String> {
        self.submissions()
            .into_iter()
            .filter_map(|s| match s {
                Submission::Build { job, .. } => Some(job),
                Submission::Poll { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl BuildSubmitter for MockSubmitter {
    async fn schedule_build(&self, job: &Job, parameters: Option<&[ParameterValue]>) -> Result<()> {
        let name = job.name.to_string();
        if self.failing.contains(&name) {
            return Err(Error::SubmissionFailed {
                job: name,
                message: "executor offline".to_string(),
            });
        }
        self.submissions.lock().unwrap().push(Submission::Build {
            job: name,
            parameters: parameters.map(|p| p.to_vec()),
        });
        Ok(())
    }

    async fn schedule_poll(&self, job: &Job) -> Result<()> {
        self.submissions.lock().unwrap().push(Submission::Poll {
            job: job.name.to_string(),
        });
        Ok(())
    }

    async fn has_build_permission(&self, job: &Job) -> bool {
        !self.denied.contains(&job.name.to_string())
    }

    async fn queue_depth(&self) -> Result<usize> {
        Ok(self.submissions.lock().unwrap().len())
    }
}

/// One success, one failure, one unstable, one never built, one disabled.
pub fn five_jobs() -> Vec<Job> {
    vec![
        Job::new("success").with_outcome(Outcome::Success),
        Job::new("failure").with_outcome(Outcome::Failure),
        Job::new("unstable").with_outcome(Outcome::Unstable),
        Job::new("never-built"),
        Job::new("disabled").with_outcome(Outcome::Failure).disabled(),
    ]
}
