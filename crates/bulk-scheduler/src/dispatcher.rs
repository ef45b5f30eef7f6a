//! Submits one build or SCM poll per selected job.

use crate::resolver::ParameterResolver;
use bulk_core::job::Job;
use bulk_core::parameters::UserParams;
use bulk_core::ports::BuildSubmitter;
use bulk_core::selection::ActionKind;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// What happened to a single job during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Build queued without explicit parameters.
    Built,
    /// Build queued with this many resolved parameter values.
    BuiltWithParameters(usize),
    /// SCM poll requested.
    Polled,
    /// Caller may not build the job.
    Denied,
    /// The submitter rejected the request.
    Failed(String),
}

impl DispatchOutcome {
    pub fn dispatched(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::Built | DispatchOutcome::BuiltWithParameters(_) | DispatchOutcome::Polled
        )
    }
}

pub struct Dispatcher {
    submitter: Arc<dyn BuildSubmitter>,
}

impl Dispatcher {
    pub fn new(submitter: Arc<dyn BuildSubmitter>) -> Self {
        Self { submitter }
    }

    /// Dispatch one job. Never returns an error: denials and submitter
    /// failures are logged and reported through the outcome.
    pub async fn dispatch(
        &self,
        job: &Job,
        action: ActionKind,
        params: Option<&UserParams>,
    ) -> DispatchOutcome {
        if !self.submitter.has_build_permission(job).await {
            warn!(job = %job.name, "Insufficient permission to build job");
            return DispatchOutcome::Denied;
        }

        debug!(job = %job.display_name(), %action, "Scheduling job");

        let submitted = match (action, params, &job.parameters) {
            (ActionKind::PollScm, _, _) => self
                .submitter
                .schedule_poll(job)
                .await
                .map(|()| DispatchOutcome::Polled),
            (ActionKind::ImmediateBuild, Some(params), Some(schema)) => {
                let values = ParameterResolver::resolve(schema, params);
                self.submitter
                    .schedule_build(job, Some(&values))
                    .await
                    .map(|()| DispatchOutcome::BuiltWithParameters(values.len()))
            }
            (ActionKind::ImmediateBuild, _, _) => self
                .submitter
                .schedule_build(job, None)
                .await
                .map(|()| DispatchOutcome::Built),
        };

        submitted.unwrap_or_else(|e| {
            warn!(job = %job.name, error = %e, "Failed to schedule job");
            DispatchOutcome::Failed(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bulk_core::parameters::{ParameterDefinition, ParameterSchema, ParameterValue};
    use bulk_core::{Error, Result};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Build(String, Option<Vec<ParameterValue>>),
        Poll(String),
    }

    #[derive(Default)]
    struct RecordingSubmitter {
        calls: Mutex<Vec<Call>>,
        denied: Vec<String>,
        broken: Vec<String>,
    }

    #[async_trait]
    impl BuildSubmitter for RecordingSubmitter {
        async fn schedule_build(
            &self,
            job: &Job,
            parameters: Option<&[ParameterValue]>,
        ) -> Result<()> {
            if self.broken.contains(&job.name.to_string()) {
                return Err(Error::SubmissionFailed {
                    job: job.name.to_string(),
                    message: "queue closed".to_string(),
                });
            }
            self.calls.lock().unwrap().push(Call::Build(
                job.name.to_string(),
                parameters.map(|p| p.to_vec()),
            ));
            Ok(())
        }

        async fn schedule_poll(&self, job: &Job) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Poll(job.name.to_string()));
            Ok(())
        }

        async fn has_build_permission(&self, job: &Job) -> bool {
            !self.denied.contains(&job.name.to_string())
        }

        async fn queue_depth(&self) -> Result<usize> {
            Ok(self.calls.lock().unwrap().len())
        }
    }

    fn parameterized(name: &str) -> Job {
        Job::new(name).with_parameters(ParameterSchema::new(vec![ParameterDefinition::string(
            "foo", "bar",
        )]))
    }

    #[tokio::test]
    async fn test_denied_job_is_skipped() {
        let submitter = Arc::new(RecordingSubmitter {
            denied: vec!["secret".to_string()],
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(submitter.clone());

        let outcome = dispatcher
            .dispatch(&Job::new("secret"), ActionKind::ImmediateBuild, None)
            .await;
        assert_eq!(outcome, DispatchOutcome::Denied);
        assert!(!outcome.dispatched());
        assert!(submitter.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_poll_ignores_parameters() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let dispatcher = Dispatcher::new(submitter.clone());
        let params: UserParams = [("foo", "baz")].into_iter().collect();

        let outcome = dispatcher
            .dispatch(&parameterized("p"), ActionKind::PollScm, Some(&params))
            .await;
        assert_eq!(outcome, DispatchOutcome::Polled);
        assert_eq!(
            *submitter.calls.lock().unwrap(),
            vec![Call::Poll("p".to_string())]
        );
    }

    #[tokio::test]
    async fn test_parameterized_build() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let dispatcher = Dispatcher::new(submitter.clone());
        let params: UserParams = [("foo", "baz")].into_iter().collect();

        let outcome = dispatcher
            .dispatch(&parameterized("p"), ActionKind::ImmediateBuild, Some(&params))
            .await;
        assert_eq!(outcome, DispatchOutcome::BuiltWithParameters(1));
        assert_eq!(
            *submitter.calls.lock().unwrap(),
            vec![Call::Build(
                "p".to_string(),
                Some(vec![ParameterValue::string("foo", "baz")])
            )]
        );
    }

    #[tokio::test]
    async fn test_no_overrides_or_no_schema_builds_plain() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let dispatcher = Dispatcher::new(submitter.clone());
        let params: UserParams = [("foo", "baz")].into_iter().collect();

        let a = dispatcher
            .dispatch(&parameterized("a"), ActionKind::ImmediateBuild, None)
            .await;
        let b = dispatcher
            .dispatch(&Job::new("b"), ActionKind::ImmediateBuild, Some(&params))
            .await;
        assert_eq!(a, DispatchOutcome::Built);
        assert_eq!(b, DispatchOutcome::Built);
        assert_eq!(
            *submitter.calls.lock().unwrap(),
            vec![
                Call::Build("a".to_string(), None),
                Call::Build("b".to_string(), None)
            ]
        );
    }

    #[tokio::test]
    async fn test_submitter_failure_is_reported_not_raised() {
        let submitter = Arc::new(RecordingSubmitter {
            broken: vec!["flaky".to_string()],
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(submitter);

        let outcome = dispatcher
            .dispatch(&Job::new("flaky"), ActionKind::ImmediateBuild, None)
            .await;
        assert!(matches!(outcome, DispatchOutcome::Failed(ref m) if m.contains("queue closed")));
        assert!(!outcome.dispatched());
    }
}
