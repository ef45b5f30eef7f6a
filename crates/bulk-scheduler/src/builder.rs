//! Bulk build orchestration: one selection-and-dispatch pass per request.

use crate::config::BuilderConfig;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::history::History;
use crate::params::ParamProcessor;
use crate::pattern::PatternMatcher;
use crate::selection::SelectionEngine;
use crate::views::all_views;
use bulk_core::ids::{BatchId, JobName};
use bulk_core::job::View;
use bulk_core::parameters::UserParams;
use bulk_core::ports::{BuildSubmitter, JobProvider};
use bulk_core::selection::{ActionKind, SelectionCriterion};
use bulk_core::{Error, Result};
use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};

/// Request fields as collected by a form or command line, unvalidated.
#[derive(Debug, Clone, Default)]
pub struct RawBulkRequest {
    pub action: Option<String>,
    pub build: Option<String>,
    pub params: Option<String>,
    pub param_build: Option<String>,
    pub pattern: Option<String>,
    pub view: Option<String>,
}

/// A validated bulk build request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRequest {
    pub action: ActionKind,
    pub criterion: SelectionCriterion,
    pub pattern: Option<String>,
    pub view: Option<String>,
    /// `None` when the operator supplied no override set at all.
    pub params: Option<UserParams>,
}

impl BulkRequest {
    pub fn new(action: ActionKind, criterion: SelectionCriterion) -> Self {
        Self {
            action,
            criterion,
            pattern: None,
            view: None,
            params: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = non_empty(Some(pattern.into()));
        self
    }

    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = non_empty(Some(view.into()));
        self
    }

    pub fn with_params(mut self, params: UserParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Validate raw fields.
    ///
    /// Parameters are attached only when `param_build` is set and at least
    /// one well-formed pair was supplied.
    pub fn from_raw(raw: &RawBulkRequest) -> Result<Self> {
        let action: ActionKind = raw
            .action
            .as_deref()
            .ok_or(Error::MissingField("action"))?
            .parse()?;
        let criterion: SelectionCriterion = raw
            .build
            .as_deref()
            .ok_or(Error::MissingField("build"))?
            .parse()?;

        let parsed = ParamProcessor::parse(raw.params.as_deref());
        let param_build = raw.param_build.as_deref().is_some_and(|p| !p.is_empty());
        let params = (param_build && !parsed.is_empty()).then_some(parsed);

        Ok(Self {
            action,
            criterion,
            pattern: non_empty(raw.pattern.clone()),
            view: non_empty(raw.view.clone()),
            params,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Result of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub batch_id: BatchId,
    pub selected: usize,
    pub dispatched: usize,
    pub denied: usize,
    pub failed: usize,
    /// Per-job outcomes in selection order.
    pub outcomes: Vec<(JobName, DispatchOutcome)>,
}

impl BulkReport {
    fn from_outcomes(batch_id: BatchId, outcomes: Vec<(JobName, DispatchOutcome)>) -> Self {
        let count = |pred: fn(&DispatchOutcome) -> bool| {
            outcomes.iter().filter(|(_, outcome)| pred(outcome)).count()
        };
        Self {
            batch_id,
            selected: outcomes.len(),
            dispatched: count(DispatchOutcome::dispatched),
            denied: count(|o| matches!(o, DispatchOutcome::Denied)),
            failed: count(|o| matches!(o, DispatchOutcome::Failed(_))),
            outcomes,
        }
    }
}

/// Entry point for bulk builds.
pub struct BulkBuilder {
    provider: Arc<dyn JobProvider>,
    submitter: Arc<dyn BuildSubmitter>,
    engine: SelectionEngine,
    dispatcher: Dispatcher,
    history: Arc<History>,
    config: BuilderConfig,
}

impl BulkBuilder {
    pub fn new(
        provider: Arc<dyn JobProvider>,
        submitter: Arc<dyn BuildSubmitter>,
        history: Arc<History>,
        config: BuilderConfig,
    ) -> Self {
        Self {
            provider: provider.clone(),
            submitter: submitter.clone(),
            engine: SelectionEngine::new(provider),
            dispatcher: Dispatcher::new(submitter),
            history,
            config,
        }
    }

    pub fn history(&self) -> &Arc<History> {
        &self.history
    }

    /// Validate raw fields and run a pass. Invalid tokens or patterns reject
    /// the request before any job or the history is touched.
    pub async fn submit(&self, raw: &RawBulkRequest) -> Result<BulkReport> {
        let request = BulkRequest::from_raw(raw)?;
        self.run(&request).await
    }

    /// Run one selection-and-dispatch pass.
    pub async fn run(&self, request: &BulkRequest) -> Result<BulkReport> {
        let batch_id = BatchId::new();
        let span = info_span!("bulk_build", batch = %batch_id);
        self.run_pass(batch_id, request).instrument(span).await
    }

    async fn run_pass(&self, batch_id: BatchId, request: &BulkRequest) -> Result<BulkReport> {
        info!(
            action = %request.action,
            criterion = %request.criterion,
            pattern = request.pattern.as_deref(),
            view = request.view.as_deref(),
            "Starting bulk build"
        );

        // An unusable pattern rejects the pass before it is remembered.
        let matcher = PatternMatcher::new(request.pattern.as_deref())?;
        if let Some(pattern) = &request.pattern {
            self.history.record(pattern).await;
        }

        let selected = self
            .engine
            .select(request.criterion, matcher, request.view.as_deref())
            .await?;

        let concurrency = self.config.dispatch_concurrency.max(1);
        let outcomes: Vec<(JobName, DispatchOutcome)> = stream::iter(selected.iter())
            .map(|job| async move {
                let outcome = self
                    .dispatcher
                    .dispatch(job, request.action, request.params.as_ref())
                    .await;
                (job.name.clone(), outcome)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let report = BulkReport::from_outcomes(batch_id, outcomes);
        info!(
            selected = report.selected,
            dispatched = report.dispatched,
            denied = report.denied,
            failed = report.failed,
            "Finished bulk build"
        );
        Ok(report)
    }

    /// Every view, nested ones included, parents first.
    pub async fn views(&self) -> Result<Vec<View>> {
        let roots = self.provider.list_views().await?;
        Ok(all_views(&roots).into_iter().cloned().collect())
    }

    pub async fn queue_depth(&self) -> Result<usize> {
        self.submitter.queue_depth().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(action: &str, build: &str) -> RawBulkRequest {
        RawBulkRequest {
            action: Some(action.to_string()),
            build: Some(build.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_raw_parses_tokens() {
        let request = BulkRequest::from_raw(&raw("IMMEDIATE_BUILD", "Failed_Only")).unwrap();
        assert_eq!(
            request,
            BulkRequest::new(ActionKind::ImmediateBuild, SelectionCriterion::FailedOnly)
        );
    }

    #[test]
    fn test_from_raw_rejects_unknown_and_missing() {
        assert!(matches!(
            BulkRequest::from_raw(&raw("immediate_build", "green")),
            Err(Error::InvalidSelectionToken(_))
        ));
        assert!(matches!(
            BulkRequest::from_raw(&raw("rebuild", "all")),
            Err(Error::InvalidAction(_))
        ));
        assert!(matches!(
            BulkRequest::from_raw(&RawBulkRequest::default()),
            Err(Error::MissingField("action"))
        ));
    }

    #[test]
    fn test_params_need_param_build_flag() {
        let mut request = raw("immediate_build", "all");
        request.params = Some("foo=baz".to_string());
        assert_eq!(BulkRequest::from_raw(&request).unwrap().params, None);

        request.param_build = Some("on".to_string());
        let expected: UserParams = [("foo", "baz")].into_iter().collect();
        assert_eq!(BulkRequest::from_raw(&request).unwrap().params, Some(expected));

        request.params = Some("garbage".to_string());
        assert_eq!(BulkRequest::from_raw(&request).unwrap().params, None);
    }

    #[test]
    fn test_empty_pattern_and_view_are_absent() {
        let mut request = raw("poll_scm", "pattern");
        request.pattern = Some(String::new());
        request.view = Some(String::new());
        let request = BulkRequest::from_raw(&request).unwrap();
        assert_eq!(request.pattern, None);
        assert_eq!(request.view, None);
    }
}
