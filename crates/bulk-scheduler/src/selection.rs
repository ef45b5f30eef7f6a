//! Job selection: candidate scoping plus predicate composition.

use crate::filter::StatusFilter;
use crate::pattern::PatternMatcher;
use bulk_core::Result;
use bulk_core::job::Job;
use bulk_core::ports::JobProvider;
use bulk_core::selection::SelectionCriterion;
use std::sync::Arc;
use tracing::{debug, warn};

/// A boolean test over a job.
pub type JobPredicate = Box<dyn Fn(&Job) -> bool + Send + Sync>;

/// The predicates a criterion and pattern imply, in evaluation order.
pub fn predicates(criterion: SelectionCriterion, matcher: PatternMatcher) -> Vec<JobPredicate> {
    let status = StatusFilter::for_criterion(criterion);
    let mut predicates: Vec<JobPredicate> = vec![
        Box::new(|job: &Job| job.buildable),
        Box::new(move |job: &Job| status.matches(job)),
    ];
    if matcher.is_filtering() {
        predicates.push(Box::new(move |job: &Job| matcher.matches(job.display_name())));
    }
    predicates
}

/// Keep the candidates every predicate accepts, preserving their order.
pub fn filter_jobs(candidates: Vec<Job>, predicates: &[JobPredicate]) -> Vec<Job> {
    candidates
        .into_iter()
        .filter(|job| predicates.iter().fold(true, |keep, p| keep && p(job)))
        .collect()
}

/// Selects the jobs a pass should dispatch to.
pub struct SelectionEngine {
    provider: Arc<dyn JobProvider>,
}

impl SelectionEngine {
    pub fn new(provider: Arc<dyn JobProvider>) -> Self {
        Self { provider }
    }

    /// Candidate jobs, restricted to `scope` when it names a known view.
    pub async fn candidates(&self, scope: Option<&str>) -> Result<Vec<Job>> {
        if let Some(name) = scope.filter(|s| !s.is_empty()) {
            match self.provider.resolve_view(name).await? {
                Some(jobs) => {
                    debug!(view = name, count = jobs.len(), "Scoped candidates to view");
                    return Ok(jobs);
                }
                None => warn!(view = name, "View not found, using all jobs"),
            }
        }
        self.provider.list_jobs().await
    }

    /// Apply `criterion` and an already compiled `matcher` to the candidates.
    pub async fn select(
        &self,
        criterion: SelectionCriterion,
        matcher: PatternMatcher,
        scope: Option<&str>,
    ) -> Result<Vec<Job>> {
        let candidates = self.candidates(scope).await?;
        let total = candidates.len();

        let selected = filter_jobs(candidates, &predicates(criterion, matcher));
        debug!(
            %criterion,
            candidates = total,
            selected = selected.len(),
            "Selected jobs"
        );
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulk_core::job::Outcome;

    fn jobs() -> Vec<Job> {
        vec![
            Job::new("green").with_outcome(Outcome::Success),
            Job::new("red").with_outcome(Outcome::Failure),
            Job::new("yellow").with_outcome(Outcome::Unstable),
            Job::new("fresh"),
            Job::new("off").with_outcome(Outcome::Failure).disabled(),
        ]
    }

    fn select(criterion: SelectionCriterion, pattern: Option<&str>) -> Vec<String> {
        let matcher = PatternMatcher::new(pattern).unwrap();
        filter_jobs(jobs(), &predicates(criterion, matcher))
            .into_iter()
            .map(|j| j.name.to_string())
            .collect()
    }

    #[test]
    fn test_all_excludes_disabled() {
        assert_eq!(
            select(SelectionCriterion::All, None),
            vec!["green", "red", "yellow", "fresh"]
        );
    }

    #[test]
    fn test_only_variants() {
        assert_eq!(select(SelectionCriterion::FailedOnly, None), vec!["red"]);
        assert_eq!(select(SelectionCriterion::UnstableOnly, None), vec!["yellow"]);
        assert!(select(SelectionCriterion::NotBuildOnly, None).is_empty());
    }

    #[test]
    fn test_failed_includes_never_built() {
        assert_eq!(select(SelectionCriterion::Failed, None), vec!["red", "fresh"]);
    }

    #[test]
    fn test_pattern_composes_with_status() {
        assert_eq!(select(SelectionCriterion::Unstable, Some("*e*")), vec!["red", "yellow", "fresh"]);
        assert_eq!(select(SelectionCriterion::FailedOnly, Some("g*")), Vec::<String>::new());
        assert_eq!(select(SelectionCriterion::ByPattern, Some("*r*")), vec!["green", "red", "fresh"]);
    }

    #[test]
    fn test_pattern_matches_display_name() {
        let candidates = vec![Job::new("job-1").with_display_name("Nightly Docs")];
        let matcher = PatternMatcher::new(Some("Nightly*")).unwrap();
        let selected = filter_jobs(candidates, &predicates(SelectionCriterion::All, matcher));
        assert_eq!(selected.len(), 1);
    }
}
