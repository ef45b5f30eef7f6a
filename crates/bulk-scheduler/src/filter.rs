//! Predicates over a job's last completed build.

use bulk_core::job::{Job, Outcome};
use bulk_core::selection::SelectionCriterion;

/// Outcome-based filter for a selection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Last completed build has exactly this outcome. Never-built jobs do not match.
    Exactly(Outcome),
    /// Never built, or last outcome is this bad or worse.
    AtOrWorseThan(Outcome),
    /// No outcome filtering.
    Any,
}

impl StatusFilter {
    pub fn exactly(outcome: Outcome) -> Self {
        StatusFilter::Exactly(outcome)
    }

    pub fn at_or_worse_than(outcome: Outcome) -> Self {
        StatusFilter::AtOrWorseThan(outcome)
    }

    pub fn for_criterion(criterion: SelectionCriterion) -> Self {
        match criterion {
            SelectionCriterion::All => Self::at_or_worse_than(Outcome::Success),
            SelectionCriterion::Failed => Self::at_or_worse_than(Outcome::Failure),
            SelectionCriterion::FailedOnly => Self::exactly(Outcome::Failure),
            SelectionCriterion::Unstable => Self::at_or_worse_than(Outcome::Unstable),
            SelectionCriterion::UnstableOnly => Self::exactly(Outcome::Unstable),
            SelectionCriterion::NotBuilt => Self::at_or_worse_than(Outcome::NotBuilt),
            SelectionCriterion::NotBuildOnly => Self::exactly(Outcome::NotBuilt),
            SelectionCriterion::Aborted => Self::at_or_worse_than(Outcome::Aborted),
            SelectionCriterion::ByView | SelectionCriterion::ByPattern => StatusFilter::Any,
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        match (self, job.last_outcome) {
            (StatusFilter::Any, _) => true,
            (StatusFilter::Exactly(wanted), Some(last)) => last == *wanted,
            (StatusFilter::Exactly(_), None) => false,
            (StatusFilter::AtOrWorseThan(threshold), Some(last)) => {
                last.is_worse_or_equal_to(*threshold)
            }
            (StatusFilter::AtOrWorseThan(_), None) => true,
        }
    }
}
