//! Job, outcome, and view types.
//!
//! These mirror the state a host build system exposes about its jobs. The
//! selection engine only ever reads them.

use crate::ids::{JobName, ViewName};
use crate::parameters::ParameterSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result classification of a completed build.
///
/// Variants are declared best to worst; the derived `Ord` is the severity
/// order used by "at or worse than" filters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Success,
        Outcome::Unstable,
        Outcome::Failure,
        Outcome::NotBuilt,
        Outcome::Aborted,
    ];

    pub fn is_worse_or_equal_to(&self, other: Outcome) -> bool {
        *self >= other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "SUCCESS",
            Outcome::Unstable => "UNSTABLE",
            Outcome::Failure => "FAILURE",
            Outcome::NotBuilt => "NOT_BUILT",
            Outcome::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A buildable unit of work tracked by the host build system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    pub name: JobName,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Disabled jobs are never selected.
    #[serde(default = "default_buildable")]
    pub buildable: bool,
    /// Outcome of the last completed build, absent if the job never completed one.
    #[serde(default)]
    pub last_outcome: Option<Outcome>,
    #[serde(default)]
    pub parameters: Option<ParameterSchema>,
}

fn default_buildable() -> bool {
    true
}

impl Job {
    pub fn new(name: impl Into<JobName>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            buildable: true,
            last_outcome: None,
            parameters: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.last_outcome = Some(outcome);
        self
    }

    pub fn with_parameters(mut self, schema: ParameterSchema) -> Self {
        self.parameters = Some(schema);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.buildable = false;
        self
    }

    /// Name shown to operators; falls back to the job name.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.name.as_str())
    }

    pub fn has_completed_build(&self) -> bool {
        self.last_outcome.is_some()
    }

    pub fn is_parameterized(&self) -> bool {
        self.parameters.is_some()
    }
}

/// A named, possibly nested grouping of jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct View {
    pub name: ViewName,
    #[serde(default)]
    pub jobs: Vec<JobName>,
    #[serde(default)]
    pub views: Vec<View>,
}

impl View {
    pub fn new(name: impl Into<ViewName>) -> Self {
        Self {
            name: name.into(),
            jobs: vec![],
            views: vec![],
        }
    }

    pub fn with_jobs<I, N>(mut self, jobs: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<JobName>,
    {
        self.jobs.extend(jobs.into_iter().map(Into::into));
        self
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }
}
