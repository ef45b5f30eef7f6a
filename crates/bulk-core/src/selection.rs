//! Build actions and selection criteria as accepted from callers.

use crate::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to ask of each selected job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ImmediateBuild,
    PollScm,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ImmediateBuild => "immediate_build",
            ActionKind::PollScm => "poll_scm",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate_build" => Ok(ActionKind::ImmediateBuild),
            "poll_scm" => Ok(ActionKind::PollScm),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

/// Rule choosing which jobs a pass targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCriterion {
    All,
    Failed,
    FailedOnly,
    Unstable,
    UnstableOnly,
    NotBuilt,
    NotBuildOnly,
    Aborted,
    ByView,
    ByPattern,
}

impl SelectionCriterion {
    pub const ALL: [SelectionCriterion; 10] = [
        SelectionCriterion::All,
        SelectionCriterion::Failed,
        SelectionCriterion::FailedOnly,
        SelectionCriterion::Unstable,
        SelectionCriterion::UnstableOnly,
        SelectionCriterion::NotBuilt,
        SelectionCriterion::NotBuildOnly,
        SelectionCriterion::Aborted,
        SelectionCriterion::ByView,
        SelectionCriterion::ByPattern,
    ];

    /// The literal token callers use for this criterion.
    pub fn token(&self) -> &'static str {
        match self {
            SelectionCriterion::All => "all",
            SelectionCriterion::Failed => "failed",
            SelectionCriterion::FailedOnly => "failed_only",
            SelectionCriterion::Unstable => "unstable",
            SelectionCriterion::UnstableOnly => "unstable_only",
            SelectionCriterion::NotBuilt => "not_built",
            SelectionCriterion::NotBuildOnly => "not_build_only",
            SelectionCriterion::Aborted => "aborted",
            SelectionCriterion::ByView => "byview",
            SelectionCriterion::ByPattern => "pattern",
        }
    }
}

impl fmt::Display for SelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SelectionCriterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_ascii_lowercase();
        SelectionCriterion::ALL
            .into_iter()
            .find(|criterion| criterion.token() == token)
            .ok_or_else(|| Error::InvalidSelectionToken(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_tokens_case_insensitive() {
        assert_eq!(
            "FAILED_ONLY".parse::<SelectionCriterion>().unwrap(),
            SelectionCriterion::FailedOnly
        );
        assert_eq!(
            "ByView".parse::<SelectionCriterion>().unwrap(),
            SelectionCriterion::ByView
        );
        assert_eq!(
            "pattern".parse::<SelectionCriterion>().unwrap(),
            SelectionCriterion::ByPattern
        );
    }

    #[test]
    fn test_every_token_parses_back() {
        for criterion in SelectionCriterion::ALL {
            assert_eq!(criterion.token().parse::<SelectionCriterion>().unwrap(), criterion);
        }
    }

    #[test]
    fn test_unknown_criterion_rejected() {
        let err = "sometimes".parse::<SelectionCriterion>().unwrap_err();
        assert!(matches!(err, Error::InvalidSelectionToken(ref t) if t == "sometimes"));
        assert!(err.is_rejection());
    }

    #[test]
    fn test_action_tokens() {
        assert_eq!("POLL_SCM".parse::<ActionKind>().unwrap(), ActionKind::PollScm);
        assert_eq!(
            "immediate_build".parse::<ActionKind>().unwrap(),
            ActionKind::ImmediateBuild
        );
        assert!(matches!(
            "deploy".parse::<ActionKind>(),
            Err(Error::InvalidAction(_))
        ));
    }
}
