//! Pattern history types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default number of patterns retained.
pub const HISTORY_CAPACITY: usize = 10;

/// A previously used selection pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryItem {
    pub pattern: String,
    pub used_at: DateTime<Utc>,
}

impl HistoryItem {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            used_at: Utc::now(),
        }
    }
}
