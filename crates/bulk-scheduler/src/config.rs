//! Builder configuration.

use bulk_core::history::HISTORY_CAPACITY;
use bulk_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for a [`crate::builder::BulkBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Patterns kept in the history, at most [`HISTORY_CAPACITY`].
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Scheduling calls in flight at once during a pass.
    #[serde(default = "default_dispatch_concurrency")]
    pub dispatch_concurrency: usize,
}

fn default_history_capacity() -> usize {
    HISTORY_CAPACITY
}

fn default_dispatch_concurrency() -> usize {
    4
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            dispatch_concurrency: default_dispatch_concurrency(),
        }
    }
}

impl BuilderConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dispatch_concurrency == 0 {
            return Err(Error::Config(
                "dispatch_concurrency must be at least 1".to_string(),
            ));
        }
        if self.history_capacity == 0 || self.history_capacity > HISTORY_CAPACITY {
            return Err(Error::Config(format!(
                "history_capacity must be between 1 and {}",
                HISTORY_CAPACITY
            )));
        }
        Ok(())
    }
}
