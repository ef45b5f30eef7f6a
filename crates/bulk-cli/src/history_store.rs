//! JSON-file persistence for the pattern history.

use async_trait::async_trait;
use bulk_core::Result;
use bulk_core::history::HistoryItem;
use bulk_core::ports::HistoryStore;
use std::path::PathBuf;
use tracing::debug;

pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryItem>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(vec![]);
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        let items: Vec<HistoryItem> = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), count = items.len(), "Read history file");
        Ok(items)
    }

    async fn save(&self, items: &[HistoryItem]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(items)?).await?;
        Ok(())
    }
}
