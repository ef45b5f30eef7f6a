//! CLI configuration management.

use bulk_scheduler::BuilderConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Workspace file describing jobs, views, and the queue.
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,
    /// Pattern history file. Defaults to the user data directory.
    #[serde(default)]
    pub history_file: Option<PathBuf>,
    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Engine tunables.
    #[serde(default)]
    pub builder: BuilderConfig,
}

fn default_workspace() -> PathBuf {
    PathBuf::from("bulk.yaml")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            history_file: None,
            output_format: OutputFormat::default(),
            builder: BuilderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl CliConfig {
    /// Load configuration from file.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    fn project_dirs() -> Result<directories::ProjectDirs, Box<dyn std::error::Error>> {
        Ok(directories::ProjectDirs::from("dev", "bulk", "bulk-cli")
            .ok_or("Could not determine config directory")?)
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    /// Where the pattern history is kept.
    pub fn history_path(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.history_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("history.json")),
        }
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "workspace" => self.workspace = PathBuf::from(value),
            "history_file" => self.history_file = Some(PathBuf::from(value)),
            "output_format" => {
                self.output_format = match value {
                    "table" => OutputFormat::Table,
                    "json" => OutputFormat::Json,
                    "yaml" => OutputFormat::Yaml,
                    _ => return Err(format!("Invalid output format: {}", value)),
                };
            }
            "history_capacity" | "dispatch_concurrency" => {
                let mut builder = self.builder.clone();
                let count = parse_count(key, value)?;
                if key == "history_capacity" {
                    builder.history_capacity = count;
                } else {
                    builder.dispatch_concurrency = count;
                }
                builder.validate().map_err(|e| e.to_string())?;
                self.builder = builder;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{} must be a positive integer, got {}", key, value)),
    }
}
