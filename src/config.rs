use std::{fs, path::Path};

use serde::Deserialize;

use crate::{Result, RuleflowError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/rule_engine/";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// rule-engine service config
    pub api: ApiConfig,
    /// editor behaviour config
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// base url every endpoint path is joined onto
    pub base_url: String,
    /// request timeout in milliseconds, none waits forever
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// what happens to edges touching a removed node
    pub dangling_edges: DanglingEdgePolicy,
    /// new nodes are dropped at a random point in [0, spawn_extent) on both axes
    pub spawn_extent: f64,
    /// capacity of the notification broadcast queue
    pub notification_capacity: usize,
}

/// Edge handling when a node is removed from the working graph.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DanglingEdgePolicy {
    /// Keep incident edges; they may reference a node that no longer exists.
    #[default]
    Preserve,
    /// Remove every edge whose source or target is the removed node.
    Cascade,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            dangling_edges: DanglingEdgePolicy::default(),
            spawn_extent: 400.0,
            notification_capacity: 64,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())
            .map_err(|e| RuleflowError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(RuleflowError::Config("api.base_url must not be empty".to_string()));
        }
        if !(self.editor.spawn_extent.is_finite() && self.editor.spawn_extent > 0.0) {
            return Err(RuleflowError::Config(format!(
                "editor.spawn_extent must be a positive number, got {}",
                self.editor.spawn_extent
            )));
        }
        if self.editor.notification_capacity == 0 {
            return Err(RuleflowError::Config("editor.notification_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}
