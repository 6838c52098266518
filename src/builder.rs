use std::{path::Path, sync::Arc};

use tracing::debug;

use crate::{
    Config, DanglingEdgePolicy, Result, WorkflowController,
    api::{HttpRuleApi, RuleApi},
};

/// Assembles a [`WorkflowController`] from configuration.
///
/// Without an explicit [`RuleApi`] the controller talks HTTP to
/// `config.api.base_url`.
#[derive(Default)]
pub struct ControllerBuilder {
    config: Config,
    api: Option<Arc<dyn RuleApi>>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a TOML config file.
    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self> {
        Ok(Self::new().config(Config::create(path)?))
    }

    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(
        mut self,
        base_url: impl Into<String>,
    ) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    pub fn timeout_ms(
        mut self,
        timeout_ms: u64,
    ) -> Self {
        self.config.api.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn dangling_edges(
        mut self,
        policy: DanglingEdgePolicy,
    ) -> Self {
        self.config.editor.dangling_edges = policy;
        self
    }

    /// Use `api` instead of the HTTP client.
    pub fn api(
        mut self,
        api: Arc<dyn RuleApi>,
    ) -> Self {
        self.api = Some(api);
        self
    }

    pub fn build(&self) -> Result<WorkflowController> {
        let api: Arc<dyn RuleApi> = match &self.api {
            Some(api) => api.clone(),
            None => {
                let http = HttpRuleApi::new(&self.config.api)?;
                debug!("controller talks to {}", http.base_url());
                Arc::new(http)
            }
        };

        Ok(WorkflowController::new(api, &self.config.editor))
    }
}
