//! Client side of the rule-engine service.
//!
//! [`RuleApi`] is the seam the controller talks through; [`HttpRuleApi`] is
//! the production implementation over HTTP + JSON.

#[cfg(test)]
pub(crate) mod fake;
mod http;
mod wire;

use async_trait::async_trait;

use crate::{
    Result,
    model::{ExecutionResult, FunctionDescriptor, PersistedEdge, PersistedNode, Rule, RuleId, RuleSummary},
};

pub use http::HttpRuleApi;

/// Remote operations offered by the rule-engine service.
///
/// Every call fails with [`RuleflowError::Transport`](crate::RuleflowError::Transport)
/// when the request cannot be completed or the service answers with a failure
/// status, and with [`RuleflowError::NotFound`](crate::RuleflowError::NotFound)
/// when an addressed rule does not exist. Nothing is retried.
#[async_trait]
pub trait RuleApi: Send + Sync {
    /// List the functions rule nodes may invoke.
    async fn list_functions(&self) -> Result<Vec<FunctionDescriptor>>;

    /// List every stored rule.
    async fn list_rules(&self) -> Result<Vec<RuleSummary>>;

    /// Fetch the stored graph of one rule.
    async fn fetch_rule_graph(
        &self,
        rule_id: RuleId,
    ) -> Result<Rule>;

    /// Store a graph under `name`, creating or replacing the rule.
    async fn save_rule(
        &self,
        name: &str,
        nodes: &[PersistedNode],
        edges: &[PersistedEdge],
    ) -> Result<RuleSummary>;

    /// Delete a rule.
    async fn delete_rule(
        &self,
        rule_id: RuleId,
    ) -> Result<()>;

    /// Run a rule's function pipeline on the backend.
    async fn execute_rule(
        &self,
        rule_id: RuleId,
    ) -> Result<ExecutionResult>;
}
