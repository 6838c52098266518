use serde::{Deserialize, Serialize};

use crate::{
    Result, RuleflowError,
    model::{PersistedEdge, PersistedNode},
};

/// Primary key of a rule in the rule-engine service.
pub type RuleId = u64;

/// Opaque payload returned by the rule executor.
pub type ExecutionResult = serde_json::Value;

/// Node and edge lists as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedGraph {
    #[serde(default)]
    pub nodes: Vec<PersistedNode>,
    #[serde(default)]
    pub edges: Vec<PersistedEdge>,
}

impl PersistedGraph {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<PersistedGraph>(s).map_err(|e| RuleflowError::Convert(format!("invalid rule graph: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// A rule fetched from the backend. The editor only ever holds a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: RuleId,
    /// Empty when the backend did not send a name.
    pub name: String,
    pub graph: PersistedGraph,
}

/// Catalog entry for a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub id: RuleId,
    #[serde(rename = "rule_name", alias = "name")]
    pub name: String,
}

/// Declared input or output of a backend function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

/// A function the backend can invoke from a rule node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    #[serde(rename = "function_name", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<ParamDescriptor>,
    #[serde(default)]
    pub outputs: Vec<ParamDescriptor>,
}
