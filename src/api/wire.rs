//! Request and response bodies of the rule-engine endpoints.
//!
//! Responses accept the field names older backend revisions used.

use serde::{Deserialize, Serialize};

use crate::model::{PersistedEdge, PersistedGraph, PersistedNode, Rule, RuleId, RuleSummary};

#[derive(Serialize, Debug)]
pub(crate) struct SaveRuleRequest<'a> {
    pub rule_name: &'a str,
    pub nodes: &'a [PersistedNode],
    pub edges: &'a [PersistedEdge],
}

#[derive(Deserialize, Debug)]
pub(crate) struct SaveRuleResponse {
    #[serde(alias = "rule_engine_id")]
    pub id: RuleId,
    #[serde(default)]
    pub rule_name: Option<String>,
}

impl SaveRuleResponse {
    pub fn into_summary(
        self,
        requested_name: &str,
    ) -> RuleSummary {
        RuleSummary {
            id: self.id,
            name: self.rule_name.unwrap_or_else(|| requested_name.to_string()),
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct RuleDetailsResponse {
    #[serde(default)]
    pub id: Option<RuleId>,
    #[serde(default, alias = "rule_engine")]
    pub rule_name: Option<String>,
    /// null for rules stored before graphs were kept
    #[serde(default)]
    pub reactflow_json: Option<PersistedGraph>,
}

impl RuleDetailsResponse {
    pub fn into_rule(
        self,
        requested: RuleId,
    ) -> Rule {
        Rule {
            id: self.id.unwrap_or(requested),
            name: self.rule_name.unwrap_or_default(),
            graph: self.reactflow_json.unwrap_or_default(),
        }
    }
}

/// Error body shapes: `{"error": ...}` from the rule views, `{"detail": ...}`
/// from the framework's own 404/405 handlers.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorResponse {
    #[serde(alias = "detail")]
    pub error: String,
}
