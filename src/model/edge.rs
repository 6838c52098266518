use serde::{Deserialize, Serialize};

use crate::model::NodeId;

/// edge id
pub type EdgeId = String;

/// An edge as the rule-engine service stores it.
///
/// The branch condition is kept on the wire. `label` is accepted as an alias
/// because stored canvas payloads carry the condition there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EdgeId>,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, alias = "label", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl PersistedEdge {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        condition: Option<String>,
    ) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            condition,
        }
    }
}
