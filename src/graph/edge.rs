//! Visual edge definitions.
//!
//! The branch condition travels as the edge label, which is what the canvas
//! draws on the connection.

use serde::{Deserialize, Serialize};

use crate::model::{EdgeId, NodeId};

/// Canvas edge, shaped as `{id, source, target, label}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VisualEdge {
    /// Unique edge identifier.
    pub id: EdgeId,
    /// ID of the source node.
    pub source: NodeId,
    /// ID of the target node.
    pub target: NodeId,
    /// Branch of the source's output this edge follows, usually "true" or "false".
    #[serde(rename = "label", alias = "condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl VisualEdge {
    /// Creates an edge whose id is derived from its endpoints and condition.
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        condition: Option<String>,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target, condition.as_deref()),
            source,
            target,
            condition,
        }
    }

    /// Whether either endpoint is `nid`.
    pub fn touches(
        &self,
        nid: &str,
    ) -> bool {
        self.source == nid || self.target == nid
    }
}

/// Deterministic edge id `source-target-condition`.
///
/// Two edges with the same endpoints and condition share an id, so only one
/// of them can live in the graph.
pub fn edge_id(
    source: &str,
    target: &str,
    condition: Option<&str>,
) -> EdgeId {
    match condition {
        Some(condition) => format!("{}-{}-{}", source, target, condition),
        None => format!("{}-{}", source, target),
    }
}
