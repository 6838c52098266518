//! Conversion between the canvas graph and the stored graph.
//!
//! Both directions are pure: nothing here touches the network or the store.

use serde::{Deserialize, Serialize};

use crate::{
    graph::{NodeData, NodeKind, VisualEdge, VisualNode, edge::edge_id},
    model::{PersistedEdge, PersistedGraph, PersistedNode, Position},
};

/// Horizontal gap between nodes placed by [`fallback_position`].
pub const FALLBACK_SPACING_X: f64 = 200.0;
/// Row used by [`fallback_position`].
pub const FALLBACK_Y: f64 = 100.0;

/// Node and edge lists as the canvas sees them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct VisualGraph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

/// Position given to the `index`-th stored node when it has none.
pub fn fallback_position(index: usize) -> Position {
    Position::new(index as f64 * FALLBACK_SPACING_X, FALLBACK_Y)
}

/// Strip canvas-only attributes (position, node type, edge id) for saving.
pub fn to_persisted(
    nodes: &[VisualNode],
    edges: &[VisualEdge],
) -> PersistedGraph {
    PersistedGraph {
        nodes: nodes.iter().map(|node| PersistedNode::new(node.id.clone(), node.data.label.clone(), node.data.params.clone())).collect(),
        edges: edges.iter().map(|edge| PersistedEdge::new(edge.source.clone(), edge.target.clone(), edge.condition.clone())).collect(),
    }
}

/// Rebuild the canvas graph from a stored one, preserving backend order.
pub fn from_persisted(graph: PersistedGraph) -> VisualGraph {
    let nodes = graph
        .nodes
        .into_iter()
        .enumerate()
        .map(|(index, node)| VisualNode {
            position: node.position.unwrap_or_else(|| fallback_position(index)),
            id: node.id,
            kind: NodeKind::FunctionCall,
            data: NodeData {
                label: node.function_name,
                params: node.params,
            },
        })
        .collect();

    let edges = graph
        .edges
        .into_iter()
        .map(|edge| VisualEdge {
            id: edge.id.unwrap_or_else(|| edge_id(&edge.source, &edge.target, edge.condition.as_deref())),
            source: edge.source,
            target: edge.target,
            condition: edge.condition,
        })
        .collect();

    VisualGraph {
        nodes,
        edges,
    }
}
