//! Working copy of the graph being edited.
//!
//! The store keeps nodes and edges as ordered sequences (canvas order is
//! backend order after a load) and owns the node id allocator for the
//! session. Every mutation of the working graph goes through here.

use rand::Rng;
use tracing::{trace, warn};

use crate::{
    DanglingEdgePolicy, Result, RuleflowError,
    graph::{
        EdgeChange, IdAllocator, NodeChange, VisualEdge, VisualNode,
        id::max_numeric_id,
        transform::VisualGraph,
    },
    model::{EdgeId, NodeId, Params, Position},
};

/// Default random placement range for new nodes.
pub const DEFAULT_SPAWN_EXTENT: f64 = 400.0;

/// Live node and edge sequences plus id allocation.
#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<VisualNode>,
    edges: Vec<VisualEdge>,
    ids: IdAllocator,
    dangling_edges: DanglingEdgePolicy,
    spawn_extent: f64,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(DanglingEdgePolicy::default(), DEFAULT_SPAWN_EXTENT)
    }
}

impl GraphStore {
    /// create an empty store
    pub fn new(
        dangling_edges: DanglingEdgePolicy,
        spawn_extent: f64,
    ) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            ids: IdAllocator::new(),
            dangling_edges,
            spawn_extent: if spawn_extent.is_finite() && spawn_extent > 0.0 {
                spawn_extent
            } else {
                DEFAULT_SPAWN_EXTENT
            },
        }
    }

    pub fn with_policy(dangling_edges: DanglingEdgePolicy) -> Self {
        Self::new(dangling_edges, DEFAULT_SPAWN_EXTENT)
    }

    pub fn nodes(&self) -> &[VisualNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[VisualEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn dangling_edge_policy(&self) -> DanglingEdgePolicy {
        self.dangling_edges
    }

    /// id the next [`GraphStore::add_node`] will use
    pub fn next_node_id(&self) -> NodeId {
        self.ids.peek().to_string()
    }

    /// get node by id
    pub fn node(
        &self,
        id: &str,
    ) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// get edge by id
    pub fn edge(
        &self,
        id: &str,
    ) -> Option<&VisualEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// clone the current graph
    pub fn snapshot(&self) -> VisualGraph {
        VisualGraph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Add a function-call node at a random spot on the canvas.
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
    ) -> NodeId {
        let mut rng = rand::rng();
        let position = Position::new(rng.random_range(0.0..self.spawn_extent), rng.random_range(0.0..self.spawn_extent));
        self.add_node_at(label, position)
    }

    /// Add a function-call node at `position`.
    pub fn add_node_at(
        &mut self,
        label: impl Into<String>,
        position: Position,
    ) -> NodeId {
        let id = self.ids.next();
        let label = label.into();
        trace!("graph::add_node({}, {})", id, label);
        self.nodes.push(VisualNode::new(id.clone(), label, position));
        id
    }

    /// Replace the params of node `id`.
    pub fn set_params(
        &mut self,
        id: &str,
        params: Params,
    ) -> Result<()> {
        let node = self.nodes.iter_mut().find(|n| n.id == id).ok_or_else(|| RuleflowError::Validation(format!("node {} does not exist", id)))?;
        node.data.params = params;
        Ok(())
    }

    /// Move node `id`. Returns false when the node does not exist.
    pub fn move_node(
        &mut self,
        id: &str,
        position: Position,
    ) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Remove node `id`, handling its edges according to the dangling edge policy.
    /// Returns false when the node does not exist.
    pub fn remove_node(
        &mut self,
        id: &str,
    ) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return false;
        }
        trace!("graph::remove_node({})", id);

        match self.dangling_edges {
            DanglingEdgePolicy::Preserve => {}
            DanglingEdgePolicy::Cascade => {
                self.edges.retain(|e| !e.touches(id));
            }
        }
        true
    }

    /// Remove edge `id`. Returns false when the edge does not exist.
    pub fn remove_edge(
        &mut self,
        id: &str,
    ) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        self.edges.len() != before
    }

    /// Connect two existing nodes on the `condition` branch.
    ///
    /// The edge id is `source-target-condition`; connecting the same pair on
    /// the same condition again overwrites the earlier edge.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        condition: &str,
    ) -> Result<EdgeId> {
        if self.node(source).is_none() {
            return Err(RuleflowError::Validation(format!("source node {} does not exist", source)));
        }
        if self.node(target).is_none() {
            return Err(RuleflowError::Validation(format!("target node {} does not exist", target)));
        }

        let edge = VisualEdge::new(source, target, Some(condition.to_string()));
        let id = edge.id.clone();
        trace!("graph::connect({})", id);
        self.upsert_edge(edge);
        Ok(id)
    }

    /// Swap the whole graph, e.g. after loading a rule.
    ///
    /// Later duplicates of a node or edge id replace earlier ones. The id
    /// allocator continues after the largest numeric node id.
    pub fn replace_graph(
        &mut self,
        nodes: Vec<VisualNode>,
        edges: Vec<VisualEdge>,
    ) {
        self.nodes.clear();
        self.edges.clear();
        for node in nodes {
            if self.node(&node.id).is_some() {
                warn!("duplicate node id {} in replaced graph", node.id);
            }
            self.upsert_node(node);
        }
        for edge in edges {
            self.upsert_edge(edge);
        }
        self.ids.reseed(max_numeric_id(self.nodes.iter().map(|n| n.id.as_str())));
        trace!("graph::replace_graph(nodes: {}, edges: {}, next id: {})", self.nodes.len(), self.edges.len(), self.ids.peek());
    }

    /// Drop everything and start counting ids from "1" again.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.ids.reset();
    }

    /// Apply a node change-list from the canvas widget.
    pub fn apply_node_changes(
        &mut self,
        changes: impl IntoIterator<Item = NodeChange>,
    ) {
        for change in changes {
            match change {
                NodeChange::Position {
                    id,
                    position,
                } => {
                    if let Some(position) = position {
                        self.move_node(&id, position);
                    }
                }
                NodeChange::Remove {
                    id,
                } => {
                    self.remove_node(&id);
                }
                NodeChange::Add {
                    item,
                } => {
                    self.ids.observe(&item.id);
                    self.upsert_node(item);
                }
                NodeChange::Replace {
                    id,
                    mut item,
                } => {
                    if let Some(slot) = self.nodes.iter_mut().find(|n| n.id == id) {
                        item.id = id;
                        *slot = item;
                    }
                }
                NodeChange::Ignored => {}
            }
        }
    }

    /// Apply an edge change-list from the canvas widget.
    pub fn apply_edge_changes(
        &mut self,
        changes: impl IntoIterator<Item = EdgeChange>,
    ) {
        for change in changes {
            match change {
                EdgeChange::Remove {
                    id,
                } => {
                    self.remove_edge(&id);
                }
                EdgeChange::Add {
                    item,
                } => self.upsert_edge(item),
                EdgeChange::Replace {
                    id,
                    mut item,
                } => {
                    if let Some(slot) = self.edges.iter_mut().find(|e| e.id == id) {
                        item.id = id;
                        *slot = item;
                    }
                }
                EdgeChange::Ignored => {}
            }
        }
    }

    /// Edges whose source or target is not in the node set.
    pub fn dangling_edges(&self) -> Vec<&VisualEdge> {
        self.edges.iter().filter(|e| self.node(&e.source).is_none() || self.node(&e.target).is_none()).collect()
    }

    /// Output a human-readable representation of the working graph
    pub fn schema(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Rule Graph ===".to_string());
        lines.push(format!("Nodes: {}, Edges: {}", self.nodes.len(), self.edges.len()));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for node in &self.nodes {
            lines.push(format!(
                "[{}] {} (params: {}, at: {:.0},{:.0})",
                node.id,
                node.data.label,
                node.data.params.len(),
                node.position.x,
                node.position.y
            ));
        }
        lines.push(String::new());

        lines.push("--- Edges ---".to_string());
        for edge in &self.edges {
            let dangling = if self.node(&edge.source).is_none() || self.node(&edge.target).is_none() {
                " (dangling)"
            } else {
                ""
            };
            lines.push(format!(
                "{} --[{}]--> {} (id: {}){}",
                edge.source,
                edge.condition.as_deref().unwrap_or("-"),
                edge.target,
                edge.id,
                dangling
            ));
        }

        lines.join("\n")
    }

    fn upsert_node(
        &mut self,
        node: VisualNode,
    ) {
        match self.nodes.iter_mut().find(|n| n.id == node.id) {
            Some(slot) => *slot = node,
            None => self.nodes.push(node),
        }
    }

    fn upsert_edge(
        &mut self,
        edge: VisualEdge,
    ) {
        match self.edges.iter_mut().find(|e| e.id == edge.id) {
            Some(slot) => *slot = edge,
            None => self.edges.push(edge),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    fn store_with(labels: &[&str]) -> GraphStore {
        let mut store = GraphStore::default();
        for (i, label) in labels.iter().enumerate() {
            store.add_node_at(*label, Position::new(i as f64, 0.0));
        }
        store
    }

    fn loaded(ids: &[&str]) -> Vec<VisualNode> {
        ids.iter().map(|id| VisualNode::new(*id, format!("fn_{}", id), Position::default())).collect()
    }

    #[test]
    fn test_add_node_allocates_sequential_ids() {
        let mut store = GraphStore::default();
        let a = store.add_node("load_claim");
        let b = store.add_node("approve");
        assert_eq!((a.as_str(), b.as_str()), ("1", "2"));

        let node = store.node("1").unwrap();
        assert_eq!(node.label(), "load_claim");
        assert!(node.params().is_empty());
        assert!((0.0..400.0).contains(&node.position.x));
        assert!((0.0..400.0).contains(&node.position.y));
    }

    #[test]
    fn test_replace_graph_reseeds_ids() {
        let mut store = GraphStore::default();
        store.replace_graph(loaded(&["3", "7", "1"]), vec![]);
        assert_eq!(store.add_node("next"), "8");
    }

    #[test]
    fn test_replace_graph_with_max_u64_id() {
        let mut store = GraphStore::default();
        store.replace_graph(loaded(&["18446744073709551615"]), vec![]);
        assert_eq!(store.add_node("next"), "1");
        assert_eq!(store.add_node("after"), "2");
        assert_eq!(store.node_count(), 3);
    }

    #[test]
    fn test_ids_stay_unique_across_loads() {
        let mut store = GraphStore::default();
        store.add_node("a");
        store.add_node("b");
        store.replace_graph(loaded(&["2", "5"]), vec![]);
        store.add_node("c");
        store.replace_graph(loaded(&["1", "x"]), vec![]);
        store.add_node("d");
        store.add_node("e");
        store.remove_node("2");
        store.add_node("f");

        let ids: HashSet<_> = store.nodes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids.len(), store.node_count());
    }

    #[test]
    fn test_replace_graph_collapses_duplicate_ids() {
        let mut store = GraphStore::default();
        let mut nodes = loaded(&["1", "2"]);
        nodes.push(VisualNode::new("1", "winner", Position::default()));
        store.replace_graph(nodes, vec![]);
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.node("1").unwrap().label(), "winner");
    }

    #[test]
    fn test_clear_resets_allocator() {
        let mut store = store_with(&["a", "b", "c"]);
        store.connect("1", "2", "true").unwrap();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.add_node("again"), "1");
    }

    #[test]
    fn test_connect_same_condition_overwrites() {
        let mut store = GraphStore::default();
        store.replace_graph(
            vec![
                VisualNode::new("A", "a", Position::default()),
                VisualNode::new("B", "b", Position::default()),
            ],
            vec![],
        );
        assert_eq!(store.connect("A", "B", "true").unwrap(), "A-B-true");
        assert_eq!(store.connect("A", "B", "true").unwrap(), "A-B-true");
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.edges()[0].id, "A-B-true");

        store.connect("A", "B", "false").unwrap();
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn test_connect_requires_existing_nodes() {
        let mut store = store_with(&["a"]);
        let err = store.connect("1", "9", "true").unwrap_err();
        assert_eq!(err, RuleflowError::Validation("target node 9 does not exist".to_string()));
        let err = store.connect("9", "1", "true").unwrap_err();
        assert!(matches!(err, RuleflowError::Validation(_)));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_remove_node_preserves_edges() {
        let mut store = store_with(&["a", "b", "c"]);
        store.connect("1", "2", "true").unwrap();
        store.connect("2", "3", "false").unwrap();

        assert!(store.remove_node("2"));
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 2);
        assert_eq!(store.dangling_edges().len(), 2);
        assert!(store.schema().contains("(dangling)"));
        assert!(!store.remove_node("2"));
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let mut store = GraphStore::with_policy(DanglingEdgePolicy::Cascade);
        for label in ["a", "b", "c"] {
            store.add_node(label);
        }
        store.connect("1", "2", "true").unwrap();
        store.connect("2", "3", "false").unwrap();
        store.connect("1", "3", "false").unwrap();

        assert!(store.remove_node("2"));
        assert_eq!(store.edges().iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), ["1-3-false"]);
        assert!(store.dangling_edges().is_empty());
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut store = store_with(&["a", "b"]);
        store.remove_node("2");
        assert_eq!(store.add_node("c"), "3");
    }

    #[test]
    fn test_set_params() {
        let mut store = store_with(&["check_limit"]);
        let params = json!({"limit": 100}).as_object().cloned().unwrap();
        store.set_params("1", params).unwrap();
        assert_eq!(store.node("1").unwrap().params()["limit"], json!(100));
        assert!(store.set_params("2", Params::new()).is_err());
    }

    #[test]
    fn test_apply_node_changes_is_idempotent() {
        let mut store = store_with(&["a", "b"]);
        let changes = vec![
            NodeChange::Position {
                id: "1".to_string(),
                position: Some(Position::new(50.0, 60.0)),
            },
            NodeChange::Position {
                id: "1".to_string(),
                position: None,
            },
            NodeChange::Remove {
                id: "2".to_string(),
            },
            NodeChange::Add {
                item: VisualNode::new("12", "pasted", Position::default()),
            },
            NodeChange::Ignored,
        ];

        store.apply_node_changes(changes.clone());
        let once = store.snapshot();
        store.apply_node_changes(changes);
        assert_eq!(store.snapshot(), once);

        assert_eq!(store.node("1").unwrap().position, Position::new(50.0, 60.0));
        assert!(store.node("2").is_none());
        assert_eq!(store.node_count(), 2);
        // a pasted numeric id pushes the allocator forward
        assert_eq!(store.add_node("after"), "13");
    }

    #[test]
    fn test_apply_replace_keeps_slot_id() {
        let mut store = store_with(&["a"]);
        store.apply_node_changes([NodeChange::Replace {
            id: "1".to_string(),
            item: VisualNode::new("99", "renamed", Position::default()),
        }]);
        assert_eq!(store.node("1").unwrap().label(), "renamed");
        assert!(store.node("99").is_none());

        store.apply_node_changes([NodeChange::Replace {
            id: "5".to_string(),
            item: VisualNode::new("5", "ghost", Position::default()),
        }]);
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_apply_edge_changes_is_idempotent() {
        let mut store = store_with(&["a", "b"]);
        store.connect("1", "2", "true").unwrap();
        let changes = vec![
            EdgeChange::Remove {
                id: "1-2-true".to_string(),
            },
            EdgeChange::Add {
                item: VisualEdge::new("2", "1", Some("false".to_string())),
            },
        ];

        store.apply_edge_changes(changes.clone());
        store.apply_edge_changes(changes);
        assert_eq!(store.edges().iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), ["2-1-false"]);
    }

    #[test]
    fn test_schema() {
        let mut store = store_with(&["load_claim", "approve"]);
        store.connect("1", "2", "true").unwrap();
        let schema = store.schema();
        assert!(schema.contains("Nodes: 2, Edges: 1"));
        assert!(schema.contains("[1] load_claim"));
        assert!(schema.contains("1 --[true]--> 2 (id: 1-2-true)"));
    }
}
