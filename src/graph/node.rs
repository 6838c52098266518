//! Visual node definitions for the editor canvas.

use serde::{Deserialize, Serialize};

use crate::model::{NodeId, Params, Position};

/// Node type understood by the canvas widget.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr)]
pub enum NodeKind {
    /// Invokes a backend function by name.
    #[default]
    #[serde(rename = "function-call", alias = "ruleNode")]
    #[strum(serialize = "function-call")]
    FunctionCall,
}

/// Payload the canvas renders inside a node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    /// name of the function to invoke
    pub label: String,
    /// parameters passed to the function
    #[serde(default)]
    pub params: Params,
}

/// A node on the editor canvas, shaped as `{id, type, position, data}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisualNode {
    /// node id
    pub id: NodeId,
    /// node type
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    /// canvas position
    pub position: Position,
    /// label and params
    pub data: NodeData,
}

impl VisualNode {
    pub fn new(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::FunctionCall,
            position,
            data: NodeData {
                label: label.into(),
                params: Params::new(),
            },
        }
    }

    pub fn with_params(
        mut self,
        params: Params,
    ) -> Self {
        self.data.params = params;
        self
    }

    /// function name this node invokes
    pub fn label(&self) -> &str {
        &self.data.label
    }

    pub fn params(&self) -> &Params {
        &self.data.params
    }
}
