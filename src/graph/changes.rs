//! Change-lists emitted by the canvas widget.
//!
//! The widget reports drags, deletions and insertions as tagged change
//! objects. Applying the same list twice leaves the store as applying it
//! once: removals of missing ids are ignored and additions of existing ids
//! replace in place.

use serde::{Deserialize, Serialize};

use crate::{
    graph::{VisualEdge, VisualNode},
    model::{EdgeId, NodeId, Position},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
    /// Node dragged. The widget omits `position` while a drag is in progress.
    Position {
        id: NodeId,
        #[serde(default)]
        position: Option<Position>,
    },
    Remove {
        id: NodeId,
    },
    Add {
        item: VisualNode,
    },
    /// Swap the node in slot `id`; the slot keeps its id.
    Replace {
        id: NodeId,
        item: VisualNode,
    },
    /// Selection, dimension and other purely visual changes.
    #[serde(other)]
    Ignored,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
    Remove {
        id: EdgeId,
    },
    Add {
        item: VisualEdge,
    },
    /// Swap the edge in slot `id`; the slot keeps its id.
    Replace {
        id: EdgeId,
        item: VisualEdge,
    },
    #[serde(other)]
    Ignored,
}
