pub mod changes;
pub mod edge;
pub mod id;
pub mod node;
mod store;
pub mod transform;

pub use changes::{EdgeChange, NodeChange};
pub use edge::VisualEdge;
pub use id::IdAllocator;
pub use node::{NodeData, NodeKind, VisualNode};
pub use store::GraphStore;
pub use transform::{VisualGraph, from_persisted, to_persisted};
