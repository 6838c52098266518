//! # Ruleflow
//!
//! Ruleflow is the editing core behind a visual rule builder. A rule is a
//! directed graph of function-call nodes joined by conditional edges; the
//! rules themselves are stored and executed by a remote rule-engine service.
//!
//! ## Core Features
//!
//! - **Working Graph**: Add, connect, move and remove nodes, or apply change-lists from a canvas widget
//! - **Rule Lifecycle**: Load, save, execute and delete rules through a pluggable [`RuleApi`]
//! - **Stale Response Handling**: Overlapping operations never let an older response overwrite a newer one
//! - **Notifications**: One user-visible message per completed action over a broadcast queue
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ruleflow::ControllerBuilder;
//!
//! let controller = ControllerBuilder::new().base_url("http://localhost:8000/rule_engine/").build()?;
//! controller.refresh_catalog().await?;
//!
//! let a = controller.add_function("check_limit")?;
//! let b = controller.add_function("approve")?;
//! controller.connect(&a, &b, "true")?;
//!
//! let saved = controller.save("claims").await?;
//! let output = controller.execute().await?;
//! ```

mod api;
mod builder;
mod catalog;
mod common;
mod config;
mod controller;
mod error;
mod events;
pub mod graph;
mod model;
mod utils;

use std::sync::Arc;

use parking_lot::RwLock;

pub use api::{HttpRuleApi, RuleApi};
pub use builder::ControllerBuilder;
pub use catalog::RuleCatalog;
pub use config::{ApiConfig, Config, DEFAULT_BASE_URL, DanglingEdgePolicy, EditorConfig};
pub use controller::{EditorState, WorkflowController};
pub use error::RuleflowError;
pub use events::{Notification, NotificationLevel};
pub use graph::{EdgeChange, GraphStore, NodeChange, VisualEdge, VisualGraph, VisualNode};
pub use model::*;

/// Result type alias for Ruleflow operations.
pub type Result<T> = std::result::Result<T, RuleflowError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
