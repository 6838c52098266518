//! Workflow controller - the entry point the editor UI talks to.
//!
//! The controller owns the working graph, the rule catalog and the editor
//! session, and sequences every remote call:
//! - `new_rule` / `load` replace the working graph wholesale
//! - `save` transmits the whole graph and refreshes the catalog
//! - `execute` runs the loaded rule on the backend
//! - `delete` removes a rule independently of what is being edited
//!
//! Operations may overlap. Each one takes a generation ticket when it starts
//! and a response whose ticket has been superseded is dropped without
//! touching shared state. Load and save both decide which rule the editor
//! points at, so starting either one supersedes the other.

mod generation;
mod state;

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::{
    EditorConfig, Result, RuleflowError, ShareLock,
    api::RuleApi,
    catalog::RuleCatalog,
    common::BroadcastQueue,
    events::Notification,
    graph::{EdgeChange, GraphStore, NodeChange, VisualEdge, VisualGraph, VisualNode, from_persisted, to_persisted},
    model::{EdgeId, ExecutionResult, FunctionDescriptor, NodeId, Params, RuleId, RuleSummary},
};

pub use generation::{Generations, OpKind, Ticket};
pub use state::EditorState;

use state::Session;

/// Orchestrates graph editing and the rule lifecycle against a [`RuleApi`].
///
/// Cloning is cheap and every clone drives the same editor.
#[derive(Clone)]
pub struct WorkflowController {
    /// Remote rule-engine service.
    api: Arc<dyn RuleApi>,
    /// Working copy of the graph being edited.
    graph: ShareLock<GraphStore>,
    /// Rules and functions known to the backend.
    catalog: ShareLock<RuleCatalog>,
    /// Loaded rule id and transient state.
    session: ShareLock<Session>,
    /// Latest ticket per operation kind.
    generations: Arc<Generations>,
    /// Outgoing user-visible notifications.
    notifications: Arc<BroadcastQueue<Notification>>,
}

impl WorkflowController {
    pub fn new(
        api: Arc<dyn RuleApi>,
        config: &EditorConfig,
    ) -> Self {
        Self {
            api,
            graph: ShareLock::new(GraphStore::new(config.dangling_edges, config.spawn_extent).into()),
            catalog: ShareLock::new(RuleCatalog::new().into()),
            session: ShareLock::new(Session::default().into()),
            generations: Arc::new(Generations::new()),
            notifications: BroadcastQueue::new(config.notification_capacity.max(1)),
        }
    }

    pub fn state(&self) -> EditorState {
        self.session.read().state()
    }

    pub fn current_rule_id(&self) -> Option<RuleId> {
        self.session.read().current_rule_id
    }

    pub fn nodes(&self) -> Vec<VisualNode> {
        self.graph.read().nodes().to_vec()
    }

    pub fn edges(&self) -> Vec<VisualEdge> {
        self.graph.read().edges().to_vec()
    }

    pub fn graph(&self) -> VisualGraph {
        self.graph.read().snapshot()
    }

    /// Borrow the working graph without cloning it.
    pub fn with_graph<R>(
        &self,
        f: impl FnOnce(&GraphStore) -> R,
    ) -> R {
        f(&self.graph.read())
    }

    pub fn rules(&self) -> Vec<RuleSummary> {
        self.catalog.read().rules().to_vec()
    }

    pub fn functions(&self) -> Vec<FunctionDescriptor> {
        self.catalog.read().functions().to_vec()
    }

    /// Borrow the rule catalog without cloning it.
    pub fn with_catalog<R>(
        &self,
        f: impl FnOnce(&RuleCatalog) -> R,
    ) -> R {
        f(&self.catalog.read())
    }

    /// Receive every notification published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Discard the working graph and start a fresh, unsaved rule.
    ///
    /// In-flight loads, saves and executions are superseded so their
    /// responses cannot pull the editor back to a rule.
    pub fn new_rule(&self) {
        for kind in [OpKind::Load, OpKind::Save, OpKind::Execute] {
            self.generations.invalidate(kind);
        }
        self.graph.write().clear();

        let mut session = self.session.write();
        session.current_rule_id = None;
        session.clear_transient();
        debug!("controller::new_rule");
    }

    /// Add a node invoking `function_name`.
    pub fn add_function(
        &self,
        function_name: &str,
    ) -> Result<NodeId> {
        let function_name = function_name.trim();
        if function_name.is_empty() {
            return Err(self.report(RuleflowError::Validation("function name is required".to_string())));
        }
        Ok(self.graph.write().add_node(function_name))
    }

    pub fn remove_node(
        &self,
        id: &str,
    ) -> bool {
        self.graph.write().remove_node(id)
    }

    /// Connect two nodes on the `condition` branch.
    pub fn connect(
        &self,
        source: &str,
        target: &str,
        condition: &str,
    ) -> Result<EdgeId> {
        let result = self.graph.write().connect(source, target, condition);
        result.map_err(|e| self.report(e))
    }

    pub fn remove_edge(
        &self,
        id: &str,
    ) -> bool {
        self.graph.write().remove_edge(id)
    }

    pub fn set_params(
        &self,
        id: &str,
        params: Params,
    ) -> Result<()> {
        let result = self.graph.write().set_params(id, params);
        result.map_err(|e| self.report(e))
    }

    pub fn apply_node_changes(
        &self,
        changes: impl IntoIterator<Item = NodeChange>,
    ) {
        self.graph.write().apply_node_changes(changes);
    }

    pub fn apply_edge_changes(
        &self,
        changes: impl IntoIterator<Item = EdgeChange>,
    ) {
        self.graph.write().apply_edge_changes(changes);
    }

    /// Fetch a rule and make its graph the working copy.
    pub async fn load(
        &self,
        rule_id: RuleId,
    ) -> Result<()> {
        self.generations.invalidate(OpKind::Save);
        let ticket = self.generations.begin(OpKind::Load);
        debug!("controller::load({}) ticket {}", rule_id, ticket.seq);

        let result = self.api.fetch_rule_graph(rule_id).await;
        if !self.generations.is_current(ticket) {
            return Err(self.superseded(ticket));
        }

        let rule = result.map_err(|e| self.report(e))?;
        let visual = from_persisted(rule.graph);
        let (nodes, edges) = (visual.nodes.len(), visual.edges.len());
        self.graph.write().replace_graph(visual.nodes, visual.edges);
        self.session.write().current_rule_id = Some(rule_id);

        info!("loaded rule {} ({} nodes, {} edges)", rule_id, nodes, edges);
        Ok(())
    }

    /// Save the working graph as `name`, then refresh the catalog.
    pub async fn save(
        &self,
        name: &str,
    ) -> Result<RuleSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.report(RuleflowError::Validation("rule name is required".to_string())));
        }

        let persisted = {
            let graph = self.graph.read();
            to_persisted(graph.nodes(), graph.edges())
        };
        self.generations.invalidate(OpKind::Load);
        let ticket = self.generations.begin(OpKind::Save);
        self.session.write().start(ticket);
        debug!("controller::save({}) ticket {}", name, ticket.seq);

        let result = self.api.save_rule(name, &persisted.nodes, &persisted.edges).await;
        let current = self.generations.is_current(ticket);
        self.session.write().finish(ticket);

        if !current {
            // the rule did change remotely even though the editor ignores it
            if result.is_ok() {
                let _ = self.refresh_catalog().await;
            }
            return Err(self.superseded(ticket));
        }

        let saved = result.map_err(|e| self.report(e))?;
        self.session.write().current_rule_id = Some(saved.id);
        self.catalog.write().upsert(saved.clone());
        info!("saved rule {} as {}", saved.name, saved.id);
        self.notify(Notification::info(format!("Rule '{}' saved", saved.name)));

        if let Err(err) = self.refresh_catalog().await {
            debug!("catalog refresh after save failed: {}", err);
        }
        Ok(saved)
    }

    /// Run the loaded rule on the backend and hand back its result.
    pub async fn execute(&self) -> Result<ExecutionResult> {
        let Some(rule_id) = self.current_rule_id() else {
            return Err(self.report(RuleflowError::Validation("no rule loaded".to_string())));
        };

        let ticket = self.generations.begin(OpKind::Execute);
        self.session.write().start(ticket);
        debug!("controller::execute({}) ticket {}", rule_id, ticket.seq);

        let result = self.api.execute_rule(rule_id).await;
        let current = self.generations.is_current(ticket);
        self.session.write().finish(ticket);

        if !current {
            return Err(self.superseded(ticket));
        }

        let output = result.map_err(|e| self.report(e))?;
        info!("executed rule {}", rule_id);
        self.notify(Notification::info(format!("Rule {} executed", rule_id)));
        Ok(output)
    }

    /// Delete a stored rule and refresh the catalog.
    ///
    /// Deleting the rule currently being edited leaves the editor pointing
    /// at it; saving again recreates it under its name.
    pub async fn delete(
        &self,
        rule_id: RuleId,
    ) -> Result<()> {
        debug!("controller::delete({})", rule_id);
        let result = self.api.delete_rule(rule_id).await;

        if matches!(result, Ok(()) | Err(RuleflowError::NotFound(_))) {
            self.catalog.write().remove(rule_id);
        }
        if let Err(err) = result {
            let err = self.report(err);
            let _ = self.refresh_catalog().await;
            return Err(err);
        }

        if self.current_rule_id() == Some(rule_id) {
            warn!("deleted rule {} is still open in the editor", rule_id);
        }
        info!("deleted rule {}", rule_id);
        self.notify(Notification::info(format!("Rule {} deleted", rule_id)));

        if let Err(err) = self.refresh_catalog().await {
            debug!("catalog refresh after delete failed: {}", err);
        }
        Ok(())
    }

    /// Re-list the rules stored on the backend.
    pub async fn refresh_catalog(&self) -> Result<()> {
        let ticket = self.generations.begin(OpKind::Refresh);
        let result = self.api.list_rules().await;
        if !self.generations.is_current(ticket) {
            return Err(self.superseded(ticket));
        }

        let rules = result.map_err(|e| self.report(e))?;
        self.catalog.write().replace_rules(rules);
        Ok(())
    }

    /// Re-list the functions nodes may invoke.
    pub async fn refresh_functions(&self) -> Result<()> {
        let ticket = self.generations.begin(OpKind::Functions);
        let result = self.api.list_functions().await;
        if !self.generations.is_current(ticket) {
            return Err(self.superseded(ticket));
        }

        let functions = result.map_err(|e| self.report(e))?;
        self.catalog.write().replace_functions(functions);
        Ok(())
    }

    fn notify(
        &self,
        notification: Notification,
    ) {
        if self.notifications.receiver_count() == 0 {
            trace!("no subscriber for notification: {}", notification.message);
            return;
        }
        let _ = self.notifications.send(notification);
    }

    /// Publish `err` to the user if it is user-facing, then hand it back.
    fn report(
        &self,
        err: RuleflowError,
    ) -> RuleflowError {
        if err.is_user_visible() {
            warn!("{}", err);
            self.notify(Notification::from(&err));
        }
        err
    }

    fn superseded(
        &self,
        ticket: Ticket,
    ) -> RuleflowError {
        warn!("discarding stale {} response (ticket {})", ticket.kind.as_ref(), ticket.seq);
        RuleflowError::Superseded(format!("a newer {} started", ticket.kind.as_ref()))
    }
}
