//! In-memory [`RuleApi`] for controller tests.
//!
//! Records every call, can fail the next call on demand, and can hold a
//! response back until the test releases it through a [`Notify`] gate.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;

use crate::{
    Result, RuleflowError,
    api::RuleApi,
    model::{ExecutionResult, FunctionDescriptor, PersistedEdge, PersistedGraph, PersistedNode, Rule, RuleId, RuleSummary},
};

/// Key of the gate holding back saves.
pub(crate) const SAVE_GATE: RuleId = 0;

#[derive(Default)]
pub(crate) struct FakeRuleApi {
    rules: Mutex<Vec<Rule>>,
    functions: Mutex<Vec<FunctionDescriptor>>,
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<RuleId, Arc<Notify>>>,
    fail_next: Mutex<Option<RuleflowError>>,
    fail_on: Mutex<HashMap<&'static str, RuleflowError>>,
    next_id: AtomicU64,
}

impl FakeRuleApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            ..Default::default()
        }
    }

    pub fn with_rule(
        self,
        id: RuleId,
        name: &str,
        graph: PersistedGraph,
    ) -> Self {
        self.rules.lock().push(Rule {
            id,
            name: name.to_string(),
            graph,
        });
        self
    }

    pub fn with_function(
        self,
        name: &str,
    ) -> Self {
        self.functions.lock().push(FunctionDescriptor {
            name: name.to_string(),
            inputs: vec![],
            outputs: vec![],
        });
        self
    }

    /// Hold responses for `key` (a rule id, or [`SAVE_GATE`]) until notified.
    pub fn gate(
        &self,
        key: RuleId,
    ) -> Arc<Notify> {
        self.gates.lock().entry(key).or_insert_with(|| Arc::new(Notify::new())).clone()
    }

    pub fn fail_next(
        &self,
        err: RuleflowError,
    ) {
        *self.fail_next.lock() = Some(err);
    }

    /// Fail the next call to `method` (e.g. `"list_rules"`) with `err`.
    pub fn fail_on(
        &self,
        method: &'static str,
        err: RuleflowError,
    ) {
        self.fail_on.lock().insert(method, err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn rule_names(&self) -> Vec<String> {
        self.rules.lock().iter().map(|r| r.name.clone()).collect()
    }

    pub fn stored_graph(
        &self,
        id: RuleId,
    ) -> Option<PersistedGraph> {
        self.rules.lock().iter().find(|r| r.id == id).map(|r| r.graph.clone())
    }

    async fn enter(
        &self,
        call: String,
        gate: Option<RuleId>,
    ) -> Result<()> {
        let method = call.split('(').next().unwrap_or_default().to_string();
        self.calls.lock().push(call);
        let gate = gate.and_then(|key| self.gates.lock().get(&key).cloned());
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(err) = self.fail_next.lock().take() {
            return Err(err);
        }
        match self.fail_on.lock().remove(method.as_str()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RuleApi for FakeRuleApi {
    async fn list_functions(&self) -> Result<Vec<FunctionDescriptor>> {
        self.enter("list_functions".to_string(), None).await?;
        Ok(self.functions.lock().clone())
    }

    async fn list_rules(&self) -> Result<Vec<RuleSummary>> {
        self.enter("list_rules".to_string(), None).await?;
        Ok(self
            .rules
            .lock()
            .iter()
            .map(|r| RuleSummary {
                id: r.id,
                name: r.name.clone(),
            })
            .collect())
    }

    async fn fetch_rule_graph(
        &self,
        rule_id: RuleId,
    ) -> Result<Rule> {
        self.enter(format!("fetch_rule_graph({})", rule_id), Some(rule_id)).await?;
        self.rules.lock().iter().find(|r| r.id == rule_id).cloned().ok_or_else(|| RuleflowError::NotFound(format!("rule {} does not exist", rule_id)))
    }

    async fn save_rule(
        &self,
        name: &str,
        nodes: &[PersistedNode],
        edges: &[PersistedEdge],
    ) -> Result<RuleSummary> {
        self.enter(format!("save_rule({})", name), Some(SAVE_GATE)).await?;
        let graph = PersistedGraph {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
        };

        let mut rules = self.rules.lock();
        let id = match rules.iter_mut().find(|r| r.name == name) {
            Some(rule) => {
                rule.graph = graph;
                rule.id
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                rules.push(Rule {
                    id,
                    name: name.to_string(),
                    graph,
                });
                id
            }
        };
        Ok(RuleSummary {
            id,
            name: name.to_string(),
        })
    }

    async fn delete_rule(
        &self,
        rule_id: RuleId,
    ) -> Result<()> {
        self.enter(format!("delete_rule({})", rule_id), None).await?;
        let mut rules = self.rules.lock();
        let before = rules.len();
        rules.retain(|r| r.id != rule_id);
        if rules.len() == before {
            return Err(RuleflowError::NotFound(format!("rule {} does not exist", rule_id)));
        }
        Ok(())
    }

    async fn execute_rule(
        &self,
        rule_id: RuleId,
    ) -> Result<ExecutionResult> {
        self.enter(format!("execute_rule({})", rule_id), Some(rule_id)).await?;
        if !self.rules.lock().iter().any(|r| r.id == rule_id) {
            return Err(RuleflowError::NotFound(format!("rule {} does not exist", rule_id)));
        }
        Ok(json!({"rule_id": rule_id, "status": "success"}))
    }
}
