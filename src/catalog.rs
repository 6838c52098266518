//! Locally cached view of the rules and functions the backend knows about.

use tracing::trace;

use crate::{
    model::{FunctionDescriptor, RuleId, RuleSummary},
    utils,
};

/// Rules and functions last fetched from the rule-engine service.
///
/// Order is the order the backend listed them in.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<RuleSummary>,
    functions: Vec<FunctionDescriptor>,
    /// Timestamp in milliseconds of the last full rule refresh.
    refreshed_at: Option<i64>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[RuleSummary] {
        &self.rules
    }

    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    pub fn refreshed_at(&self) -> Option<i64> {
        self.refreshed_at
    }

    pub fn get(
        &self,
        id: RuleId,
    ) -> Option<&RuleSummary> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn contains(
        &self,
        id: RuleId,
    ) -> bool {
        self.get(id).is_some()
    }

    pub fn find_by_name(
        &self,
        name: &str,
    ) -> Option<&RuleSummary> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn function(
        &self,
        name: &str,
    ) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Replace the rule list with a fresh listing.
    pub fn replace_rules(
        &mut self,
        rules: Vec<RuleSummary>,
    ) {
        trace!("catalog::replace_rules({})", rules.len());
        self.rules = rules;
        self.refreshed_at = Some(utils::time::time_millis());
    }

    /// Record a rule the editor just saved, ahead of the next refresh.
    pub fn upsert(
        &mut self,
        rule: RuleSummary,
    ) {
        match self.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(slot) => *slot = rule,
            None => self.rules.push(rule),
        }
    }

    /// Forget a rule. Returns false when it was not listed.
    pub fn remove(
        &mut self,
        id: RuleId,
    ) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        self.rules.len() != before
    }

    pub fn replace_functions(
        &mut self,
        functions: Vec<FunctionDescriptor>,
    ) {
        trace!("catalog::replace_functions({})", functions.len());
        self.functions = functions;
    }
}
