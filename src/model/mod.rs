mod edge;
mod node;
mod rule;

pub use edge::{EdgeId, PersistedEdge};
pub use node::{NodeId, Params, PersistedNode, Position};
pub use rule::{ExecutionResult, FunctionDescriptor, ParamDescriptor, PersistedGraph, Rule, RuleId, RuleSummary};
