//! Scenario Planner
//!
//! Selects which catalog entries a measured run executes. Selection never
//! reorders: the plan lists catalog indices in registration order.

use rulebench_core::ScenarioCatalog;

/// Execution plan over a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Indices into `ScenarioCatalog::all`, ascending
    pub indices: Vec<usize>,
}

impl ExecutionPlan {
    /// Number of scenarios selected
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Build the plan, keeping scenarios whose name matches `filter`
pub fn build_plan(catalog: &ScenarioCatalog, filter: Option<&regex::Regex>) -> ExecutionPlan {
    let indices = catalog
        .names()
        .enumerate()
        .filter(|(_, name)| filter.is_none_or(|re| re.is_match(name)))
        .map(|(index, _)| index)
        .collect();

    ExecutionPlan { indices }
}
