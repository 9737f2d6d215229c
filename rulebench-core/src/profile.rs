//! Rule Profile Contract
//!
//! The subject a benchmark run exercises. A profile exposes a one-time
//! `prepare` step and eight zero-argument operations; [`ScenarioCatalog::for_profile`]
//! binds them to the stable scenario names in [`SCENARIO_NAMES`].

use crate::catalog::{CatalogError, OperationResult, ScenarioCatalog};
use std::cell::RefCell;
use std::rc::Rc;

/// Scenario names, in catalog order.
///
/// Report consumers compare runs by these names; they must not change.
pub const SCENARIO_NAMES: [&str; 8] = [
    "invoke",
    "invoke-if",
    "invoke-type",
    "invoke-summary",
    "get",
    "bind-default",
    "bind-custom",
    "bind-nested",
];

/// Operations a rule engine exposes for benchmarking.
///
/// Every operation must be safe to call hundreds of times without
/// accumulating state.
pub trait RuleProfile {
    /// Load fixtures. Called once before any operation.
    fn prepare(&mut self) -> anyhow::Result<()>;

    /// Evaluate every rule against every target
    fn invoke(&mut self) -> OperationResult;

    /// Evaluate rules whose precondition holds
    fn invoke_if(&mut self) -> OperationResult;

    /// Evaluate rules scoped to the target's type
    fn invoke_type(&mut self) -> OperationResult;

    /// Evaluate and aggregate per-rule outcomes
    fn invoke_summary(&mut self) -> OperationResult;

    /// Retrieve rule metadata without evaluating
    fn get(&mut self) -> OperationResult;

    /// Resolve target names with the default binding
    fn bind_default(&mut self) -> OperationResult;

    /// Resolve target names with a custom field binding
    fn bind_custom(&mut self) -> OperationResult;

    /// Resolve target names from a nested field path
    fn bind_nested(&mut self) -> OperationResult;
}

impl ScenarioCatalog {
    /// Build the fixed eight-scenario catalog over a shared profile
    pub fn for_profile<P>(profile: Rc<RefCell<P>>) -> Result<Self, CatalogError>
    where
        P: RuleProfile + 'static,
    {
        let setup = Rc::clone(&profile);
        let mut catalog = ScenarioCatalog::new().with_prepare(move || setup.borrow_mut().prepare());

        let operations: [fn(&mut P) -> OperationResult; 8] = [
            P::invoke,
            P::invoke_if,
            P::invoke_type,
            P::invoke_summary,
            P::get,
            P::bind_default,
            P::bind_custom,
            P::bind_nested,
        ];

        for (name, operation) in SCENARIO_NAMES.iter().zip(operations) {
            let subject = Rc::clone(&profile);
            catalog.register(*name, move || operation(&mut subject.borrow_mut()))?;
        }

        Ok(catalog)
    }
}
