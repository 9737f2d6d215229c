//! Scenario Catalog
//!
//! An ordered registry of named, parameterless operations bound to one shared
//! subject. Registration order is the execution and report order.

use thiserror::Error;

/// Outcome of a single scenario invocation
pub type OperationResult = anyhow::Result<()>;

/// A zero-argument operation closing over the subject under test
pub type Operation = Box<dyn FnMut() -> OperationResult>;

type PrepareHook = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// Errors raised while building a catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Scenario names must not be blank
    #[error("scenario name must not be empty")]
    EmptyName,

    /// A scenario with this name is already registered
    #[error("scenario `{0}` is already registered")]
    DuplicateScenario(String),
}

/// A named operation in the catalog
pub struct ScenarioEntry {
    name: String,
    operation: Operation,
}

impl ScenarioEntry {
    /// Stable scenario name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the operation once
    #[inline]
    pub fn invoke(&mut self) -> OperationResult {
        (self.operation)()
    }
}

impl std::fmt::Debug for ScenarioEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of scenarios sharing one subject
#[derive(Default)]
pub struct ScenarioCatalog {
    entries: Vec<ScenarioEntry>,
    prepare: Option<PrepareHook>,
}

impl ScenarioCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the subject's one-time setup hook
    pub fn with_prepare<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        self.prepare = Some(Box::new(hook));
        self
    }

    /// Register a scenario under a unique, non-empty name
    pub fn register<F>(&mut self, name: impl Into<String>, operation: F) -> Result<(), CatalogError>
    where
        F: FnMut() -> OperationResult + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.entries.iter().any(|e| e.name == name) {
            return Err(CatalogError::DuplicateScenario(name));
        }

        self.entries.push(ScenarioEntry {
            name,
            operation: Box::new(operation),
        });
        Ok(())
    }

    /// Run the setup hook. The hook is consumed, so later calls do nothing.
    pub fn prepare_subject(&mut self) -> anyhow::Result<()> {
        match self.prepare.take() {
            Some(hook) => hook(),
            None => Ok(()),
        }
    }

    /// Whether the setup hook is still pending
    pub fn needs_prepare(&self) -> bool {
        self.prepare.is_some()
    }

    /// Entries in registration order
    pub fn all(&self) -> &[ScenarioEntry] {
        &self.entries
    }

    /// Mutable entries in registration order
    pub fn all_mut(&mut self) -> &mut [ScenarioEntry] {
        &mut self.entries
    }

    /// Scenario names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of registered scenarios
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no scenarios are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = ScenarioCatalog::new();
        catalog.register("invoke", || Ok(())).unwrap();

        let err = catalog.register("invoke", || Ok(())).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateScenario("invoke".to_string()));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut catalog = ScenarioCatalog::new();
        assert_eq!(
            catalog.register(" ", || Ok(())).unwrap_err(),
            CatalogError::EmptyName
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_order_is_registration_order() {
        let mut catalog = ScenarioCatalog::new();
        for name in ["zeta", "alpha", "mid"] {
            catalog.register(name, || Ok(())).unwrap();
        }

        let first: Vec<_> = catalog.names().collect();
        let second: Vec<_> = catalog.all().iter().map(|e| e.name()).collect();
        assert_eq!(first, vec!["zeta", "alpha", "mid"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_prepare_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut catalog = ScenarioCatalog::new().with_prepare(move || {
            counter.set(counter.get() + 1);
            Ok(())
        });

        assert!(catalog.needs_prepare());
        catalog.prepare_subject().unwrap();
        catalog.prepare_subject().unwrap();
        assert_eq!(calls.get(), 1);
        assert!(!catalog.needs_prepare());
    }

    #[test]
    fn test_invoke_reaches_operation() {
        let hits = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&hits);
        let mut catalog = ScenarioCatalog::new();
        catalog
            .register("get", move || {
                counter.set(counter.get() + 1);
                Ok(())
            })
            .unwrap();

        for entry in catalog.all_mut() {
            entry.invoke().unwrap();
            entry.invoke().unwrap();
        }
        assert_eq!(hits.get(), 2);
    }
}
