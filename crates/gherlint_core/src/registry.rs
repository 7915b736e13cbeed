//! Static checker registry.
//!
//! The set of checkers of a run is fixed up front: built-in factories are
//! listed here, additional ones can be registered before the checkers are
//! built. Building a checker binds its options and registers its messages,
//! so a bad configuration or a message collision aborts before any file
//! is touched.

use tracing::debug;

use crate::checkers::{
    Checker, CompletenessChecker, ComplexityChecker, ConsistencyChecker, ConventionChecker,
};
use crate::config::LinterConfig;
use crate::error::LinterError;
use crate::messages::MessageStore;

/// Constructs one checker from the run configuration.
pub type CheckerFactory = fn(&LinterConfig) -> Result<Box<dyn Checker>, LinterError>;

#[derive(Default)]
pub struct CheckerRegistry {
    factories: Vec<CheckerFactory>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in checker.
    pub fn with_builtin_checkers() -> Self {
        let mut registry = Self::new();
        registry.register(|config| Ok(Box::new(CompletenessChecker::new(config)?)));
        registry.register(|config| Ok(Box::new(ConsistencyChecker::new(config)?)));
        registry.register(|config| Ok(Box::new(ComplexityChecker::new(config)?)));
        registry.register(|config| Ok(Box::new(ConventionChecker::new(config)?)));
        registry
    }

    pub fn register(&mut self, factory: CheckerFactory) {
        self.factories.push(factory);
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds every registered checker in registration order and records
    /// their messages in `store`.
    pub fn build(
        &self,
        config: &LinterConfig,
        store: &mut MessageStore,
    ) -> Result<Vec<Box<dyn Checker>>, LinterError> {
        let mut checkers = Vec::with_capacity(self.factories.len());
        for factory in &self.factories {
            let checker = factory(config)?;
            store.register_all(checker.messages())?;
            debug!(checker = checker.name(), "registered checker");
            checkers.push(checker);
        }
        Ok(checkers)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_builtin_checkers_build_in_fixed_order() {
        let registry = CheckerRegistry::with_builtin_checkers();
        let mut store = MessageStore::new();
        let checkers = registry
            .build(&LinterConfig::default(), &mut store)
            .unwrap();
        let names: Vec<&str> = checkers.iter().map(|checker| checker.name()).collect();
        assert_eq!(
            names,
            vec!["completeness", "consistency", "complexity", "convention"]
        );
    }

    #[test]
    fn test_builtin_messages_are_registered_without_collisions() {
        let registry = CheckerRegistry::with_builtin_checkers();
        let mut store = MessageStore::new();
        registry
            .build(&LinterConfig::default(), &mut store)
            .unwrap();
        assert_eq!(store.resolve("missing-feature-name").unwrap().id, "W101");
        assert_eq!(store.resolve("R201").unwrap().name, "outline-could-be-a-scenario");
    }

    #[test]
    fn test_duplicate_registration_across_runs_needs_a_fresh_store() {
        let registry = CheckerRegistry::with_builtin_checkers();
        let mut store = MessageStore::new();
        registry
            .build(&LinterConfig::default(), &mut store)
            .unwrap();
        let error = registry
            .build(&LinterConfig::default(), &mut store)
            .err()
            .unwrap();
        assert!(matches!(error, LinterError::DuplicateMessage(_)));
    }

    #[test]
    fn test_custom_factory_extends_the_builtin_set() {
        struct NopChecker;
        impl Checker for NopChecker {
            fn name(&self) -> &'static str {
                "nop"
            }
        }
        let mut registry = CheckerRegistry::with_builtin_checkers();
        registry.register(|_| Ok(Box::new(NopChecker)));
        assert_eq!(registry.len(), 5);
        let mut store = MessageStore::new();
        let checkers = registry
            .build(&LinterConfig::default(), &mut store)
            .unwrap();
        assert_eq!(checkers.last().unwrap().name(), "nop");
    }
}
