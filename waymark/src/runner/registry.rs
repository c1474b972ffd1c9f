//! Runner registry abstraction.
//!
//! The registry enumerates available runners. The plugin-loading mechanism
//! behind it is external to this crate; [`StaticRunnerRegistry`] is a
//! concrete in-memory implementation for embedders and tests.

use super::types::WorkKind;
use super::Runner;
use std::sync::Arc;

/// Enumerates the runners available for a given work kind.
pub trait RunnerRegistry: Send + Sync + 'static {
    /// Returns all registered runners whose descriptor advertises `kind`.
    fn runners_for(&self, kind: WorkKind) -> Vec<Arc<dyn Runner>>;
}

/// A fixed, in-memory runner registry.
#[derive(Default)]
pub struct StaticRunnerRegistry {
    runners: Vec<Arc<dyn Runner>>,
}

impl StaticRunnerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a runner to the registry.
    pub fn register(&mut self, runner: Arc<dyn Runner>) {
        self.runners.push(runner);
    }

    /// Builder-style registration.
    pub fn with_runner(mut self, runner: Arc<dyn Runner>) -> Self {
        self.register(runner);
        self
    }

    /// Total number of registered runners.
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// Returns true when no runners are registered.
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}

impl RunnerRegistry for StaticRunnerRegistry {
    fn runners_for(&self, kind: WorkKind) -> Vec<Arc<dyn Runner>> {
        self.runners
            .iter()
            .filter(|r| r.descriptor().supports(kind))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunnerDescriptor;

    struct StubRunner {
        descriptor: RunnerDescriptor,
    }

    impl Runner for StubRunner {
        fn descriptor(&self) -> &RunnerDescriptor {
            &self.descriptor
        }
    }

    fn stub(name: &str, kind: WorkKind) -> Arc<dyn Runner> {
        Arc::new(StubRunner {
            descriptor: RunnerDescriptor::new(name).with_capability(kind),
        })
    }

    #[test]
    fn test_empty_registry() {
        let registry = StaticRunnerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.runners_for(WorkKind::Search).is_empty());
    }

    #[test]
    fn test_registry_filters_by_kind() {
        let registry = StaticRunnerRegistry::new()
            .with_runner(stub("searcher", WorkKind::Search))
            .with_runner(stub("router", WorkKind::Routing));

        assert_eq!(registry.len(), 2);
        let searchers = registry.runners_for(WorkKind::Search);
        assert_eq!(searchers.len(), 1);
        assert_eq!(searchers[0].descriptor().name(), "searcher");
        assert!(registry.runners_for(WorkKind::Parsing).is_empty());
    }
}
