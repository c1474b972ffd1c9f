//! Capability filtering.
//!
//! Pure eligibility logic: given a work kind and the current run context,
//! select the subset of registered runners that may receive a task. An
//! empty result is not an error — managers treat it as "zero tasks,
//! immediate completion".

use super::registry::RunnerRegistry;
use super::types::WorkKind;
use super::Runner;
use std::collections::HashSet;
use std::sync::Arc;

/// The active transport profile for routing requests.
#[derive(Debug, Clone, Default)]
pub struct RoutingProfile {
    /// Profile name (e.g. "car", "bicycle", "pedestrian").
    pub name: String,
    /// Runner names this profile is restricted to.
    ///
    /// `None` means the profile accepts every routing-capable runner.
    pub allowed_runners: Option<HashSet<String>>,
}

impl RoutingProfile {
    /// Creates an unrestricted profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allowed_runners: None,
        }
    }

    /// Restricts the profile to the given runner names.
    pub fn restrict_to<I, S>(mut self, runners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_runners = Some(runners.into_iter().map(Into::into).collect());
        self
    }

    /// Checks whether a runner is accepted by this profile.
    pub fn accepts(&self, runner_name: &str) -> bool {
        match &self.allowed_runners {
            Some(allowed) => allowed.contains(runner_name),
            None => true,
        }
    }
}

/// The current mode the application runs in.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Whether the application is in offline mode.
    pub offline: bool,
    /// Identifier of the active celestial body (e.g. "earth", "moon").
    pub celestial_body: String,
    /// The active transport profile, consulted for routing requests only.
    pub routing_profile: Option<RoutingProfile>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            offline: false,
            celestial_body: "earth".to_string(),
            routing_profile: None,
        }
    }
}

/// Returns the runners eligible to serve a request of the given kind.
///
/// A runner is eligible iff:
/// - its descriptor advertises `kind`,
/// - it is offline capable when the context is offline,
/// - its liveness check [`Runner::can_work`] passes,
/// - it supports the active celestial body,
/// - for routing, the active profile does not restrict to other runners.
///
/// This function has no side effects; an empty result means zero tasks.
pub fn eligible_runners(
    kind: WorkKind,
    ctx: &RunContext,
    registry: &dyn RunnerRegistry,
) -> Vec<Arc<dyn Runner>> {
    registry
        .runners_for(kind)
        .into_iter()
        .filter(|runner| {
            let descriptor = runner.descriptor();
            if !descriptor.supports(kind) {
                return false;
            }
            if ctx.offline && !descriptor.is_offline_capable() {
                return false;
            }
            if !runner.can_work() {
                return false;
            }
            if !descriptor.supports_celestial_body(&ctx.celestial_body) {
                return false;
            }
            if kind == WorkKind::Routing {
                if let Some(profile) = &ctx.routing_profile {
                    if !profile.accepts(descriptor.name()) {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RunnerDescriptor, StaticRunnerRegistry};

    struct StubRunner {
        descriptor: RunnerDescriptor,
        alive: bool,
    }

    impl Runner for StubRunner {
        fn descriptor(&self) -> &RunnerDescriptor {
            &self.descriptor
        }

        fn can_work(&self) -> bool {
            self.alive
        }
    }

    fn runner(descriptor: RunnerDescriptor) -> Arc<dyn Runner> {
        Arc::new(StubRunner {
            descriptor,
            alive: true,
        })
    }

    fn dead_runner(descriptor: RunnerDescriptor) -> Arc<dyn Runner> {
        Arc::new(StubRunner {
            descriptor,
            alive: false,
        })
    }

    fn search_descriptor(name: &str) -> RunnerDescriptor {
        RunnerDescriptor::new(name).with_capability(WorkKind::Search)
    }

    #[test]
    fn test_offline_mode_excludes_online_only_runners() {
        // Three search runners, one of them offline-incapable.
        let registry = StaticRunnerRegistry::new()
            .with_runner(runner(search_descriptor("local-a").offline_capable(true)))
            .with_runner(runner(search_descriptor("local-b").offline_capable(true)))
            .with_runner(runner(search_descriptor("online-only")));

        let ctx = RunContext {
            offline: true,
            ..Default::default()
        };
        let eligible = eligible_runners(WorkKind::Search, &ctx, &registry);
        assert_eq!(eligible.len(), 2);
        assert!(eligible
            .iter()
            .all(|r| r.descriptor().name() != "online-only"));
    }

    #[test]
    fn test_dead_runner_is_excluded() {
        let registry = StaticRunnerRegistry::new()
            .with_runner(runner(search_descriptor("alive")))
            .with_runner(dead_runner(search_descriptor("dead")));

        let eligible = eligible_runners(WorkKind::Search, &RunContext::default(), &registry);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].descriptor().name(), "alive");
    }

    #[test]
    fn test_celestial_body_restriction() {
        let registry = StaticRunnerRegistry::new()
            .with_runner(runner(
                search_descriptor("earth-only").with_celestial_bodies(["earth"]),
            ))
            .with_runner(runner(search_descriptor("universal")));

        let ctx = RunContext {
            celestial_body: "moon".to_string(),
            ..Default::default()
        };
        let eligible = eligible_runners(WorkKind::Search, &ctx, &registry);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].descriptor().name(), "universal");
    }

    #[test]
    fn test_profile_restriction_applies_to_routing_only() {
        let routing = RunnerDescriptor::new("osrm")
            .with_capability(WorkKind::Routing)
            .with_capability(WorkKind::Search);
        let registry = StaticRunnerRegistry::new().with_runner(runner(routing));

        let ctx = RunContext {
            routing_profile: Some(RoutingProfile::new("car").restrict_to(["graphhopper"])),
            ..Default::default()
        };

        // Profile restriction excludes the runner for routing...
        assert!(eligible_runners(WorkKind::Routing, &ctx, &registry).is_empty());
        // ...but not for search.
        assert_eq!(eligible_runners(WorkKind::Search, &ctx, &registry).len(), 1);
    }

    #[test]
    fn test_unrestricted_profile_accepts_all() {
        let registry = StaticRunnerRegistry::new().with_runner(runner(
            RunnerDescriptor::new("osrm").with_capability(WorkKind::Routing),
        ));
        let ctx = RunContext {
            routing_profile: Some(RoutingProfile::new("car")),
            ..Default::default()
        };
        assert_eq!(eligible_runners(WorkKind::Routing, &ctx, &registry).len(), 1);
    }

    #[test]
    fn test_no_eligible_runners_is_empty_not_error() {
        let registry = StaticRunnerRegistry::new();
        let eligible = eligible_runners(WorkKind::Parsing, &RunContext::default(), &registry);
        assert!(eligible.is_empty());
    }
}
