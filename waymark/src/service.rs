//! The runner service facade.
//!
//! Bundles the four per-kind managers behind one handle sharing a single
//! worker pool and runner registry. Applications construct one
//! [`RunnerService`] at startup and route all requests through it.
//!
//! # Example
//!
//! ```ignore
//! use waymark::config::OrchestratorSettings;
//! use waymark::model::SearchQuery;
//! use waymark::runner::StaticRunnerRegistry;
//! use waymark::service::RunnerService;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(
//!     StaticRunnerRegistry::new()
//!         .with_runner(local_db_runner)
//!         .with_runner(nominatim_runner),
//! );
//! let service = RunnerService::new(registry, &OrchestratorSettings::default());
//!
//! let placemarks = service.search(SearchQuery::new("alexanderplatz"), None).await;
//! ```

use crate::config::OrchestratorSettings;
use crate::coord::GeoPoint;
use crate::model::{ParseQuery, Placemark, RouteDocument, RouteQuery, SearchQuery};
use crate::orchestrator::{
    ParsingManager, ReverseGeocodingManager, RoutingManager, SearchManager,
};
use crate::aggregate::ParseReport;
use crate::pool::{PoolConfig, WorkerPool};
use crate::runner::{RunContext, RunnerRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One handle over all four work kinds.
///
/// The managers share one bounded worker pool, so total backend
/// concurrency stays capped regardless of how many kinds are active at
/// once.
pub struct RunnerService {
    pool: Arc<WorkerPool>,
    search: SearchManager,
    reverse_geocoding: ReverseGeocodingManager,
    routing: RoutingManager,
    parsing: ParsingManager,
    default_timeout: Duration,
}

impl RunnerService {
    /// Creates a service over the given registry.
    pub fn new(registry: Arc<dyn RunnerRegistry>, settings: &OrchestratorSettings) -> Self {
        let pool = Arc::new(WorkerPool::new(PoolConfig::from(&settings.pool)));
        info!(slots = pool.slots(), "runner service starting");
        Self {
            search: SearchManager::new(
                Arc::clone(&pool),
                Arc::clone(&registry),
                &settings.search,
            ),
            reverse_geocoding: ReverseGeocodingManager::new(
                Arc::clone(&pool),
                Arc::clone(&registry),
            ),
            routing: RoutingManager::new(
                Arc::clone(&pool),
                Arc::clone(&registry),
                &settings.routing,
            ),
            parsing: ParsingManager::new(Arc::clone(&pool), Arc::clone(&registry)),
            pool,
            default_timeout: settings.wait.default_timeout(),
        }
    }

    /// Creates a service with default settings.
    pub fn with_defaults(registry: Arc<dyn RunnerRegistry>) -> Self {
        Self::new(registry, &OrchestratorSettings::default())
    }

    /// Searches for placemarks, waiting for completion or the timeout
    /// (default from settings). Partial results are returned on timeout.
    pub async fn search(&self, query: SearchQuery, timeout: Option<Duration>) -> Vec<Placemark> {
        self.search
            .search(query, Some(timeout.unwrap_or(self.default_timeout)))
            .await
    }

    /// Resolves a coordinate to an address, waiting for completion or the
    /// timeout. `None` when nothing resolved in time.
    pub async fn reverse_geocode(
        &self,
        position: GeoPoint,
        timeout: Option<Duration>,
    ) -> Option<String> {
        self.reverse_geocoding
            .resolve(position, Some(timeout.unwrap_or(self.default_timeout)))
            .await
    }

    /// Calculates route alternatives, waiting for completion or the
    /// timeout. The first entry is the preferred default alternative.
    pub async fn route(&self, query: RouteQuery, timeout: Option<Duration>) -> Vec<RouteDocument> {
        self.routing
            .route(query, Some(timeout.unwrap_or(self.default_timeout)))
            .await
    }

    /// Parses a geodata file, waiting for completion or the timeout.
    pub async fn parse(&self, query: ParseQuery, timeout: Option<Duration>) -> ParseReport {
        self.parsing
            .parse(query, Some(timeout.unwrap_or(self.default_timeout)))
            .await
    }

    /// Replaces the run context on all managers.
    ///
    /// Applies to subsequently submitted requests.
    pub fn set_context(&self, context: RunContext) {
        info!(
            offline = context.offline,
            celestial_body = %context.celestial_body,
            "run context changed"
        );
        self.search.set_context(context.clone());
        self.reverse_geocoding.set_context(context.clone());
        self.routing.set_context(context.clone());
        self.parsing.set_context(context);
    }

    /// The search manager, for event subscription and non-blocking use.
    pub fn search_manager(&self) -> &SearchManager {
        &self.search
    }

    /// The reverse geocoding manager.
    pub fn reverse_geocoding_manager(&self) -> &ReverseGeocodingManager {
        &self.reverse_geocoding
    }

    /// The routing manager.
    pub fn routing_manager(&self) -> &RoutingManager {
        &self.routing
    }

    /// The parsing manager.
    pub fn parsing_manager(&self) -> &ParsingManager {
        &self.parsing
    }

    /// The shared worker pool, for introspection.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}
