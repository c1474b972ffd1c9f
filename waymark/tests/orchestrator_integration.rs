//! Integration tests for the orchestration managers and the service facade.
//!
//! Stub runners with controllable delays and outcomes exercise the full
//! path: capability filtering, pool-bounded task dispatch, aggregation,
//! supersession and event delivery.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use waymark::config::OrchestratorSettings;
use waymark::coord::GeoPoint;
use waymark::model::{DocumentRole, ParseQuery, ParsedDocument, Placemark, SearchQuery};
use waymark::orchestrator::{ChannelEventSink, EventSink, NullEventSink, RunEvent};
use waymark::runner::{
    RunContext, Runner, RunnerDescriptor, RunnerError, StaticRunnerRegistry, WorkKind,
};
use waymark::service::RunnerService;

// =============================================================================
// Stub runners
// =============================================================================

struct SearchStub {
    descriptor: RunnerDescriptor,
    delay: Duration,
    outcome: Result<Vec<Placemark>, RunnerError>,
    calls: Arc<AtomicUsize>,
}

impl SearchStub {
    fn new(name: &str, delay_ms: u64, batch: Vec<Placemark>) -> Self {
        Self {
            descriptor: RunnerDescriptor::new(name)
                .with_capability(WorkKind::Search)
                .offline_capable(true),
            delay: Duration::from_millis(delay_ms),
            outcome: Ok(batch),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn online_only(mut self) -> Self {
        let name = self.descriptor.name().to_string();
        self.descriptor = RunnerDescriptor::new(name)
            .with_capability(WorkKind::Search)
            .offline_capable(false);
        self
    }

    fn failing(name: &str, delay_ms: u64) -> Self {
        Self {
            descriptor: RunnerDescriptor::new(name)
                .with_capability(WorkKind::Search)
                .offline_capable(true),
            delay: Duration::from_millis(delay_ms),
            outcome: Err(RunnerError::Backend("backend unreachable".to_string())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Runner for SearchStub {
    fn descriptor(&self) -> &RunnerDescriptor {
        &self.descriptor
    }

    fn search<'a>(
        &'a self,
        _query: &'a SearchQuery,
    ) -> BoxFuture<'a, Result<Vec<Placemark>, RunnerError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            sleep(self.delay).await;
            self.outcome.clone()
        })
    }
}

struct ReverseStub {
    descriptor: RunnerDescriptor,
    delay: Duration,
    address: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl ReverseStub {
    fn new(name: &str, delay_ms: u64, address: Option<&str>) -> Self {
        Self {
            descriptor: RunnerDescriptor::new(name)
                .with_capability(WorkKind::ReverseGeocoding)
                .offline_capable(true),
            delay: Duration::from_millis(delay_ms),
            address: address.map(str::to_string),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Runner for ReverseStub {
    fn descriptor(&self) -> &RunnerDescriptor {
        &self.descriptor
    }

    fn reverse_geocode<'a>(
        &'a self,
        _position: &'a GeoPoint,
    ) -> BoxFuture<'a, Result<Option<String>, RunnerError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            sleep(self.delay).await;
            Ok(self.address.clone())
        })
    }
}

struct ParseStub {
    descriptor: RunnerDescriptor,
    outcome: Result<ParsedDocument, RunnerError>,
}

impl ParseStub {
    fn ok(name: &str, document_name: &str) -> Self {
        Self {
            descriptor: RunnerDescriptor::new(name)
                .with_capability(WorkKind::Parsing)
                .offline_capable(true),
            outcome: Ok(ParsedDocument::new(document_name, vec![])),
        }
    }

    fn failing(name: &str, message: &str) -> Self {
        Self {
            descriptor: RunnerDescriptor::new(name)
                .with_capability(WorkKind::Parsing)
                .offline_capable(true),
            outcome: Err(RunnerError::Backend(message.to_string())),
        }
    }
}

impl Runner for ParseStub {
    fn descriptor(&self) -> &RunnerDescriptor {
        &self.descriptor
    }

    fn parse<'a>(
        &'a self,
        _query: &'a ParseQuery,
    ) -> BoxFuture<'a, Result<ParsedDocument, RunnerError>> {
        Box::pin(async move { self.outcome.clone() })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn placemark(name: &str, lat: f64, lon: f64) -> Placemark {
    Placemark::new(name, GeoPoint::from_degrees(lat, lon))
}

fn service_with(runners: Vec<Arc<dyn Runner>>) -> RunnerService {
    let mut registry = StaticRunnerRegistry::new();
    for runner in runners {
        registry.register(runner);
    }
    RunnerService::new(Arc::new(registry), &OrchestratorSettings::default())
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_no_eligible_runners_finishes_immediately() {
    let service = service_with(vec![]);
    let started = Instant::now();

    let placemarks = service.search(SearchQuery::new("cafe"), None).await;

    assert!(placemarks.is_empty());
    // Must not wait for the 30 second default timeout.
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_results_from_all_runners_are_merged() {
    let service = service_with(vec![
        Arc::new(SearchStub::new(
            "fast",
            5,
            vec![placemark("A", 0.0, 0.0)],
        )),
        Arc::new(SearchStub::new(
            "slow",
            30,
            vec![placemark("B", 10.0, 10.0)],
        )),
    ]);

    let placemarks = service.search(SearchQuery::new("cafe"), None).await;

    let mut names: Vec<&str> = placemarks.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn test_offline_mode_skips_online_only_runner() {
    let online = SearchStub::new("online-only", 5, vec![placemark("O", 1.0, 1.0)]).online_only();
    let online_calls = online.call_counter();
    let local_a = SearchStub::new("local-a", 5, vec![placemark("A", 0.0, 0.0)]);
    let local_a_calls = local_a.call_counter();
    let local_b = SearchStub::new("local-b", 5, vec![placemark("B", 10.0, 10.0)]);

    let service = service_with(vec![Arc::new(online), Arc::new(local_a), Arc::new(local_b)]);
    service.set_context(RunContext {
        offline: true,
        ..Default::default()
    });

    let placemarks = service.search(SearchQuery::new("cafe"), None).await;

    assert_eq!(placemarks.len(), 2);
    assert_eq!(online_calls.load(Ordering::SeqCst), 0);
    assert_eq!(local_a_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cross_runner_duplicates_dropped() {
    // Both runners report the same place, metres apart.
    let service = service_with(vec![
        Arc::new(SearchStub::new(
            "first",
            5,
            vec![placemark("Cafe Central", 48.210, 16.366)],
        )),
        Arc::new(SearchStub::new(
            "second",
            20,
            vec![placemark("Cafe Central (dup)", 48.2100000001, 16.366)],
        )),
    ]);

    let placemarks = service.search(SearchQuery::new("cafe central"), None).await;

    assert_eq!(placemarks.len(), 1);
    assert_eq!(placemarks[0].name, "Cafe Central");
}

#[tokio::test]
async fn test_identical_resubmission_dispatches_no_tasks() {
    let stub = SearchStub::new("only", 5, vec![placemark("A", 0.0, 0.0)]);
    let calls = stub.call_counter();
    let service = service_with(vec![Arc::new(stub)]);

    let first = service.search(SearchQuery::new("cafe"), None).await;
    let second = service.search(SearchQuery::new("cafe"), None).await;

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A different term dispatches again.
    service.search(SearchQuery::new("museum"), None).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_runner_failure_does_not_abort_siblings() {
    let service = service_with(vec![
        Arc::new(SearchStub::failing("broken", 5)),
        Arc::new(SearchStub::new("ok", 20, vec![placemark("A", 0.0, 0.0)])),
    ]);

    let placemarks = service.search(SearchQuery::new("cafe"), None).await;

    assert_eq!(placemarks.len(), 1);
    assert_eq!(placemarks[0].name, "A");
}

#[tokio::test]
async fn test_supersession_drops_stale_outcomes() {
    let slow = SearchStub::new("slow", 150, vec![placemark("STALE", 50.0, 50.0)]);
    let service = service_with(vec![Arc::new(slow)]);
    let manager = service.search_manager();

    // First query; its task is still sleeping when the second arrives.
    manager.submit(SearchQuery::new("old"));
    sleep(Duration::from_millis(20)).await;
    let generation = manager.submit(SearchQuery::new("new"));

    let placemarks = manager
        .wait_finished(generation, Duration::from_secs(5))
        .await;
    assert_eq!(placemarks.len(), 1);

    // Give the superseded task time to (not) report.
    sleep(Duration::from_millis(250)).await;
    assert_eq!(manager.placemarks().len(), 1);
}

#[tokio::test]
async fn test_event_sequence_results_changed_then_finished() {
    let service = service_with(vec![Arc::new(SearchStub::new(
        "only",
        5,
        vec![placemark("A", 0.0, 0.0)],
    ))]);
    let (sink, mut rx) = ChannelEventSink::<Vec<Placemark>>::pair();
    service.search_manager().add_sink(sink);

    service.search(SearchQuery::new("cafe"), None).await;

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], RunEvent::ResultsChanged(p) if p.len() == 1));
    assert!(matches!(&events[1], RunEvent::Finished(p) if p.len() == 1));
}

/// A sink that takes its time on every delivery and records whether two
/// deliveries ever ran at once.
struct SlowSink {
    delay: Duration,
    active: AtomicUsize,
    overlapped: AtomicBool,
    events: Mutex<Vec<RunEvent<Vec<Placemark>>>>,
}

impl SlowSink {
    fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            active: AtomicUsize::new(0),
            overlapped: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
        }
    }
}

impl EventSink<Vec<Placemark>> for SlowSink {
    fn on_event(&self, event: RunEvent<Vec<Placemark>>) {
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        std::thread::sleep(self.delay);
        self.events.lock().unwrap().push(event);
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_deliveries_are_serialized_in_state_change_order() {
    // The second runner completes while the sink is still busy with the
    // first partial result; its events must queue behind it, never pass it.
    let service = service_with(vec![
        Arc::new(SearchStub::new("fast", 5, vec![placemark("A", 0.0, 0.0)])),
        Arc::new(SearchStub::new(
            "slow",
            40,
            vec![placemark("B", 10.0, 10.0)],
        )),
    ]);
    let sink = Arc::new(SlowSink::new(120));
    service.search_manager().add_sink(Arc::clone(&sink) as Arc<dyn EventSink<Vec<Placemark>>>);

    service.search(SearchQuery::new("cafe"), None).await;
    // The wait resolves before delivery drains; give the drainer time.
    sleep(Duration::from_millis(600)).await;

    assert!(!sink.overlapped.load(Ordering::SeqCst));
    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], RunEvent::ResultsChanged(p) if p.len() == 1));
    assert!(matches!(&events[1], RunEvent::ResultsChanged(p) if p.len() == 2));
    assert!(matches!(&events[2], RunEvent::Finished(p) if p.len() == 2));
}

/// A sink that registers another sink from inside its callback.
struct ReentrantSink {
    service: Arc<RunnerService>,
    registered: AtomicBool,
    returned: AtomicBool,
}

impl EventSink<Vec<Placemark>> for ReentrantSink {
    fn on_event(&self, _event: RunEvent<Vec<Placemark>>) {
        if !self.registered.swap(true, Ordering::SeqCst) {
            self.service
                .search_manager()
                .add_sink(Arc::new(NullEventSink));
            self.returned.store(true, Ordering::SeqCst);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sink_may_register_sinks_from_callback() {
    let service = Arc::new(service_with(vec![Arc::new(SearchStub::new(
        "only",
        5,
        vec![placemark("A", 0.0, 0.0)],
    ))]));
    let sink = Arc::new(ReentrantSink {
        service: Arc::clone(&service),
        registered: AtomicBool::new(false),
        returned: AtomicBool::new(false),
    });
    service
        .search_manager()
        .add_sink(Arc::clone(&sink) as Arc<dyn EventSink<Vec<Placemark>>>);

    service.search(SearchQuery::new("cafe"), None).await;
    sleep(Duration::from_millis(200)).await;

    assert!(sink.registered.load(Ordering::SeqCst));
    assert!(
        sink.returned.load(Ordering::SeqCst),
        "registration from inside the callback must not block"
    );
}

#[tokio::test]
async fn test_wait_timeout_returns_partial_result() {
    let service = service_with(vec![
        Arc::new(SearchStub::new("fast", 5, vec![placemark("A", 0.0, 0.0)])),
        Arc::new(SearchStub::new(
            "very-slow",
            2_000,
            vec![placemark("B", 10.0, 10.0)],
        )),
    ]);

    let started = Instant::now();
    let placemarks = service
        .search(SearchQuery::new("cafe"), Some(Duration::from_millis(100)))
        .await;

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(placemarks.len(), 1);
    assert_eq!(placemarks[0].name, "A");
}

// =============================================================================
// Reverse geocoding
// =============================================================================

#[tokio::test]
async fn test_first_non_empty_address_wins() {
    let service = service_with(vec![
        Arc::new(ReverseStub::new("empty-fast", 5, None)),
        Arc::new(ReverseStub::new("answer", 20, Some("Unter den Linden 1"))),
    ]);

    let address = service
        .reverse_geocode(GeoPoint::from_degrees(52.5, 13.4), None)
        .await;
    assert_eq!(address.as_deref(), Some("Unter den Linden 1"));
}

#[tokio::test]
async fn test_resolved_coordinate_is_memoized() {
    let stub = ReverseStub::new("only", 5, Some("Somewhere 1"));
    let calls = stub.call_counter();
    let service = service_with(vec![Arc::new(stub)]);
    let position = GeoPoint::from_degrees(52.5, 13.4);

    let first = service.reverse_geocode(position, None).await;
    let second = service.reverse_geocode(position, None).await;

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_short_timeout_yields_none_quickly() {
    let service = service_with(vec![Arc::new(ReverseStub::new(
        "slow",
        1_000,
        Some("too late"),
    ))]);

    let started = Instant::now();
    let address = service
        .reverse_geocode(
            GeoPoint::from_degrees(0.0, 0.0),
            Some(Duration::from_millis(10)),
        )
        .await;

    assert!(address.is_none());
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_unresolvable_coordinate_announces_nothing_found() {
    let service = service_with(vec![Arc::new(ReverseStub::new("empty", 5, None))]);
    let (sink, mut rx) = ChannelEventSink::<Option<String>>::pair();
    service.reverse_geocoding_manager().add_sink(sink);

    let address = service
        .reverse_geocode(GeoPoint::from_degrees(0.0, 0.0), None)
        .await;
    assert!(address.is_none());

    let mut saw_nothing_found = false;
    let mut saw_finished = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            RunEvent::NothingFound => {
                assert!(!saw_finished, "NothingFound must precede Finished");
                saw_nothing_found = true;
            }
            RunEvent::Finished(_) => saw_finished = true,
            RunEvent::ResultsChanged(_) => panic!("no result should have been announced"),
        }
    }
    assert!(saw_nothing_found);
    assert!(saw_finished);
}

// =============================================================================
// Parsing
// =============================================================================

#[tokio::test]
async fn test_first_successful_parse_wins() {
    let service = service_with(vec![
        Arc::new(ParseStub::failing("bad", "unknown format")),
        Arc::new(ParseStub::ok("good", "places")),
    ]);

    let report = service
        .parse(
            ParseQuery::new("/tmp/places.kml", DocumentRole::UserDocument),
            None,
        )
        .await;

    assert_eq!(report.document.unwrap().name, "places");
}

#[tokio::test]
async fn test_all_parsers_failing_reports_first_error() {
    let service = service_with(vec![Arc::new(ParseStub::failing("bad", "unknown format"))]);

    let report = service
        .parse(
            ParseQuery::new("/tmp/places.xyz", DocumentRole::MapDocument),
            None,
        )
        .await;

    assert!(report.document.is_none());
    assert!(report.error.unwrap().contains("unknown format"));
}

// =============================================================================
// Pool
// =============================================================================

#[tokio::test]
async fn test_pool_is_shared_across_managers() {
    let service = service_with(vec![
        Arc::new(SearchStub::new("s", 30, vec![placemark("A", 0.0, 0.0)])),
        Arc::new(ReverseStub::new("r", 30, Some("addr"))),
    ]);

    let (search, address) = tokio::join!(
        service.search(SearchQuery::new("cafe"), None),
        service.reverse_geocode(GeoPoint::from_degrees(1.0, 1.0), None),
    );

    assert_eq!(search.len(), 1);
    assert_eq!(address.as_deref(), Some("addr"));
    assert!(service.pool().peak_in_flight() <= service.pool().slots());
    assert_eq!(service.pool().in_flight(), 0);
}
