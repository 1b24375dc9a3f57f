//! Routing client tests against a mock OSRM server.
//!
//! The client is blocking, so every call runs on a `spawn_blocking` thread
//! while the mock server lives on the test runtime.

use std::sync::Arc;
use std::time::Duration;

use carbon_route::cache::{self, MemoryStore, RoadDistanceCache};
use carbon_route::osrm::OsrmClient;
use carbon_route::traits::{KeyValueStore, RoadDistanceProvider};
use carbon_route::{Coordinate, RoadDistance, RoutingConfig};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAO_PAULO: Coordinate = Coordinate::new(-23.5505, -46.6333);
const RIO: Coordinate = Coordinate::new(-22.9068, -43.1729);

fn config(server: &MockServer) -> RoutingConfig {
    RoutingConfig {
        enabled: true,
        endpoint: format!("{}/route/v1/driving", server.uri()),
        cache_ttl_ms: 60 * 60 * 1000,
        timeout_secs: 5,
    }
}

fn route_body(meters: f64) -> serde_json::Value {
    json!({
        "code": "Ok",
        "routes": [{ "distance": meters, "duration": 19_800.5, "weight": 19_800.5 }],
        "waypoints": []
    })
}

async fn mount_route(server: &MockServer, template: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/[^/]+$"))
        .and(query_param("overview", "false"))
        .respond_with(template)
        .expect(calls)
        .mount(server)
        .await;
}

async fn lookup<S>(client: OsrmClient<S>, pairs: Vec<(Coordinate, Coordinate)>) -> Vec<RoadDistance>
where
    S: KeyValueStore + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        pairs
            .into_iter()
            .map(|(from, to)| client.driving_distance(from, to))
            .collect()
    })
    .await
    .expect("blocking task")
}

async fn client_with_store(
    config: RoutingConfig,
    store: Arc<MemoryStore>,
) -> OsrmClient<Arc<MemoryStore>> {
    tokio::task::spawn_blocking(move || OsrmClient::with_store(config, store))
        .await
        .expect("blocking task")
        .expect("build client")
}

#[tokio::test(flavor = "multi_thread")]
async fn distance_is_rounded_km_and_cached() {
    let server = MockServer::start().await;
    mount_route(&server, ResponseTemplate::new(200).set_body_json(route_body(429_512.3)), 1).await;

    let store = Arc::new(MemoryStore::new());
    let client = client_with_store(config(&server), Arc::clone(&store)).await;
    let results = lookup(client, vec![(SAO_PAULO, RIO), (SAO_PAULO, RIO)]).await;

    assert_eq!(results, vec![RoadDistance::Found(430.0), RoadDistance::Found(430.0)]);
    assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn request_uses_longitude_latitude_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/route/v1/driving/-46.633300,-23.550500;-43.172900,-22.906800",
        ))
        .and(query_param("alternatives", "false"))
        .and(query_param("steps", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body(1_000.0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_store(config(&server), Arc::new(MemoryStore::new())).await;
    let results = lookup(client, vec![(SAO_PAULO, RIO)]).await;
    assert_eq!(results, vec![RoadDistance::Found(1.0)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn cache_key_is_direction_sensitive() {
    let server = MockServer::start().await;
    mount_route(&server, ResponseTemplate::new(200).set_body_json(route_body(430_000.0)), 2).await;

    let client = client_with_store(config(&server), Arc::new(MemoryStore::new())).await;
    let results = lookup(client, vec![(SAO_PAULO, RIO), (RIO, SAO_PAULO)]).await;
    assert_eq!(results, vec![RoadDistance::Found(430.0), RoadDistance::Found(430.0)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_is_unavailable_and_not_cached() {
    let server = MockServer::start().await;
    mount_route(&server, ResponseTemplate::new(503), 2).await;

    let store = Arc::new(MemoryStore::new());
    let client = client_with_store(config(&server), Arc::clone(&store)).await;
    let results = lookup(client, vec![(SAO_PAULO, RIO), (SAO_PAULO, RIO)]).await;

    assert_eq!(results, vec![RoadDistance::Unavailable, RoadDistance::Unavailable]);
    assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_responses_are_unavailable() {
    let bodies = vec![
        json!({ "code": "NoRoute", "message": "Impossible route" }),
        json!({ "code": "Ok", "routes": [] }),
        json!({ "code": "Ok", "routes": [{ "duration": 10.0 }] }),
    ];

    for body in bodies {
        let server = MockServer::start().await;
        mount_route(&server, ResponseTemplate::new(200).set_body_json(body.clone()), 1).await;

        let client = client_with_store(config(&server), Arc::new(MemoryStore::new())).await;
        let results = lookup(client, vec![(SAO_PAULO, RIO)]).await;
        assert_eq!(results, vec![RoadDistance::Unavailable], "body: {}", body);
    }

    let server = MockServer::start().await;
    mount_route(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>"), 1).await;
    let client = client_with_store(config(&server), Arc::new(MemoryStore::new())).await;
    assert_eq!(lookup(client, vec![(SAO_PAULO, RIO)]).await, vec![RoadDistance::Unavailable]);
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_cache_entry_is_refetched() {
    let server = MockServer::start().await;
    mount_route(&server, ResponseTemplate::new(200).set_body_json(route_body(429_512.3)), 1).await;

    let config = config(&server);
    let store = Arc::new(MemoryStore::new());
    let ttl = Duration::from_millis(config.cache_ttl_ms);
    let seeded = RoadDistanceCache::new(Arc::clone(&store), ttl);
    let stale_at = cache::now_ms() - config.cache_ttl_ms - 1_000;
    seeded.put(SAO_PAULO, RIO, 1_000.0, stale_at);

    let client = client_with_store(config, Arc::clone(&store)).await;
    let results = lookup(client, vec![(SAO_PAULO, RIO)]).await;

    assert_eq!(results, vec![RoadDistance::Found(430.0)]);
    let refreshed = seeded.get(SAO_PAULO, RIO).expect("entry rewritten");
    assert_eq!(refreshed.meters, 429_512.3);
    assert!(refreshed.inserted_at_ms > stale_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn fresh_cache_entry_skips_network() {
    let server = MockServer::start().await;
    mount_route(&server, ResponseTemplate::new(200).set_body_json(route_body(1.0)), 0).await;

    let config = config(&server);
    let store = Arc::new(MemoryStore::new());
    RoadDistanceCache::new(Arc::clone(&store), Duration::from_millis(config.cache_ttl_ms))
        .put(SAO_PAULO, RIO, 357_400.0, cache::now_ms());

    let client = client_with_store(config, store).await;
    assert_eq!(lookup(client, vec![(SAO_PAULO, RIO)]).await, vec![RoadDistance::Found(357.0)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn corrupt_cache_entry_is_refetched() {
    let server = MockServer::start().await;
    mount_route(&server, ResponseTemplate::new(200).set_body_json(route_body(12_400.0)), 1).await;

    let store = Arc::new(MemoryStore::new());
    store.set(
        &RoadDistanceCache::<MemoryStore>::key(SAO_PAULO, RIO),
        "{\"ts\": \"yesterday\"".to_string(),
    );

    let client = client_with_store(config(&server), store).await;
    assert_eq!(lookup(client, vec![(SAO_PAULO, RIO)]).await, vec![RoadDistance::Found(12.0)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_provider_is_unavailable() {
    let config = RoutingConfig {
        enabled: true,
        endpoint: "http://127.0.0.1:9/route/v1/driving".to_string(),
        cache_ttl_ms: 60_000,
        timeout_secs: 2,
    };

    let client = client_with_store(config, Arc::new(MemoryStore::new())).await;
    assert_eq!(lookup(client, vec![(SAO_PAULO, RIO)]).await, vec![RoadDistance::Unavailable]);
}
