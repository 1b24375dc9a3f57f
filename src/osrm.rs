//! OSRM HTTP adapter for driving distances.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::{self, MemoryStore, RoadDistanceCache};
use crate::catalog::Coordinate;
use crate::config::RoutingConfig;
use crate::traits::{KeyValueStore, RoadDistance, RoadDistanceProvider};

#[derive(Debug)]
pub struct OsrmClient<S = MemoryStore> {
    config: RoutingConfig,
    client: reqwest::blocking::Client,
    cache: RoadDistanceCache<S>,
}

impl OsrmClient<MemoryStore> {
    pub fn new(config: RoutingConfig) -> Result<Self, reqwest::Error> {
        Self::with_store(config, MemoryStore::new())
    }
}

impl<S: KeyValueStore> OsrmClient<S> {
    pub fn with_store(config: RoutingConfig, store: S) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let cache = RoadDistanceCache::new(store, Duration::from_millis(config.cache_ttl_ms));

        Ok(Self {
            config,
            client,
            cache,
        })
    }

    pub fn cache(&self) -> &RoadDistanceCache<S> {
        &self.cache
    }

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/{:.6},{:.6};{:.6},{:.6}?overview=false&alternatives=false&steps=false",
            self.config.endpoint.trim_end_matches('/'),
            from.lon,
            from.lat,
            to.lon,
            to.lat
        )
    }

    fn fetch_meters(&self, from: Coordinate, to: Coordinate) -> Option<f64> {
        let url = self.route_url(from, to);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>());

        match response {
            Ok(body) => {
                let meters = body
                    .routes
                    .unwrap_or_default()
                    .into_iter()
                    .next()
                    .and_then(|route| route.distance)
                    .filter(|meters| meters.is_finite() && *meters >= 0.0);
                if meters.is_none() {
                    warn!(url = %url, "Routing response has no route distance");
                }
                meters
            }
            Err(err) => {
                warn!(url = %url, error = %err, "Routing request failed");
                None
            }
        }
    }
}

impl<S: KeyValueStore> RoadDistanceProvider for OsrmClient<S> {
    fn driving_distance(&self, from: Coordinate, to: Coordinate) -> RoadDistance {
        if !self.config.enabled {
            debug!("Road routing disabled");
            return RoadDistance::Unavailable;
        }
        if !from.is_valid() || !to.is_valid() {
            debug!(?from, ?to, "Rejecting malformed coordinates");
            return RoadDistance::Unavailable;
        }

        if let Some(meters) = self.cache.get_fresh(from, to, cache::now_ms()) {
            debug!(meters, "Road distance cache hit");
            return RoadDistance::Found(meters_to_km(meters));
        }

        match self.fetch_meters(from, to) {
            Some(meters) => {
                self.cache.put(from, to, meters, cache::now_ms());
                RoadDistance::Found(meters_to_km(meters))
            }
            None => RoadDistance::Unavailable,
        }
    }
}

fn meters_to_km(meters: f64) -> f64 {
    (meters / 1000.0).round()
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: Option<f64>,
}
