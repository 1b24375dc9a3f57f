//! Distance resolution as an ordered list of strategies.
//!
//! The standard order is catalog match (either direction), external road
//! distance when requested and enabled, then a great-circle estimate. The
//! first strategy that produces a value wins.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::catalog::RouteCatalog;
use crate::config::RoutingConfig;
use crate::haversine::GreatCircleEstimate;
use crate::traits::{
    DistanceQuery, DistanceSource, DistanceStrategy, RoadDistance, RoadDistanceProvider,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Resolution {
    Found {
        distance_km: f64,
        source: DistanceSource,
    },
    NotFound,
}

impl Resolution {
    pub fn distance_km(&self) -> Option<f64> {
        match self {
            Resolution::Found { distance_km, .. } => Some(*distance_km),
            Resolution::NotFound => None,
        }
    }

    pub fn source(&self) -> Option<DistanceSource> {
        match self {
            Resolution::Found { source, .. } => Some(*source),
            Resolution::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Ask the external routing provider before estimating.
    pub use_road_distance: bool,
}

/// Known route distance from the catalog, in either direction.
#[derive(Debug, Clone)]
pub struct CatalogLookup {
    catalog: Arc<RouteCatalog>,
}

impl CatalogLookup {
    pub fn new(catalog: Arc<RouteCatalog>) -> Self {
        Self { catalog }
    }
}

impl DistanceStrategy for CatalogLookup {
    fn source(&self) -> DistanceSource {
        DistanceSource::Catalog
    }

    fn try_resolve(&self, query: &DistanceQuery<'_>) -> Option<f64> {
        self.catalog.find_distance(query.origin, query.destination)
    }
}

/// Driving distance between the cities' coordinates from a routing provider.
pub struct RoadDistanceLookup<P> {
    catalog: Arc<RouteCatalog>,
    provider: P,
    enabled: bool,
}

impl<P> std::fmt::Debug for RoadDistanceLookup<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadDistanceLookup")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl<P: RoadDistanceProvider> RoadDistanceLookup<P> {
    pub fn new(catalog: Arc<RouteCatalog>, provider: P, enabled: bool) -> Self {
        Self {
            catalog,
            provider,
            enabled,
        }
    }
}

impl<P: RoadDistanceProvider> DistanceStrategy for RoadDistanceLookup<P> {
    fn source(&self) -> DistanceSource {
        DistanceSource::ExternalRouting
    }

    fn try_resolve(&self, query: &DistanceQuery<'_>) -> Option<f64> {
        if !query.use_road_distance || !self.enabled {
            return None;
        }
        let cities = self.catalog.cities();
        let from = cities.find(query.origin)?;
        let to = cities.find(query.destination)?;

        match self.provider.driving_distance(from, to) {
            RoadDistance::Found(km) => Some(km),
            RoadDistance::Unavailable => {
                debug!(
                    origin = query.origin,
                    destination = query.destination,
                    "Road distance unavailable, falling back"
                );
                None
            }
        }
    }
}

type BoxedStrategy = Box<dyn DistanceStrategy + Send + Sync>;

pub struct DistanceResolver {
    strategies: Vec<BoxedStrategy>,
}

impl std::fmt::Debug for DistanceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources: Vec<_> = self.strategies.iter().map(|s| s.source()).collect();
        f.debug_struct("DistanceResolver")
            .field("strategies", &sources)
            .finish()
    }
}

impl DistanceResolver {
    /// Resolver that tries `strategies` in the given order.
    pub fn new(strategies: Vec<BoxedStrategy>) -> Self {
        Self { strategies }
    }

    /// Catalog, then road distance from `road`, then estimate.
    ///
    /// Without a routing provider use [`DistanceResolver::offline`].
    pub fn standard<P>(catalog: Arc<RouteCatalog>, routing: &RoutingConfig, road: P) -> Self
    where
        P: RoadDistanceProvider + Send + Sync + 'static,
    {
        Self::new(vec![
            Box::new(CatalogLookup::new(Arc::clone(&catalog))),
            Box::new(RoadDistanceLookup::new(
                Arc::clone(&catalog),
                road,
                routing.enabled,
            )),
            Box::new(GreatCircleEstimate::new(catalog)),
        ])
    }

    /// Catalog and estimate only, for callers without a routing provider.
    pub fn offline(catalog: Arc<RouteCatalog>) -> Self {
        Self::new(vec![
            Box::new(CatalogLookup::new(Arc::clone(&catalog))),
            Box::new(GreatCircleEstimate::new(catalog)),
        ])
    }

    #[instrument(skip(self), level = "debug")]
    pub fn resolve(&self, origin: &str, destination: &str, options: ResolveOptions) -> Resolution {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return Resolution::NotFound;
        }

        let query = DistanceQuery {
            origin,
            destination,
            use_road_distance: options.use_road_distance,
        };

        for strategy in &self.strategies {
            if let Some(distance_km) = strategy.try_resolve(&query) {
                let source = strategy.source();
                debug!(?source, distance_km, "Distance resolved");
                return Resolution::Found {
                    distance_km,
                    source,
                };
            }
        }

        debug!("No distance found");
        Resolution::NotFound
    }
}
