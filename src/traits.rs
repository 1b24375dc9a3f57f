//! Seams between the resolver, its lookup strategies and the outside world.
//!
//! Concrete implementations live next to what they wrap: catalog and
//! coordinate lookups in [`crate::resolver`] and [`crate::haversine`], the
//! OSRM client in [`crate::osrm`], the in-memory store in [`crate::cache`].

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::Coordinate;

/// Where a resolved distance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceSource {
    Catalog,
    ExternalRouting,
    CoordinateEstimate,
}

/// One resolution request as seen by each strategy.
#[derive(Debug, Clone, Copy)]
pub struct DistanceQuery<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    /// Caller opted in to the external road-distance lookup.
    pub use_road_distance: bool,
}

/// A single step of distance resolution.
///
/// Returning `None` passes the query on to the next strategy.
pub trait DistanceStrategy {
    fn source(&self) -> DistanceSource;

    fn try_resolve(&self, query: &DistanceQuery<'_>) -> Option<f64>;
}

/// Outcome of a road-distance lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoadDistance {
    /// Driving distance in whole kilometers.
    Found(f64),
    Unavailable,
}

impl RoadDistance {
    pub fn km(self) -> Option<f64> {
        match self {
            RoadDistance::Found(km) => Some(km),
            RoadDistance::Unavailable => None,
        }
    }
}

/// Provides a driving distance between two coordinates.
///
/// Implementations never fail hard: every problem maps to `Unavailable`.
pub trait RoadDistanceProvider {
    fn driving_distance(&self, from: Coordinate, to: Coordinate) -> RoadDistance;
}

impl<T: RoadDistanceProvider + ?Sized> RoadDistanceProvider for Arc<T> {
    fn driving_distance(&self, from: Coordinate, to: Coordinate) -> RoadDistance {
        (**self).driving_distance(from, to)
    }
}

/// String key/value storage backing the road-distance cache.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }
}
