//! Great-circle distance estimate (fallback when no route is known).
//!
//! Straight-line distance between city coordinates, rounded to whole
//! kilometers. Always shorter than the road distance but always available
//! once both cities are in the coordinate index.

use std::sync::Arc;

use crate::catalog::{Coordinate, RouteCatalog};
use crate::traits::{DistanceQuery, DistanceSource, DistanceStrategy};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Coordinate-based estimate over the catalog's city index.
#[derive(Debug, Clone)]
pub struct GreatCircleEstimate {
    catalog: Arc<RouteCatalog>,
}

impl GreatCircleEstimate {
    pub fn new(catalog: Arc<RouteCatalog>) -> Self {
        Self { catalog }
    }
}

impl DistanceStrategy for GreatCircleEstimate {
    fn source(&self) -> DistanceSource {
        DistanceSource::CoordinateEstimate
    }

    fn try_resolve(&self, query: &DistanceQuery<'_>) -> Option<f64> {
        let cities = self.catalog.cities();
        let from = cities.find(query.origin)?;
        let to = cities.find(query.destination)?;
        Some(haversine_km(from, to).round())
    }
}
