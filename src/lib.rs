//! carbon-route core
//!
//! Resolves the distance between two named locations and turns a distance
//! and transport mode into CO2 emissions, mode comparisons and carbon-credit
//! pricing.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod emissions;
pub mod error;
pub mod haversine;
pub mod osrm;
pub mod resolver;
pub mod rounding;
pub mod traits;

pub use catalog::{CityIndex, Coordinate, Route, RouteCatalog};
pub use config::{CarbonCreditConfig, EmissionConfig, RoutingConfig, TransportMode};
pub use emissions::EmissionCalculator;
pub use error::CalcError;
pub use resolver::{DistanceResolver, Resolution, ResolveOptions};
pub use traits::{DistanceSource, RoadDistance};
