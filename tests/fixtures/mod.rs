//! Test fixtures for carbon-route.
//!
//! Provides real Brazilian city coordinates matching the built-in route
//! catalog names.

pub mod brazil_cities;

pub use brazil_cities::*;
