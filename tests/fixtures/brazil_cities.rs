//! Brazilian city centre coordinates (approximate, from OpenStreetMap).

use carbon_route::{CityIndex, Coordinate};

/// A named city with coordinates.
#[derive(Debug, Clone)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

pub const CITIES: &[City] = &[
    City::new("São Paulo, SP", -23.5505, -46.6333),
    City::new("Rio de Janeiro, RJ", -22.9068, -43.1729),
    City::new("Campinas, SP", -22.9056, -47.0608),
    City::new("Santos, SP", -23.9608, -46.3336),
    City::new("Sorocaba, SP", -23.5015, -47.4526),
    City::new("São José dos Campos, SP", -23.1896, -45.8841),
    City::new("Campos dos Goytacazes, RJ", -21.7545, -41.3244),
    City::new("Belo Horizonte, MG", -19.9167, -43.9345),
    City::new("Curitiba, PR", -25.4284, -49.2733),
    City::new("Londrina, PR", -23.3045, -51.1696),
    City::new("Fortaleza, CE", -3.7319, -38.5267),
    City::new("Recife, PE", -8.0476, -34.8770),
];

pub fn city(name: &str) -> &'static City {
    CITIES
        .iter()
        .find(|city| city.name == name)
        .unwrap_or_else(|| panic!("unknown fixture city {name}"))
}

pub fn city_index() -> CityIndex {
    CITIES
        .iter()
        .map(|city| (city.name, city.coordinate()))
        .collect()
}
