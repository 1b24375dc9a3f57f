//! Curated routes with known distances and the city coordinate index used
//! when no route is known.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and within the valid latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
}

impl Route {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        distance_km: f64,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            distance_km,
        }
    }

    fn key(&self) -> (String, String) {
        (normalize(&self.origin), normalize(&self.destination))
    }
}

/// Lookup form of a location name: trimmed and lowercased.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Location names mapped to coordinates, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityIndex {
    entries: Vec<(String, Coordinate)>,
}

impl CityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, coordinate: Coordinate) {
        self.entries.push((name.into(), coordinate));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Resolve a free-form location to coordinates.
    ///
    /// Tried in order over the whole index: exact match, then `"<name>,"`
    /// prefix (so "Campinas" finds "Campinas, SP"), then containment.
    pub fn find(&self, name: &str) -> Option<Coordinate> {
        let needle = normalize(name);
        if needle.is_empty() {
            return None;
        }
        let prefix = format!("{needle},");

        self.find_by(|key| key == needle)
            .or_else(|| self.find_by(|key| key.starts_with(&prefix)))
            .or_else(|| self.find_by(|key| key.contains(needle.as_str())))
    }

    fn find_by(&self, predicate: impl Fn(&str) -> bool) -> Option<Coordinate> {
        self.entries
            .iter()
            .find(|(key, _)| predicate(&normalize(key)))
            .map(|(_, coordinate)| *coordinate)
    }
}

impl<S: Into<String>> FromIterator<(S, Coordinate)> for CityIndex {
    fn from_iter<I: IntoIterator<Item = (S, Coordinate)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, coordinate)| (name.into(), coordinate))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteCatalog {
    routes: Vec<Route>,
    cities: CityIndex,
}

impl RouteCatalog {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            cities: CityIndex::default(),
        }
    }

    pub fn with_cities(mut self, cities: CityIndex) -> Self {
        self.cities = cities;
        self
    }

    /// Popular routes between Brazilian cities.
    pub fn builtin() -> Self {
        let routes = BUILTIN_ROUTES
            .iter()
            .map(|(origin, destination, km)| Route::new(*origin, *destination, *km))
            .collect();
        Self::new(routes)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn cities(&self) -> &CityIndex {
        &self.cities
    }

    /// Known distance between two locations, in either direction.
    pub fn find_distance(&self, origin: &str, destination: &str) -> Option<f64> {
        let origin = normalize(origin);
        let destination = normalize(destination);
        if origin.is_empty() || destination.is_empty() {
            return None;
        }

        self.routes
            .iter()
            .find(|route| {
                let (ro, rd) = route.key();
                (ro == origin && rd == destination) || (ro == destination && rd == origin)
            })
            .map(|route| route.distance_km)
    }

    /// Routes without repeated origin/destination pairs, first entry kept.
    pub fn unique_routes(&self) -> Vec<&Route> {
        let mut seen = HashSet::new();
        self.routes
            .iter()
            .filter(|route| seen.insert(route.key()))
            .collect()
    }

    /// Every known location name, sorted and de-duplicated.
    pub fn all_cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self
            .unique_routes()
            .into_iter()
            .flat_map(|route| [route.origin.clone(), route.destination.clone()])
            .chain(self.cities.names().map(str::to_string))
            .collect();
        cities.sort();
        cities.dedup();
        cities
    }
}

const BUILTIN_ROUTES: &[(&str, &str, f64)] = &[
    ("São Paulo, SP", "Rio de Janeiro, RJ", 430.0),
    ("São Paulo, SP", "Brasília, DF", 1015.0),
    ("Rio de Janeiro, RJ", "Brasília, DF", 1148.0),
    ("São Paulo, SP", "Campinas, SP", 95.0),
    ("Rio de Janeiro, RJ", "Niterói, RJ", 13.0),
    ("Belo Horizonte, MG", "Ouro Preto, MG", 100.0),
    ("Curitiba, PR", "Joinville, SC", 130.0),
    ("Salvador, BA", "Feira de Santana, BA", 116.0),
    ("Fortaleza, CE", "Sobral, CE", 240.0),
    ("Manaus, AM", "Itacoatiara, AM", 270.0),
    ("Belém, PA", "Marabá, PA", 485.0),
    ("Goiânia, GO", "Anápolis, GO", 55.0),
    ("Porto Alegre, RS", "Caxias do Sul, RS", 130.0),
    ("Recife, PE", "Caruaru, PE", 130.0),
    ("Natal, RN", "Mossoró, RN", 280.0),
    ("João Pessoa, PB", "Campina Grande, PB", 130.0),
    ("Aracaju, SE", "Lagarto, SE", 75.0),
    ("Palmas, TO", "Porto Nacional, TO", 60.0),
    ("Cuiabá, MT", "Rondonópolis, MT", 215.0),
    ("Campo Grande, MS", "Dourados, MS", 230.0),
    ("São Paulo, SP", "Santos, SP", 72.0),
    ("Rio de Janeiro, RJ", "Petrópolis, RJ", 68.0),
    ("Belo Horizonte, MG", "Uberlândia, MG", 500.0),
    ("Curitiba, PR", "Florianópolis, SC", 300.0),
    ("Salvador, BA", "Ilhéus, BA", 280.0),
    ("Fortaleza, CE", "Juazeiro do Norte, CE", 530.0),
    ("Manaus, AM", "Manacapuru, AM", 87.0),
    ("Belém, PA", "Santarém, PA", 700.0),
    ("Goiânia, GO", "Rio Verde, GO", 230.0),
    ("Porto Alegre, RS", "Pelotas, RS", 260.0),
    ("Recife, PE", "João Pessoa, PB", 185.0),
    ("Natal, RN", "Recife, PE", 292.0),
    ("São Paulo, SP", "Ribeirão Preto, SP", 315.0),
    ("Campinas, SP", "Ribeirão Preto, SP", 150.0),
];
