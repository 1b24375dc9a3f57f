//! Emission factors, carbon-credit constants and routing settings.
//!
//! Values are plain data. Each component receives the part it needs at
//! construction time; nothing here is global.

use serde::{Deserialize, Serialize};

/// Kilograms of CO2 represented by one carbon credit when not configured.
pub const DEFAULT_KG_PER_CREDIT: f64 = 1000.0;
pub const DEFAULT_PRICE_MIN_PER_CREDIT: f64 = 50.0;
pub const DEFAULT_PRICE_MAX_PER_CREDIT: f64 = 150.0;

pub const DEFAULT_ROUTING_ENDPOINT: &str = "https://router.project-osrm.org/route/v1/driving";
const DEFAULT_CACHE_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// A transport mode with its emission factor and display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMode {
    pub key: String,
    /// Grams of CO2 per kilometer.
    pub factor_g_per_km: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl TransportMode {
    pub fn new(key: impl Into<String>, factor_g_per_km: f64) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            factor_g_per_km,
            icon: String::new(),
            color: String::new(),
        }
    }

    pub fn with_display(
        mut self,
        label: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        self.label = label.into();
        self.icon = icon.into();
        self.color = color.into();
        self
    }

    /// The factor, if it is usable in a computation.
    pub fn valid_factor(&self) -> Option<f64> {
        (self.factor_g_per_km.is_finite() && self.factor_g_per_km >= 0.0)
            .then_some(self.factor_g_per_km)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonCreditConfig {
    #[serde(default = "default_kg_per_credit")]
    pub kg_per_credit: f64,
    #[serde(default = "default_price_min")]
    pub price_min_per_credit: f64,
    #[serde(default = "default_price_max")]
    pub price_max_per_credit: f64,
}

impl Default for CarbonCreditConfig {
    fn default() -> Self {
        Self {
            kg_per_credit: DEFAULT_KG_PER_CREDIT,
            price_min_per_credit: DEFAULT_PRICE_MIN_PER_CREDIT,
            price_max_per_credit: DEFAULT_PRICE_MAX_PER_CREDIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of an OSRM-compatible `route` service, profile included.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionConfig {
    /// Configured modes, in the order used to break ties.
    #[serde(default = "default_modes")]
    pub modes: Vec<TransportMode>,
    #[serde(default)]
    pub carbon_credit: CarbonCreditConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Mode used when a transport input cannot be matched.
    #[serde(default = "default_mode_key")]
    pub default_mode: String,
    /// Mode every other mode is compared against.
    #[serde(default = "default_mode_key")]
    pub baseline_mode: String,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            modes: default_modes(),
            carbon_credit: CarbonCreditConfig::default(),
            routing: RoutingConfig::default(),
            default_mode: default_mode_key(),
            baseline_mode: default_mode_key(),
        }
    }
}

impl EmissionConfig {
    /// Config with the given `(key, factor)` pairs and no display metadata.
    pub fn with_factors<K: Into<String>>(factors: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            modes: factors
                .into_iter()
                .map(|(key, factor)| TransportMode::new(key, factor))
                .collect(),
            ..Self::default()
        }
    }
}

fn default_modes() -> Vec<TransportMode> {
    vec![
        TransportMode::new("bicycle", 0.0).with_display("Bicicleta", "🚲", "#10b981"),
        TransportMode::new("car", 192.0).with_display("Carro", "🚗", "#106b01"),
        TransportMode::new("bus", 27.0).with_display("Ônibus", "🚌", "#059669"),
        TransportMode::new("truck", 900.0).with_display("Caminhão", "🚛", "#475569"),
    ]
}

fn default_mode_key() -> String {
    "car".to_string()
}

fn default_kg_per_credit() -> f64 {
    DEFAULT_KG_PER_CREDIT
}

fn default_price_min() -> f64 {
    DEFAULT_PRICE_MIN_PER_CREDIT
}

fn default_price_max() -> f64 {
    DEFAULT_PRICE_MAX_PER_CREDIT
}

fn default_endpoint() -> String {
    DEFAULT_ROUTING_ENDPOINT.to_string()
}

fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

fn default_timeout_secs() -> u64 {
    10
}
