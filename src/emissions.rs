//! Emission arithmetic: per-mode emissions, comparisons, savings and
//! carbon-credit pricing.
//!
//! Every operation is pure. Outputs are rounded with [`round_to`]: emissions,
//! percentages and prices to 2 places, credits to 4, per-km factors to 3.

use serde::Serialize;
use tracing::warn;

use crate::config::{DEFAULT_KG_PER_CREDIT, EmissionConfig, TransportMode};
use crate::error::{self, CalcError, Result};
use crate::rounding::round_to;

/// Emission of one mode alongside its share of the baseline mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeEmission {
    pub mode: String,
    pub emission_kg: f64,
    pub percentage_vs_car: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Savings {
    pub saved_kg: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditPrice {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEmission {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    /// Display label of the resolved mode.
    pub transport: String,
    /// Kilograms of CO2 per kilometer.
    pub factor_kg_per_km: f64,
    pub total_kg: f64,
}

/// Everything a result view needs for one trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub mode: String,
    pub distance_km: f64,
    pub emission_kg: f64,
    pub savings: Savings,
    pub comparison: Vec<ModeEmission>,
    pub credits: f64,
    pub price: CreditPrice,
}

#[derive(Debug, Clone)]
pub struct EmissionCalculator {
    config: EmissionConfig,
}

impl Default for EmissionCalculator {
    fn default() -> Self {
        Self::new(EmissionConfig::default())
    }
}

impl EmissionCalculator {
    pub fn new(config: EmissionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmissionConfig {
        &self.config
    }

    pub fn modes(&self) -> &[TransportMode] {
        &self.config.modes
    }

    pub fn mode(&self, key: &str) -> Option<&TransportMode> {
        self.config.modes.iter().find(|mode| mode.key == key)
    }

    fn factor(&self, key: &str) -> Result<f64> {
        self.mode(key)
            .and_then(TransportMode::valid_factor)
            .ok_or_else(|| CalcError::InvalidMode(key.to_string()))
    }

    /// Kilograms of CO2 for `distance_km` travelled with `mode`.
    pub fn calculate_emission(&self, distance_km: f64, mode: &str) -> Result<f64> {
        let distance_km = error::non_negative("distance_km", distance_km)?;
        let factor = self.factor(mode)?;
        let kg = distance_km * factor / 1000.0;
        Ok(round_to(error::finite_result("distance_km", distance_km, kg)?, 2))
    }

    /// Emissions for every configured mode, cheapest first.
    ///
    /// Ties keep configuration order.
    pub fn calculate_all_modes(&self, distance_km: f64) -> Result<Vec<ModeEmission>> {
        let distance_km = error::non_negative("distance_km", distance_km)?;

        let emissions = self
            .config
            .modes
            .iter()
            .map(|mode| {
                self.calculate_emission(distance_km, &mode.key)
                    .map(|emission| (mode.key.as_str(), emission))
            })
            .collect::<Result<Vec<_>>>()?;

        let baseline_key = self.config.baseline_mode.as_str();
        let baseline = emissions
            .iter()
            .find(|(key, _)| *key == baseline_key)
            .map(|(_, emission)| *emission)
            .filter(|emission| *emission > 0.0);

        let mut results: Vec<ModeEmission> = emissions
            .into_iter()
            .map(|(key, emission_kg)| {
                let percentage_vs_car = match baseline {
                    Some(baseline) => {
                        let share = emission_kg / baseline * 100.0;
                        round_to(error::finite_result("distance_km", distance_km, share)?, 2)
                    }
                    None if key == baseline_key => 100.0,
                    None => 0.0,
                };
                Ok(ModeEmission {
                    mode: key.to_string(),
                    emission_kg,
                    percentage_vs_car,
                })
            })
            .collect::<Result<_>>()?;

        results.sort_by(|a, b| a.emission_kg.total_cmp(&b.emission_kg));
        Ok(results)
    }

    /// How much `emission` saves against `baseline`. Never negative.
    pub fn calculate_savings(&self, emission: f64, baseline: f64) -> Result<Savings> {
        let emission = error::finite("emission", emission)?;
        let baseline = error::finite("baseline", baseline)?;

        let saved = error::finite_result("baseline", baseline, (baseline - emission).max(0.0))?;
        let percentage = if baseline > 0.0 {
            round_to(error::finite_result("baseline", baseline, saved / baseline * 100.0)?, 2)
        } else {
            0.0
        };

        Ok(Savings {
            saved_kg: round_to(saved, 2),
            percentage,
        })
    }

    pub fn calculate_carbon_credits(&self, emission_kg: f64) -> Result<f64> {
        let emission_kg = error::non_negative("emission_kg", emission_kg)?;
        let credits =
            error::finite_result("emission_kg", emission_kg, emission_kg / self.kg_per_credit())?;
        Ok(round_to(credits, 4))
    }

    pub fn estimate_credit_price(&self, credits: f64) -> Result<CreditPrice> {
        let credits = error::non_negative("credits", credits)?;
        let config = &self.config.carbon_credit;

        let min = error::finite_result("credits", credits, credits * config.price_min_per_credit)?;
        let max = error::finite_result("credits", credits, credits * config.price_max_per_credit)?;
        Ok(CreditPrice {
            min: round_to(min, 2),
            max: round_to(max, 2),
            average: round_to(min / 2.0 + max / 2.0, 2),
        })
    }

    /// Emission detail for a named route.
    ///
    /// `transport` may be a mode key or a display label; anything that does
    /// not match falls back to the configured default mode.
    pub fn calculate_route_emission(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
        distance_km: f64,
        transport: Option<&str>,
    ) -> Result<RouteEmission> {
        let distance_km = error::non_negative("distance_km", distance_km)?;

        let mode = self
            .resolve_mode(transport.unwrap_or_default())
            .filter(|mode| mode.valid_factor().is_some())
            .ok_or_else(|| {
                CalcError::InvalidMode(transport.unwrap_or(&self.config.default_mode).to_string())
            })?;

        let factor_kg_per_km = round_to(mode.factor_g_per_km / 1000.0, 3);
        let total_kg = distance_km * factor_kg_per_km;
        let total_kg = round_to(error::finite_result("distance_km", distance_km, total_kg)?, 2);
        let transport = if mode.label.is_empty() {
            mode.key.clone()
        } else {
            mode.label.clone()
        };

        Ok(RouteEmission {
            origin: origin.unwrap_or_default().to_string(),
            destination: destination.unwrap_or_default().to_string(),
            distance_km,
            transport,
            factor_kg_per_km,
            total_kg,
        })
    }

    /// Emission, savings against the baseline mode, comparison and credit
    /// pricing for one trip.
    pub fn summarize_trip(&self, distance_km: f64, mode: &str) -> Result<TripSummary> {
        let emission_kg = self.calculate_emission(distance_km, mode)?;
        let baseline = match self.calculate_emission(distance_km, &self.config.baseline_mode) {
            Ok(baseline) => baseline,
            Err(CalcError::InvalidMode(_)) => emission_kg,
            Err(err) => return Err(err),
        };
        let savings = self.calculate_savings(emission_kg, baseline)?;
        let comparison = self.calculate_all_modes(distance_km)?;
        let credits = self.calculate_carbon_credits(emission_kg)?;
        let price = self.estimate_credit_price(credits)?;

        Ok(TripSummary {
            mode: mode.to_string(),
            distance_km,
            emission_kg,
            savings,
            comparison,
            credits,
            price,
        })
    }

    fn resolve_mode(&self, input: &str) -> Option<&TransportMode> {
        let modes = &self.config.modes;
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return self.mode(&self.config.default_mode);
        }

        modes
            .iter()
            .find(|mode| mode.key == input)
            .or_else(|| modes.iter().find(|mode| mode.key.to_lowercase() == needle))
            .or_else(|| {
                modes.iter().find(|mode| {
                    let label = mode.label.to_lowercase();
                    !label.is_empty()
                        && (label == needle || label.contains(&needle) || needle.contains(&label))
                })
            })
            .or_else(|| self.mode(&self.config.default_mode))
    }

    fn kg_per_credit(&self) -> f64 {
        let configured = self.config.carbon_credit.kg_per_credit;
        if configured.is_finite() && configured > 0.0 {
            configured
        } else {
            warn!(configured, "kg_per_credit must be positive, using default");
            DEFAULT_KG_PER_CREDIT
        }
    }
}
