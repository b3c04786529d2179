//! Scenario parameters and comparison setup
//!
//! Every field has a reference default, so a JSON config file only needs to
//! name the values it changes.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::catalog::{PowerType, VehicleCatalog};
use crate::error::{ModelError, Result};

/// User-tunable usage, pricing and policy inputs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    /// Fuel price per liter
    pub fuel_price: f64,
    /// Home charging price per kWh
    pub home_charging_price: f64,
    /// Public charging price per kWh
    pub public_charging_price: f64,
    /// Share of charging done at home (0-1)
    pub home_charging_fraction: f64,

    /// Commute days per week
    pub weekday_commute_days: f64,
    /// Distance driven on each commute day (km)
    pub weekday_distance_km: f64,
    /// Distance driven on each weekend day (km)
    pub weekend_distance_km: f64,
    /// Share of weekday distance on highways (0-1)
    pub weekday_highway_fraction: f64,
    /// Share of weekend distance on highways (0-1)
    pub weekend_highway_fraction: f64,

    /// Multiplier on EV mileage (EVs get driven more)
    pub ev_mileage_inflation: f64,
    /// Whether the inflation factor is applied
    pub apply_ev_mileage_inflation: bool,

    /// Toll per highway km
    pub toll_rate_per_km: f64,
    /// Annual parking fee
    pub annual_parking_fee: f64,
    /// Annual plate-related levy, combustion vehicles only
    pub annual_plate_levy: f64,
    /// Annual traffic fines
    pub annual_fine: f64,

    /// Annual discount rate for NPV
    pub discount_rate: f64,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            fuel_price: 6.5,
            home_charging_price: 0.7,
            public_charging_price: 1.5,
            home_charging_fraction: 0.0,
            weekday_commute_days: 5.0,
            weekday_distance_km: 60.0,
            weekend_distance_km: 100.0,
            weekday_highway_fraction: 0.5,
            weekend_highway_fraction: 0.5,
            ev_mileage_inflation: 1.2,
            apply_ev_mileage_inflation: true,
            toll_rate_per_km: 0.33,
            annual_parking_fee: 6000.0,
            annual_plate_levy: 2500.0,
            annual_fine: 400.0,
            discount_rate: 0.06,
        }
    }
}

impl ScenarioParameters {
    /// Blended electricity price given the home/public charging split
    pub fn blended_charging_price(&self) -> f64 {
        self.home_charging_price * self.home_charging_fraction
            + self.public_charging_price * (1.0 - self.home_charging_fraction)
    }

    /// Reject values outside their physical or economic range
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("home_charging_fraction", self.home_charging_fraction),
            ("weekday_highway_fraction", self.weekday_highway_fraction),
            ("weekend_highway_fraction", self.weekend_highway_fraction),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ModelError::InvalidArgument(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("fuel_price", self.fuel_price),
            ("home_charging_price", self.home_charging_price),
            ("public_charging_price", self.public_charging_price),
            ("weekday_distance_km", self.weekday_distance_km),
            ("weekend_distance_km", self.weekend_distance_km),
            ("toll_rate_per_km", self.toll_rate_per_km),
            ("annual_parking_fee", self.annual_parking_fee),
            ("annual_plate_levy", self.annual_plate_levy),
            ("annual_fine", self.annual_fine),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ModelError::InvalidArgument(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=7.0).contains(&self.weekday_commute_days) {
            return Err(ModelError::InvalidArgument(format!(
                "weekday_commute_days must be within [0, 7], got {}",
                self.weekday_commute_days
            )));
        }
        if !(self.ev_mileage_inflation > 0.0) {
            return Err(ModelError::InvalidArgument(format!(
                "ev_mileage_inflation must be positive, got {}",
                self.ev_mileage_inflation
            )));
        }
        if !(self.discount_rate > -1.0) {
            return Err(ModelError::InvalidArgument(format!(
                "discount_rate must be greater than -1, got {}",
                self.discount_rate
            )));
        }

        Ok(())
    }
}

/// One side of the comparison: which model, at what price, held when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleChoice {
    pub model: String,
    pub new_price: f64,
    pub start_year: u32,
    pub end_year: u32,
}

/// Full run configuration: scenario plus the two vehicles being compared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub scenario: ScenarioParameters,
    pub combustion: VehicleChoice,
    pub electric: VehicleChoice,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            scenario: ScenarioParameters::default(),
            combustion: VehicleChoice {
                model: "Toyota Camry".to_string(),
                new_price: 200_000.0,
                start_year: 4,
                end_year: 8,
            },
            electric: VehicleChoice {
                model: "Tesla Model 3".to_string(),
                new_price: 240_000.0,
                start_year: 4,
                end_year: 8,
            },
        }
    }
}

impl ModelConfig {
    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        log::debug!("Loading model config from {}", path.display());
        let file = File::open(path)?;
        let config: ModelConfig = serde_json::from_reader(BufReader::new(file))?;
        config.scenario.validate()?;
        Ok(config)
    }

    /// Load from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.scenario.validate()?;
        Ok(config)
    }

    /// Check both choices against a catalog before any projection runs
    pub fn check_against(&self, catalog: &VehicleCatalog) -> Result<()> {
        for (choice, expected) in [
            (&self.combustion, PowerType::Combustion),
            (&self.electric, PowerType::Electric),
        ] {
            let model = catalog.get(&choice.model)?;
            if model.power_type() != expected {
                return Err(ModelError::InvalidArgument(format!(
                    "{} is {}, expected a {} model",
                    model.name,
                    model.power_type(),
                    expected
                )));
            }
        }
        Ok(())
    }
}
