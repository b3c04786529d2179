//! Vehicle model data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Length of every residual-value curve (years 1-10)
pub const RESIDUAL_YEARS: usize = 10;

/// Drivetrain of a catalog model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerType {
    /// Internal combustion, priced per liter of fuel
    Combustion,
    /// Battery electric, priced per kWh
    Electric,
}

impl PowerType {
    pub fn from_is_electric(is_electric: bool) -> Self {
        if is_electric {
            PowerType::Electric
        } else {
            PowerType::Combustion
        }
    }

    pub fn is_electric(&self) -> bool {
        matches!(self, PowerType::Electric)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerType::Combustion => "combustion",
            PowerType::Electric => "electric",
        }
    }
}

impl fmt::Display for PowerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PowerType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combustion" | "ice" => Ok(PowerType::Combustion),
            "electric" | "ev" => Ok(PowerType::Electric),
            other => Err(ModelError::InvalidArgument(format!(
                "Unknown power type: {}",
                other
            ))),
        }
    }
}

/// Consumption rates per 100 km, split by road type.
///
/// Only the rates matching the drivetrain exist, so a combustion model can
/// never carry kWh figures and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "power", rename_all = "lowercase")]
pub enum Consumption {
    Combustion {
        /// Liters per 100 km in city driving
        city_l_per_100km: f64,
        /// Liters per 100 km on the highway
        highway_l_per_100km: f64,
    },
    Electric {
        /// kWh per 100 km in city driving
        city_kwh_per_100km: f64,
        /// kWh per 100 km on the highway
        highway_kwh_per_100km: f64,
    },
}

impl Consumption {
    pub fn power_type(&self) -> PowerType {
        match self {
            Consumption::Combustion { .. } => PowerType::Combustion,
            Consumption::Electric { .. } => PowerType::Electric,
        }
    }

    /// (city, highway) rate in the drivetrain's own unit
    pub fn rates(&self) -> (f64, f64) {
        match *self {
            Consumption::Combustion { city_l_per_100km, highway_l_per_100km } => {
                (city_l_per_100km, highway_l_per_100km)
            }
            Consumption::Electric { city_kwh_per_100km, highway_kwh_per_100km } => {
                (city_kwh_per_100km, highway_kwh_per_100km)
            }
        }
    }

    /// Liters or kWh needed to cover the given city and highway distances
    pub fn units_for(&self, city_km: f64, highway_km: f64) -> f64 {
        let (city_rate, highway_rate) = self.rates();
        city_km / 100.0 * city_rate + highway_km / 100.0 * highway_rate
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleModel {
    pub name: String,

    pub consumption: Consumption,

    /// First-year insurance premium as a fraction of vehicle value
    pub insurance_rate: f64,

    /// Flat annual maintenance cost
    pub annual_maintenance: f64,

    /// Residual value as a fraction of new price, by age (year 1 = index 0)
    pub residual_values: [f64; RESIDUAL_YEARS],
}

impl VehicleModel {
    pub fn new(
        name: impl Into<String>,
        consumption: Consumption,
        insurance_rate: f64,
        annual_maintenance: f64,
        residual_values: [f64; RESIDUAL_YEARS],
    ) -> Self {
        Self {
            name: name.into(),
            consumption,
            insurance_rate,
            annual_maintenance,
            residual_values,
        }
    }

    pub fn power_type(&self) -> PowerType {
        self.consumption.power_type()
    }

    pub fn is_electric(&self) -> bool {
        self.power_type().is_electric()
    }

    /// Residual fraction for a model year (1-indexed).
    ///
    /// Years past the end of the curve use the last entry; year 0 is treated
    /// as year 1.
    pub fn residual_fraction(&self, year: u32) -> f64 {
        let idx = (year.saturating_sub(1) as usize).min(RESIDUAL_YEARS - 1);
        self.residual_values[idx]
    }

    /// Check the catalog invariants for this entry
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ModelError::InvalidCatalog(format!("{}: {}", self.name, msg)));

        if self.name.trim().is_empty() {
            return Err(ModelError::InvalidCatalog("model name is empty".to_string()));
        }

        let (city, highway) = self.consumption.rates();
        if !(city >= 0.0 && highway >= 0.0) {
            return invalid(format!("consumption rates must be non-negative ({}, {})", city, highway));
        }
        if !(self.insurance_rate >= 0.0) {
            return invalid(format!("insurance rate must be non-negative ({})", self.insurance_rate));
        }
        if !(self.annual_maintenance >= 0.0) {
            return invalid(format!("maintenance must be non-negative ({})", self.annual_maintenance));
        }

        let mut previous = 1.0;
        for (i, &fraction) in self.residual_values.iter().enumerate() {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return invalid(format!("residual value for year {} outside (0, 1]: {}", i + 1, fraction));
            }
            if fraction > previous {
                return invalid(format!("residual value increases in year {}", i + 1));
            }
            previous = fraction;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sedan() -> VehicleModel {
        VehicleModel::new(
            "Test Sedan",
            Consumption::Combustion { city_l_per_100km: 8.0, highway_l_per_100km: 6.0 },
            0.025,
            2000.0,
            [0.82, 0.70, 0.60, 0.52, 0.45, 0.40, 0.36, 0.33, 0.30, 0.28],
        )
    }

    #[test]
    fn test_residual_fraction_clamps() {
        let model = sedan();
        assert_relative_eq!(model.residual_fraction(1), 0.82);
        assert_relative_eq!(model.residual_fraction(4), 0.52);
        assert_relative_eq!(model.residual_fraction(10), 0.28);
        assert_relative_eq!(model.residual_fraction(15), 0.28);
        assert_relative_eq!(model.residual_fraction(0), 0.82);
    }

    #[test]
    fn test_units_for_distance() {
        let model = sedan();
        // 1000 km city at 8 L + 500 km highway at 6 L
        assert_relative_eq!(model.consumption.units_for(1000.0, 500.0), 110.0);
    }

    #[test]
    fn test_validate_rejects_rising_curve() {
        let mut model = sedan();
        model.residual_values[3] = 0.65;
        assert!(matches!(model.validate(), Err(ModelError::InvalidCatalog(_))));
    }

    #[test]
    fn test_validate_rejects_zero_residual() {
        let mut model = sedan();
        model.residual_values[9] = 0.0;
        assert!(model.validate().is_err());
        assert!(sedan().validate().is_ok());
    }

    #[test]
    fn test_power_type_parse() {
        assert_eq!("Electric".parse::<PowerType>().unwrap(), PowerType::Electric);
        assert_eq!("ice".parse::<PowerType>().unwrap(), PowerType::Combustion);
        assert!("diesel".parse::<PowerType>().is_err());
    }
}
