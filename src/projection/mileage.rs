//! Annual mileage and its city/highway split

use serde::{Deserialize, Serialize};

use crate::config::ScenarioParameters;

pub const WEEKS_PER_YEAR: f64 = 52.0;
pub const WEEKEND_DAYS: f64 = 2.0;

/// Distances driven in one year of ownership
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MileageProfile {
    /// Total annual distance (km)
    pub annual_km: f64,
    /// City portion (km)
    pub city_km: f64,
    /// Highway portion (km)
    pub highway_km: f64,
    /// Annual distance used to scale EV energy cost (km)
    pub ev_annual_km: f64,
}

impl MileageProfile {
    /// Mileage derived from the commute and weekend pattern
    pub fn baseline(params: &ScenarioParameters) -> Self {
        let weekday_km = params.weekday_commute_days * params.weekday_distance_km * WEEKS_PER_YEAR;
        let weekend_km = WEEKEND_DAYS * params.weekend_distance_km * WEEKS_PER_YEAR;
        let annual_km = weekday_km + weekend_km;

        let highway_km = weekday_km * params.weekday_highway_fraction
            + weekend_km * params.weekend_highway_fraction;

        Self {
            annual_km,
            city_km: annual_km - highway_km,
            highway_km,
            ev_annual_km: inflate(annual_km, params),
        }
    }

    /// Baseline mileage, replaced by `override_km` when it is positive
    pub fn resolve(params: &ScenarioParameters, override_km: Option<f64>) -> Self {
        let baseline = Self::baseline(params);
        match override_km {
            Some(km) if km > 0.0 => baseline.rescaled(km, params),
            _ => baseline,
        }
    }

    /// Rescale to a new annual total, keeping the city/highway proportions
    pub fn rescaled(&self, annual_km: f64, params: &ScenarioParameters) -> Self {
        let scale = if self.annual_km > 0.0 {
            annual_km / self.annual_km
        } else {
            1.0
        };

        Self {
            annual_km,
            city_km: self.city_km * scale,
            highway_km: self.highway_km * scale,
            ev_annual_km: inflate(annual_km, params),
        }
    }

    /// EV mileage relative to the base mileage; 0 when nothing is driven
    pub fn ev_energy_ratio(&self) -> f64 {
        if self.annual_km > 0.0 {
            self.ev_annual_km / self.annual_km
        } else {
            0.0
        }
    }
}

fn inflate(annual_km: f64, params: &ScenarioParameters) -> f64 {
    if params.apply_ev_mileage_inflation {
        annual_km * params.ev_mileage_inflation
    } else {
        annual_km
    }
}
