//! Vehicle catalog: consumption, insurance, maintenance and depreciation data

mod data;
pub mod loader;

pub use data::{Consumption, PowerType, VehicleModel, RESIDUAL_YEARS};
pub use loader::{load_catalog, load_catalog_from_reader};

use crate::error::{ModelError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Immutable lookup table of vehicle models, in insertion order
#[derive(Debug, Clone)]
pub struct VehicleCatalog {
    models: Vec<VehicleModel>,
}

impl VehicleCatalog {
    /// Build a catalog, validating every entry and rejecting duplicate names
    pub fn from_models(models: Vec<VehicleModel>) -> Result<Self> {
        let mut seen = HashSet::new();
        for model in &models {
            model.validate()?;
            if !seen.insert(model.name.as_str()) {
                return Err(ModelError::InvalidCatalog(format!(
                    "duplicate model name: {}",
                    model.name
                )));
            }
        }
        Ok(Self { models })
    }

    /// Load a catalog from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Self::from_models(load_catalog(path)?)
    }

    /// Load a catalog from CSV text in any reader
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Self::from_models(load_catalog_from_reader(reader)?)
    }

    /// The ten reference models shipped with the model
    pub fn reference() -> Self {
        let ice = |city, highway| Consumption::Combustion {
            city_l_per_100km: city,
            highway_l_per_100km: highway,
        };
        let ev = |city, highway| Consumption::Electric {
            city_kwh_per_100km: city,
            highway_kwh_per_100km: highway,
        };

        let models = vec![
            VehicleModel::new(
                "Toyota Camry",
                ice(8.2, 6.4),
                0.025,
                2000.0,
                [0.82, 0.70, 0.60, 0.52, 0.45, 0.40, 0.36, 0.33, 0.30, 0.28],
            ),
            VehicleModel::new(
                "Tesla Model 3",
                ev(14.0, 17.0),
                0.032,
                300.0,
                [0.80, 0.68, 0.58, 0.51, 0.45, 0.40, 0.36, 0.33, 0.30, 0.28],
            ),
            VehicleModel::new(
                "Honda Accord",
                ice(8.0, 6.2),
                0.025,
                2000.0,
                [0.80, 0.68, 0.58, 0.50, 0.44, 0.39, 0.35, 0.32, 0.29, 0.27],
            ),
            VehicleModel::new(
                "Volkswagen Passat",
                ice(8.5, 6.6),
                0.026,
                2200.0,
                [0.78, 0.65, 0.55, 0.48, 0.42, 0.37, 0.33, 0.30, 0.27, 0.25],
            ),
            VehicleModel::new(
                "BYD Qin PLUS DM-i",
                ice(4.5, 4.0),
                0.024,
                1800.0,
                [0.75, 0.63, 0.54, 0.47, 0.41, 0.36, 0.32, 0.29, 0.26, 0.24],
            ),
            VehicleModel::new(
                "Toyota RAV4",
                ice(9.0, 7.0),
                0.027,
                2300.0,
                [0.80, 0.68, 0.58, 0.50, 0.44, 0.39, 0.35, 0.32, 0.29, 0.27],
            ),
            VehicleModel::new(
                "BYD Seal",
                ev(13.5, 16.5),
                0.030,
                300.0,
                [0.78, 0.66, 0.57, 0.50, 0.44, 0.39, 0.35, 0.32, 0.29, 0.27],
            ),
            VehicleModel::new(
                "XPeng P7",
                ev(14.5, 18.0),
                0.033,
                350.0,
                [0.77, 0.65, 0.55, 0.48, 0.42, 0.37, 0.33, 0.30, 0.27, 0.25],
            ),
            VehicleModel::new(
                "NIO ET5",
                ev(15.5, 19.0),
                0.035,
                400.0,
                [0.75, 0.63, 0.53, 0.46, 0.40, 0.35, 0.31, 0.28, 0.25, 0.23],
            ),
            VehicleModel::new(
                "Li Auto L7",
                ev(18.0, 21.0),
                0.034,
                450.0,
                [0.78, 0.66, 0.57, 0.50, 0.44, 0.39, 0.35, 0.32, 0.29, 0.27],
            ),
        ];

        Self { models }
    }

    /// Look up a model by exact name
    pub fn get(&self, name: &str) -> Result<&VehicleModel> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ModelError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.iter().any(|m| m.name == name)
    }

    pub fn models(&self) -> &[VehicleModel] {
        &self.models
    }

    /// Models with the given drivetrain
    pub fn by_power(&self, power: PowerType) -> impl Iterator<Item = &VehicleModel> + '_ {
        self.models.iter().filter(move |m| m.power_type() == power)
    }

    /// Names of models with the given drivetrain, for selection lists
    pub fn names(&self, power: PowerType) -> Vec<&str> {
        self.by_power(power).map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for VehicleCatalog {
    fn default() -> Self {
        Self::reference()
    }
}
