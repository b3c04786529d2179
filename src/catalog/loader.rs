//! Load vehicle models from a catalog CSV
//!
//! Expected columns:
//! `name,power,city_rate,highway_rate,insurance_rate,maintenance,residual_1..residual_10`
//! where `power` is `combustion` or `electric` and the two rates are L/100km
//! or kWh/100km accordingly.

use super::{Consumption, PowerType, VehicleModel};
use crate::error::{ModelError, Result};
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the catalog columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    name: String,
    power: String,
    city_rate: f64,
    highway_rate: f64,
    insurance_rate: f64,
    maintenance: f64,
    residual_1: f64,
    residual_2: f64,
    residual_3: f64,
    residual_4: f64,
    residual_5: f64,
    residual_6: f64,
    residual_7: f64,
    residual_8: f64,
    residual_9: f64,
    residual_10: f64,
}

impl CsvRow {
    fn into_model(self) -> Result<VehicleModel> {
        let power: PowerType = self.power.parse().map_err(|_| {
            ModelError::InvalidCatalog(format!("{}: unknown power type '{}'", self.name, self.power))
        })?;

        let consumption = match power {
            PowerType::Combustion => Consumption::Combustion {
                city_l_per_100km: self.city_rate,
                highway_l_per_100km: self.highway_rate,
            },
            PowerType::Electric => Consumption::Electric {
                city_kwh_per_100km: self.city_rate,
                highway_kwh_per_100km: self.highway_rate,
            },
        };

        let model = VehicleModel::new(
            self.name.trim(),
            consumption,
            self.insurance_rate,
            self.maintenance,
            [
                self.residual_1,
                self.residual_2,
                self.residual_3,
                self.residual_4,
                self.residual_5,
                self.residual_6,
                self.residual_7,
                self.residual_8,
                self.residual_9,
                self.residual_10,
            ],
        );
        model.validate()?;
        Ok(model)
    }
}

/// Load all models from a catalog CSV file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleModel>> {
    let path = path.as_ref();
    log::debug!("Loading vehicle catalog from {}", path.display());
    let reader = Reader::from_path(path)?;
    read_models(reader)
}

/// Load models from any reader (e.g., string buffer)
pub fn load_catalog_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<VehicleModel>> {
    read_models(Reader::from_reader(reader))
}

fn read_models<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<VehicleModel>> {
    let mut models = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        models.push(row.into_model()?);
    }

    if models.is_empty() {
        return Err(ModelError::InvalidCatalog("catalog contains no models".to_string()));
    }

    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,power,city_rate,highway_rate,insurance_rate,maintenance,\
        residual_1,residual_2,residual_3,residual_4,residual_5,\
        residual_6,residual_7,residual_8,residual_9,residual_10\n";

    #[test]
    fn test_load_from_reader() {
        let data = format!(
            "{}{}{}",
            HEADER,
            "Sedan A,combustion,8.2,6.4,0.025,2000,0.82,0.70,0.60,0.52,0.45,0.40,0.36,0.33,0.30,0.28\n",
            "Hatch E,electric,14,17,0.032,300,0.80,0.68,0.58,0.51,0.45,0.40,0.36,0.33,0.30,0.28\n",
        );

        let models = load_catalog_from_reader(data.as_bytes()).expect("catalog should parse");
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "Sedan A");
        assert_eq!(models[0].power_type(), PowerType::Combustion);
        assert_eq!(models[1].consumption.rates(), (14.0, 17.0));
        assert!(models[1].is_electric());
        assert_eq!(models[1].residual_values[3], 0.51);
    }

    #[test]
    fn test_unknown_power_rejected() {
        let data = format!(
            "{}{}",
            HEADER,
            "Odd,steam,8,6,0.02,100,0.9,0.8,0.7,0.6,0.5,0.4,0.3,0.2,0.1,0.1\n"
        );
        let err = load_catalog_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidCatalog(_)));
    }

    #[test]
    fn test_short_row_is_csv_error() {
        let data = format!("{}{}", HEADER, "Short,electric,14,17,0.03,300,0.8,0.7\n");
        let err = load_catalog_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::Csv(_)));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(load_catalog_from_reader(HEADER.as_bytes()).is_err());
    }
}
