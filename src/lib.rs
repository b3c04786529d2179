//! Vehicle TCO - ownership cash-flow projection for combustion vs electric vehicles
//!
//! This library provides:
//! - A vehicle catalog with consumption, insurance, maintenance and depreciation data
//! - A ten-year yearly cashflow projection with NPV discounting
//! - Head-to-head comparisons and sensitivity sweeps (mileage, purchase year, hold duration)
//! - CSV / JSON export of projection results

pub mod catalog;
pub mod config;
pub mod error;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use catalog::{PowerType, VehicleCatalog, VehicleModel};
pub use config::{ModelConfig, ScenarioParameters, VehicleChoice};
pub use error::{ModelError, Result};
pub use projection::{CashflowRow, CashflowTable, OwnershipWindow, ProjectionEngine, ProjectionRequest};
pub use scenario::ScenarioRunner;
