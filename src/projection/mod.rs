//! Projection engine for yearly ownership cashflows

mod cashflows;
mod discount;
mod engine;
mod mileage;
mod window;

pub use cashflows::{CashflowRow, CashflowTable, TableSummary};
pub use discount::DiscountCurve;
pub use engine::{purchase_price, ProjectionEngine, ProjectionRequest};
pub use mileage::{MileageProfile, WEEKEND_DAYS, WEEKS_PER_YEAR};
pub use window::{OwnershipWindow, HORIZON_YEARS};
