//! Core projection engine for yearly ownership cashflows

use serde::{Deserialize, Serialize};

use super::cashflows::{CashflowRow, CashflowTable};
use super::discount::DiscountCurve;
use super::mileage::MileageProfile;
use super::window::{OwnershipWindow, HORIZON_YEARS};
use crate::catalog::{PowerType, VehicleCatalog, VehicleModel};
use crate::config::{ScenarioParameters, VehicleChoice};
use crate::error::{ModelError, Result};

/// Insurance multiplier for year 2 (one claim-free year)
const INSURANCE_YEAR_2_FACTOR: f64 = 0.90;
/// Insurance multiplier from year 3 on
const INSURANCE_STABLE_FACTOR: f64 = 0.85;

/// Arguments for one projection call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub vehicle: String,
    pub new_price: f64,
    pub start_year: u32,
    pub end_year: u32,
    pub is_electric: bool,
    /// Replaces the scenario mileage when positive
    pub override_annual_mileage: Option<f64>,
}

impl ProjectionRequest {
    pub fn new(
        vehicle: impl Into<String>,
        new_price: f64,
        start_year: u32,
        end_year: u32,
        is_electric: bool,
    ) -> Self {
        Self {
            vehicle: vehicle.into(),
            new_price,
            start_year,
            end_year,
            is_electric,
            override_annual_mileage: None,
        }
    }

    /// Request for a configured vehicle choice
    pub fn from_choice(choice: &VehicleChoice, is_electric: bool) -> Self {
        Self::new(
            choice.model.clone(),
            choice.new_price,
            choice.start_year,
            choice.end_year,
            is_electric,
        )
    }

    pub fn with_override_mileage(mut self, annual_km: Option<f64>) -> Self {
        self.override_annual_mileage = annual_km;
        self
    }

    pub fn with_window(mut self, window: OwnershipWindow) -> Self {
        self.start_year = window.start_year();
        self.end_year = window.end_year();
        self
    }
}

/// Projection engine over a catalog and one immutable scenario
#[derive(Debug, Clone, Copy)]
pub struct ProjectionEngine<'a> {
    catalog: &'a VehicleCatalog,
    params: &'a ScenarioParameters,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(catalog: &'a VehicleCatalog, params: &'a ScenarioParameters) -> Self {
        Self { catalog, params }
    }

    pub fn params(&self) -> &ScenarioParameters {
        self.params
    }

    /// Project ten years of cashflows for one vehicle.
    ///
    /// Fails with `NotFound` for an unknown model and `InvalidArgument` for a
    /// drivetrain mismatch or a window outside years 1-10.
    pub fn project(&self, request: &ProjectionRequest) -> Result<CashflowTable> {
        let model = self.catalog.get(&request.vehicle)?;

        let requested = PowerType::from_is_electric(request.is_electric);
        if model.power_type() != requested {
            return Err(ModelError::InvalidArgument(format!(
                "{} is a {} model, requested {}",
                model.name,
                model.power_type(),
                requested
            )));
        }

        let window = OwnershipWindow::new(request.start_year, request.end_year)?;
        let mileage = MileageProfile::resolve(self.params, request.override_annual_mileage);

        log::debug!(
            "Projecting {} ({}) years {}-{} at {:.0} km/yr",
            model.name,
            requested,
            window.start_year(),
            window.end_year(),
            mileage.annual_km
        );

        Ok(self.project_model(model, request.new_price, window, &mileage))
    }

    /// Project a validated model and window with a resolved mileage profile
    pub fn project_model(
        &self,
        model: &VehicleModel,
        new_price: f64,
        window: OwnershipWindow,
        mileage: &MileageProfile,
    ) -> CashflowTable {
        let price = purchase_price(model, new_price, window);
        let annual_energy = self.annual_energy_cost(model, mileage);

        let rows = (1..=HORIZON_YEARS)
            .map(|year| self.calculate_year(model, price, annual_energy, window, mileage, year))
            .collect();

        CashflowTable::from_rows(
            model.name.clone(),
            model.power_type(),
            window,
            rows,
            &DiscountCurve::single_rate(self.params.discount_rate),
        )
    }

    /// Components for a single year; net and discounted columns are filled by the table
    fn calculate_year(
        &self,
        model: &VehicleModel,
        price: f64,
        annual_energy: f64,
        window: OwnershipWindow,
        mileage: &MileageProfile,
        year: u32,
    ) -> CashflowRow {
        let mut row = CashflowRow::new(year);

        if year == window.start_year() {
            row.purchase = -price;
        }

        if window.contains(year) {
            let vehicle_value = price * model.residual_fraction(year);
            row.insurance = -vehicle_value * model.insurance_rate * insurance_factor(year);

            row.energy = -annual_energy;
            row.maintenance = -model.annual_maintenance;
            row.toll = -mileage.highway_km * self.params.toll_rate_per_km;
            row.parking = -self.params.annual_parking_fee;
            row.fine = -self.params.annual_fine;
            if !model.is_electric() {
                row.plate_levy = -self.params.annual_plate_levy;
            }
        }

        if year == window.end_year() {
            row.resale = price * model.residual_fraction(year);
        }

        row
    }

    /// Fuel or electricity spend for one year of use (positive amount)
    fn annual_energy_cost(&self, model: &VehicleModel, mileage: &MileageProfile) -> f64 {
        let units = model.consumption.units_for(mileage.city_km, mileage.highway_km);
        if model.is_electric() {
            units * self.params.blended_charging_price() * mileage.ev_energy_ratio()
        } else {
            units * self.params.fuel_price
        }
    }
}

/// New price in year 1, otherwise the depreciated price at the start year
pub fn purchase_price(model: &VehicleModel, new_price: f64, window: OwnershipWindow) -> f64 {
    if window.is_used_purchase() {
        new_price * model.residual_fraction(window.start_year())
    } else {
        new_price
    }
}

/// Claim-frequency decay on the insurance premium
fn insurance_factor(year: u32) -> f64 {
    match year {
        0 | 1 => 1.0,
        2 => INSURANCE_YEAR_2_FACTOR,
        _ => INSURANCE_STABLE_FACTOR,
    }
}
