//! Cashflow output structures for projections

use serde::{Deserialize, Serialize};

use super::discount::DiscountCurve;
use super::window::OwnershipWindow;
use crate::catalog::PowerType;

/// A single year of projection output. Outlays are negative, resale positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    pub year: u32,

    // Components
    pub purchase: f64,
    pub energy: f64,
    pub insurance: f64,
    pub maintenance: f64,
    pub toll: f64,
    pub parking: f64,
    pub plate_levy: f64,
    pub fine: f64,
    pub resale: f64,

    // Summary
    pub net_cashflow: f64,
    pub cumulative_cashflow: f64,
    pub discounted_cashflow: f64,
}

impl CashflowRow {
    /// Create an empty row for the given year
    pub fn new(year: u32) -> Self {
        Self {
            year,
            purchase: 0.0,
            energy: 0.0,
            insurance: 0.0,
            maintenance: 0.0,
            toll: 0.0,
            parking: 0.0,
            plate_levy: 0.0,
            fine: 0.0,
            resale: 0.0,
            net_cashflow: 0.0,
            cumulative_cashflow: 0.0,
            discounted_cashflow: 0.0,
        }
    }

    /// Sum of every component for the year
    pub fn component_total(&self) -> f64 {
        self.purchase
            + self.energy
            + self.insurance
            + self.maintenance
            + self.toll
            + self.parking
            + self.plate_levy
            + self.fine
            + self.resale
    }

    /// Sum of the recurring running costs (everything except purchase and resale)
    pub fn running_costs(&self) -> f64 {
        self.energy
            + self.insurance
            + self.maintenance
            + self.toll
            + self.parking
            + self.plate_levy
            + self.fine
    }
}

/// Complete projection for one vehicle over the model horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowTable {
    pub vehicle: String,
    pub power_type: PowerType,
    pub window: OwnershipWindow,
    pub rows: Vec<CashflowRow>,
}

impl CashflowTable {
    /// Build a table, filling the net, cumulative and discounted columns
    pub fn from_rows(
        vehicle: impl Into<String>,
        power_type: PowerType,
        window: OwnershipWindow,
        mut rows: Vec<CashflowRow>,
        curve: &DiscountCurve,
    ) -> Self {
        let mut cumulative = 0.0;
        for row in rows.iter_mut() {
            row.net_cashflow = row.component_total();
            cumulative += row.net_cashflow;
            row.cumulative_cashflow = cumulative;
            row.discounted_cashflow = curve.discount(row.net_cashflow, row.year);
        }

        Self {
            vehicle: vehicle.into(),
            power_type,
            window,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, year: u32) -> Option<&CashflowRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    /// Net present value: sum of the discounted column
    pub fn npv(&self) -> f64 {
        self.rows.iter().map(|r| r.discounted_cashflow).sum()
    }

    /// Total cost of ownership in present-value terms (positive for a net cost)
    pub fn total_cost(&self) -> f64 {
        -self.npv()
    }

    pub fn net_cashflows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.net_cashflow).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> TableSummary {
        let sum = |f: fn(&CashflowRow) -> f64| -> f64 { self.rows.iter().map(f).sum() };

        TableSummary {
            vehicle: self.vehicle.clone(),
            power_type: self.power_type,
            start_year: self.window.start_year(),
            end_year: self.window.end_year(),
            total_purchase: sum(|r| r.purchase),
            total_energy: sum(|r| r.energy),
            total_insurance: sum(|r| r.insurance),
            total_maintenance: sum(|r| r.maintenance),
            total_toll: sum(|r| r.toll),
            total_parking: sum(|r| r.parking),
            total_plate_levy: sum(|r| r.plate_levy),
            total_fine: sum(|r| r.fine),
            total_resale: sum(|r| r.resale),
            total_net_cf: sum(|r| r.net_cashflow),
            npv: self.npv(),
        }
    }
}

/// Per-component totals for a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub vehicle: String,
    pub power_type: PowerType,
    pub start_year: u32,
    pub end_year: u32,
    pub total_purchase: f64,
    pub total_energy: f64,
    pub total_insurance: f64,
    pub total_maintenance: f64,
    pub total_toll: f64,
    pub total_parking: f64,
    pub total_plate_levy: f64,
    pub total_fine: f64,
    pub total_resale: f64,
    pub total_net_cf: f64,
    pub npv: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_table() -> CashflowTable {
        let window = OwnershipWindow::new(1, 2).unwrap();
        let mut first = CashflowRow::new(1);
        first.purchase = -100_000.0;
        first.energy = -5_000.0;
        let mut second = CashflowRow::new(2);
        second.energy = -5_000.0;
        second.resale = 70_000.0;
        let rows = vec![first, second, CashflowRow::new(3)];

        CashflowTable::from_rows("Test", PowerType::Electric, window, rows, &DiscountCurve::single_rate(0.10))
    }

    #[test]
    fn test_derived_columns() {
        let table = sample_table();
        assert_relative_eq!(table.rows[0].net_cashflow, -105_000.0);
        assert_relative_eq!(table.rows[1].net_cashflow, 65_000.0);
        assert_relative_eq!(table.rows[1].cumulative_cashflow, -40_000.0);
        assert_relative_eq!(table.rows[2].cumulative_cashflow, -40_000.0);
        assert_relative_eq!(table.rows[0].discounted_cashflow, -105_000.0);
        assert_relative_eq!(table.rows[1].discounted_cashflow, 65_000.0 / 1.1);
    }

    #[test]
    fn test_npv_and_summary() {
        let table = sample_table();
        let expected = -105_000.0 + 65_000.0 / 1.1;
        assert_relative_eq!(table.npv(), expected);
        assert_relative_eq!(table.total_cost(), -expected);

        let summary = table.summary();
        assert_relative_eq!(summary.total_energy, -10_000.0);
        assert_relative_eq!(summary.total_resale, 70_000.0);
        assert_relative_eq!(summary.total_net_cf, -40_000.0);
        assert_eq!(summary.end_year, 2);
    }

    #[test]
    fn test_running_costs_exclude_capital() {
        let table = sample_table();
        assert_relative_eq!(table.rows[0].running_costs(), -5_000.0);
        assert!(table.row(2).is_some());
        assert!(table.row(11).is_none());
    }
}
