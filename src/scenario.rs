//! Scenario runner for comparisons and sensitivity sweeps
//!
//! Holds the catalog and run configuration once, then drives the projection
//! engine repeatedly. Nothing here models costs; every number comes from
//! `ProjectionEngine::project`.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::catalog::VehicleCatalog;
use crate::config::ModelConfig;
use crate::error::{ModelError, Result};
use crate::projection::{CashflowTable, OwnershipWindow, ProjectionEngine, ProjectionRequest, HORIZON_YEARS};

/// Default mileage grid for the sensitivity sweep (km/yr)
pub const DEFAULT_MILEAGE_FROM: f64 = 5_000.0;
pub const DEFAULT_MILEAGE_TO: f64 = 40_000.0;
pub const DEFAULT_MILEAGE_STEP: f64 = 2_500.0;

/// Default cost difference below which neither vehicle is preferred
pub const DEFAULT_DECISION_THRESHOLD: f64 = 2_000.0;

/// Which vehicle a cost difference favors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Combustion,
    Electric,
    /// Difference within the threshold
    Either,
}

impl Choice {
    /// `difference` is combustion cost minus electric cost
    ///
    /// A tie needs `|difference| < threshold`; an exact zero is always a tie.
    pub fn from_difference(difference: f64, threshold: f64) -> Self {
        if difference.abs() < threshold || difference == 0.0 {
            Choice::Either
        } else if difference > 0.0 {
            Choice::Electric
        } else {
            Choice::Combustion
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Combustion => "combustion",
            Choice::Electric => "electric",
            Choice::Either => "either",
        }
    }
}

/// Head-to-head projection of the configured vehicles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub combustion: CashflowTable,
    pub electric: CashflowTable,
}

impl Comparison {
    /// Combustion cost minus electric cost; positive means the EV is cheaper
    pub fn advantage(&self) -> f64 {
        self.combustion.total_cost() - self.electric.total_cost()
    }

    pub fn cheaper(&self) -> Choice {
        Choice::from_difference(self.advantage(), 0.0)
    }
}

/// One point of the mileage sensitivity sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MileagePoint {
    pub annual_km: f64,
    pub combustion_cost: f64,
    pub electric_cost: f64,
    /// Combustion cost minus electric cost
    pub difference: f64,
}

/// One point of the used-combustion vs new-electric sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsedVsNewPoint {
    pub hold_years: u32,
    pub combustion_start_year: u32,
    pub combustion_cost: f64,
    pub electric_cost: f64,
    /// Combustion cost minus electric cost
    pub difference: f64,
}

/// One cell of the start-year x hold-years decision grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionCell {
    pub start_year: u32,
    pub hold_years: u32,
    /// Combustion cost minus electric cost; None past the model horizon
    pub difference: Option<f64>,
    pub choice: Option<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionGrid {
    pub threshold: f64,
    /// Row-major by start year, then hold years
    pub cells: Vec<DecisionCell>,
}

impl DecisionGrid {
    pub fn cell(&self, start_year: u32, hold_years: u32) -> Option<&DecisionCell> {
        self.cells
            .iter()
            .find(|c| c.start_year == start_year && c.hold_years == hold_years)
    }

    /// Count of populated cells favoring `choice`
    pub fn count(&self, choice: Choice) -> usize {
        self.cells.iter().filter(|c| c.choice == Some(choice)).count()
    }
}

/// Inclusive mileage grid `from..=to` in `step` increments
pub fn mileage_range(from: f64, to: f64, step: f64) -> Result<Vec<f64>> {
    if !(step > 0.0) || !(from > 0.0) || to < from {
        return Err(ModelError::InvalidArgument(format!(
            "invalid mileage range {}..={} step {}",
            from, to, step
        )));
    }
    let count = ((to - from) / step + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|i| from + step * i as f64).collect())
}

/// Point where the two vehicles cost closest to the same
pub fn breakeven(points: &[MileagePoint]) -> Option<&MileagePoint> {
    points
        .iter()
        .min_by(|a, b| a.difference.abs().total_cmp(&b.difference.abs()))
}

/// Pre-loaded scenario runner
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    catalog: VehicleCatalog,
    config: ModelConfig,
}

impl ScenarioRunner {
    /// Reference catalog and default configuration
    pub fn new() -> Self {
        Self {
            catalog: VehicleCatalog::reference(),
            config: ModelConfig::default(),
        }
    }

    /// Runner over a specific catalog and config, both checked up front
    pub fn with_config(catalog: VehicleCatalog, config: ModelConfig) -> Result<Self> {
        config.scenario.validate()?;
        config.check_against(&catalog)?;
        Ok(Self { catalog, config })
    }

    pub fn catalog(&self) -> &VehicleCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Engine borrowing the current scenario
    pub fn engine(&self) -> ProjectionEngine<'_> {
        ProjectionEngine::new(&self.catalog, &self.config.scenario)
    }

    /// Run a single projection
    pub fn run(&self, request: &ProjectionRequest) -> Result<CashflowTable> {
        self.engine().project(request)
    }

    /// Project both configured vehicles with their configured windows
    pub fn compare(&self, override_annual_mileage: Option<f64>) -> Result<Comparison> {
        let engine = self.engine();
        let combustion = engine.project(
            &ProjectionRequest::from_choice(&self.config.combustion, false)
                .with_override_mileage(override_annual_mileage),
        )?;
        let electric = engine.project(
            &ProjectionRequest::from_choice(&self.config.electric, true)
                .with_override_mileage(override_annual_mileage),
        )?;

        let comparison = Comparison { combustion, electric };
        log::info!(
            "Compared {} vs {}: advantage {:.0} ({})",
            self.config.combustion.model,
            self.config.electric.model,
            comparison.advantage(),
            comparison.cheaper().as_str()
        );
        Ok(comparison)
    }

    /// Project both vehicles over `window` at each annual mileage
    pub fn mileage_sweep(&self, mileages: &[f64], window: OwnershipWindow) -> Result<Vec<MileagePoint>> {
        log::info!(
            "Mileage sweep over {} points, years {}-{}",
            mileages.len(),
            window.start_year(),
            window.end_year()
        );
        let engine = self.engine();
        let combustion = ProjectionRequest::from_choice(&self.config.combustion, false).with_window(window);
        let electric = ProjectionRequest::from_choice(&self.config.electric, true).with_window(window);

        mileages
            .iter()
            .map(|&km| -> Result<MileagePoint> {
                let combustion_cost = engine
                    .project(&combustion.clone().with_override_mileage(Some(km)))?
                    .total_cost();
                let electric_cost = engine
                    .project(&electric.clone().with_override_mileage(Some(km)))?
                    .total_cost();
                Ok(MileagePoint {
                    annual_km: km,
                    combustion_cost,
                    electric_cost,
                    difference: combustion_cost - electric_cost,
                })
            })
            .collect()
    }

    /// New EV held `h` years against a combustion car bought in year `s` and
    /// held the same `h` years. Windows that run past the horizon are skipped.
    pub fn used_vs_new_sweep(
        &self,
        hold_years: RangeInclusive<u32>,
        start_years: RangeInclusive<u32>,
    ) -> Result<Vec<UsedVsNewPoint>> {
        let engine = self.engine();
        let mut points = Vec::new();
        let mut skipped = 0u64;

        let first_hold = (*hold_years.start()).max(1);
        let last_hold = (*hold_years.end()).min(HORIZON_YEARS);
        if *hold_years.end() > last_hold {
            log::info!(
                "Used-vs-new sweep skipped holds {}..={} longer than the {}-year horizon",
                (last_hold + 1).max(first_hold),
                hold_years.end(),
                HORIZON_YEARS
            );
        }

        for hold in first_hold..=last_hold {
            let electric_window = OwnershipWindow::held_for(1, hold)?;
            let electric_cost = engine
                .project(&ProjectionRequest::from_choice(&self.config.electric, true).with_window(electric_window))?
                .total_cost();

            // Latest purchase year whose hold still ends by the horizon
            let latest_start = HORIZON_YEARS - hold + 1;
            skipped += u64::from(
                start_years
                    .end()
                    .saturating_sub(latest_start.max(start_years.start().saturating_sub(1))),
            );

            for start in (*start_years.start()).max(1)..=(*start_years.end()).min(latest_start) {
                let window = OwnershipWindow::held_for(start, hold)?;
                let combustion_cost = engine
                    .project(&ProjectionRequest::from_choice(&self.config.combustion, false).with_window(window))?
                    .total_cost();

                points.push(UsedVsNewPoint {
                    hold_years: hold,
                    combustion_start_year: start,
                    combustion_cost,
                    electric_cost,
                    difference: combustion_cost - electric_cost,
                });
            }
        }

        if skipped > 0 {
            log::info!("Used-vs-new sweep skipped {} windows past year {}", skipped, HORIZON_YEARS);
        }
        Ok(points)
    }

    /// Both vehicles bought in start year x and held y years, for x and y in 1..=10
    pub fn decision_grid(&self, threshold: f64) -> Result<DecisionGrid> {
        if !(threshold >= 0.0) {
            return Err(ModelError::InvalidArgument(format!(
                "decision threshold must be non-negative, got {}",
                threshold
            )));
        }

        let engine = self.engine();
        let mut cells = Vec::with_capacity((HORIZON_YEARS * HORIZON_YEARS) as usize);

        for start in 1..=HORIZON_YEARS {
            for hold in 1..=HORIZON_YEARS {
                let mut cell = DecisionCell {
                    start_year: start,
                    hold_years: hold,
                    difference: None,
                    choice: None,
                };

                if OwnershipWindow::fits(start, hold) {
                    let window = OwnershipWindow::held_for(start, hold)?;
                    let combustion_cost = engine
                        .project(&ProjectionRequest::from_choice(&self.config.combustion, false).with_window(window))?
                        .total_cost();
                    let electric_cost = engine
                        .project(&ProjectionRequest::from_choice(&self.config.electric, true).with_window(window))?
                        .total_cost();
                    let difference = combustion_cost - electric_cost;
                    cell.difference = Some(difference);
                    cell.choice = Some(Choice::from_difference(difference, threshold));
                }

                cells.push(cell);
            }
        }

        log::info!("Decision grid complete ({} cells, threshold {:.0})", cells.len(), threshold);
        Ok(DecisionGrid { threshold, cells })
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioParameters;
    use approx::assert_relative_eq;

    #[test]
    fn test_compare_matches_direct_projection() {
        let runner = ScenarioRunner::new();
        let comparison = runner.compare(None).unwrap();

        let direct = runner
            .run(&ProjectionRequest::new("Toyota Camry", 200_000.0, 4, 8, false))
            .unwrap();
        assert_relative_eq!(comparison.combustion.npv(), direct.npv());
        assert_relative_eq!(
            comparison.advantage(),
            comparison.combustion.total_cost() - comparison.electric.total_cost()
        );
        assert_eq!(comparison.electric.window, OwnershipWindow::new(4, 8).unwrap());
    }

    #[test]
    fn test_mileage_range() {
        let grid = mileage_range(DEFAULT_MILEAGE_FROM, DEFAULT_MILEAGE_TO, DEFAULT_MILEAGE_STEP).unwrap();
        assert_eq!(grid.len(), 15);
        assert_eq!(grid[0], 5_000.0);
        assert_eq!(*grid.last().unwrap(), 40_000.0);

        assert!(mileage_range(5_000.0, 1_000.0, 500.0).is_err());
        assert!(mileage_range(5_000.0, 10_000.0, 0.0).is_err());
    }

    #[test]
    fn test_mileage_sweep_ev_gains_with_distance() {
        let runner = ScenarioRunner::new();
        let grid = mileage_range(5_000.0, 40_000.0, 5_000.0).unwrap();
        let window = OwnershipWindow::new(1, 5).unwrap();
        let points = runner.mileage_sweep(&grid, window).unwrap();

        assert_eq!(points.len(), grid.len());
        // Combustion running cost per km exceeds the EV's, so the gap widens
        for pair in points.windows(2) {
            assert!(pair[1].difference > pair[0].difference);
            assert!(pair[1].combustion_cost > pair[0].combustion_cost);
        }
        let best = breakeven(&points).unwrap();
        assert!(points.iter().all(|p| p.difference.abs() >= best.difference.abs()));
    }

    #[test]
    fn test_used_vs_new_skips_past_horizon() {
        let runner = ScenarioRunner::new();
        let points = runner.used_vs_new_sweep(2..=6, 1..=8).unwrap();

        assert!(points.iter().all(|p| p.combustion_start_year + p.hold_years - 1 <= HORIZON_YEARS));
        // hold 2: starts 1..=8 all fit; hold 6: starts 1..=5
        assert_eq!(points.iter().filter(|p| p.hold_years == 2).count(), 8);
        assert_eq!(points.iter().filter(|p| p.hold_years == 6).count(), 5);

        // Electric side only depends on hold length
        let hold3: Vec<_> = points.iter().filter(|p| p.hold_years == 3).collect();
        assert!(hold3.iter().all(|p| p.electric_cost == hold3[0].electric_cost));
    }

    #[test]
    fn test_used_vs_new_long_holds_are_skipped() {
        let runner = ScenarioRunner::new();
        let points = runner.used_vs_new_sweep(2..=12, 1..=8).unwrap();

        assert!(points.iter().all(|p| p.hold_years <= HORIZON_YEARS));
        assert_eq!(points.iter().filter(|p| p.hold_years == 10).count(), 1);
        assert_eq!(points, runner.used_vs_new_sweep(2..=10, 1..=8).unwrap());

        // Unbounded ranges neither overflow nor abort the sweep
        let wide = runner.used_vs_new_sweep(2..=u32::MAX, 1..=1).unwrap();
        let holds: Vec<u32> = wide.iter().map(|p| p.hold_years).collect();
        assert_eq!(holds, (2..=10).collect::<Vec<u32>>());
        let huge_start = runner.used_vs_new_sweep(u32::MAX..=u32::MAX, 1..=u32::MAX).unwrap();
        assert!(huge_start.is_empty());
        assert_eq!(runner.used_vs_new_sweep(3..=3, 1..=u32::MAX).unwrap().len(), 8);
    }

    #[test]
    fn test_decision_grid_shape() {
        let runner = ScenarioRunner::new();
        let grid = runner.decision_grid(DEFAULT_DECISION_THRESHOLD).unwrap();

        assert_eq!(grid.cells.len(), 100);
        assert!(grid.cell(1, 10).unwrap().difference.is_some());
        assert!(grid.cell(2, 10).unwrap().difference.is_none());
        assert!(grid.cell(10, 1).unwrap().choice.is_some());

        let populated = grid.cells.iter().filter(|c| c.choice.is_some()).count();
        assert_eq!(populated, 55);
        assert_eq!(
            grid.count(Choice::Combustion) + grid.count(Choice::Electric) + grid.count(Choice::Either),
            populated
        );
        assert!(runner.decision_grid(-1.0).is_err());
    }

    #[test]
    fn test_choice_from_difference() {
        assert_eq!(Choice::from_difference(5_000.0, 2_000.0), Choice::Electric);
        assert_eq!(Choice::from_difference(-5_000.0, 2_000.0), Choice::Combustion);
        assert_eq!(Choice::from_difference(1_500.0, 2_000.0), Choice::Either);
    }

    #[test]
    fn test_choice_at_threshold_is_not_a_tie() {
        assert_eq!(Choice::from_difference(2_000.0, 2_000.0), Choice::Electric);
        assert_eq!(Choice::from_difference(-2_000.0, 2_000.0), Choice::Combustion);
        assert_eq!(Choice::from_difference(1_999.99, 2_000.0), Choice::Either);
        assert_eq!(Choice::from_difference(0.0, 0.0), Choice::Either);
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = ModelConfig::default();
        config.combustion.model = "Tesla Model 3".to_string();
        assert!(ScenarioRunner::with_config(VehicleCatalog::reference(), config).is_err());

        let config = ModelConfig {
            scenario: ScenarioParameters {
                discount_rate: -2.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(ScenarioRunner::with_config(VehicleCatalog::reference(), config).is_err());
    }
}
