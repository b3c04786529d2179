//! Vehicle TCO CLI
//!
//! Command-line interface for comparing combustion and electric ownership costs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use vehicle_tco::catalog::{PowerType, VehicleCatalog};
use vehicle_tco::config::ModelConfig;
use vehicle_tco::projection::OwnershipWindow;
use vehicle_tco::report::{self, ComparisonReport};
use vehicle_tco::scenario::{
    self, ScenarioRunner, DEFAULT_DECISION_THRESHOLD, DEFAULT_MILEAGE_FROM, DEFAULT_MILEAGE_STEP,
    DEFAULT_MILEAGE_TO,
};

#[derive(Parser, Debug)]
#[command(name = "vehicle_tco", version, about = "Combustion vs electric ownership cash-flow model")]
struct Cli {
    /// JSON config with scenario parameters and the two vehicle choices
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog CSV replacing the built-in reference models
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory for CSV / JSON exports (nothing is written without it)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog models
    Catalog {
        /// Only show one drivetrain (combustion or electric)
        #[arg(long)]
        power: Option<PowerType>,
    },
    /// Project both configured vehicles and compare their NPVs
    Compare {
        /// Annual mileage replacing the commute-derived figure
        #[arg(long)]
        override_mileage: Option<f64>,
        /// Print the comparison as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Sweep annual mileage and locate the breakeven point
    Mileage {
        #[arg(long, default_value_t = DEFAULT_MILEAGE_FROM)]
        from: f64,
        #[arg(long, default_value_t = DEFAULT_MILEAGE_TO)]
        to: f64,
        #[arg(long, default_value_t = DEFAULT_MILEAGE_STEP)]
        step: f64,
        #[arg(long, default_value_t = 1)]
        start_year: u32,
        #[arg(long, default_value_t = 5)]
        end_year: u32,
    },
    /// New electric vs used combustion bought in different years
    UsedVsNew {
        #[arg(long, default_value_t = 2)]
        min_hold: u32,
        #[arg(long, default_value_t = 6)]
        max_hold: u32,
        #[arg(long, default_value_t = 8)]
        max_start: u32,
    },
    /// Start-year x hold-years decision grid
    Heatmap {
        /// Cost difference treated as a tie
        #[arg(long, default_value_t = DEFAULT_DECISION_THRESHOLD)]
        threshold: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => VehicleCatalog::from_csv_path(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => VehicleCatalog::reference(),
    };
    let config = match &cli.config {
        Some(path) => ModelConfig::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ModelConfig::default(),
    };

    if let Some(dir) = &cli.output_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    run(&mut out, catalog, config, cli.command, cli.output_dir.as_deref())
}

/// Listing the catalog needs no runner, so a config naming other models
/// does not block it
fn run<W: Write>(
    out: &mut W,
    catalog: VehicleCatalog,
    config: ModelConfig,
    command: Command,
    output_dir: Option<&Path>,
) -> Result<()> {
    let build_runner = |catalog: VehicleCatalog, config: ModelConfig| {
        ScenarioRunner::with_config(catalog, config).context("invalid configuration")
    };

    match command {
        Command::Catalog { power } => list_catalog(out, &catalog, power)?,
        Command::Compare { override_mileage, json } => {
            let runner = build_runner(catalog, config)?;
            let comparison = runner.compare(override_mileage)?;
            let report = ComparisonReport::new(&comparison);

            if json {
                writeln!(out, "{}", report.to_json()?)?;
            } else {
                report::write_comparison(out, &comparison)?;
            }

            if let Some(dir) = output_dir {
                report::write_table_csv(dir.join("combustion_cashflow.csv"), &comparison.combustion)?;
                report::write_table_csv(dir.join("electric_cashflow.csv"), &comparison.electric)?;
                report.write_json(dir.join("comparison.json"))?;
            }
        }
        Command::Mileage { from, to, step, start_year, end_year } => {
            let runner = build_runner(catalog, config)?;
            let grid = scenario::mileage_range(from, to, step)?;
            let window = OwnershipWindow::new(start_year, end_year)?;
            let points = runner.mileage_sweep(&grid, window)?;

            writeln!(out, "Mileage sensitivity, years {}-{}\n", start_year, end_year)?;
            report::write_mileage_points(out, &points)?;
            if let Some(p) = scenario::breakeven(&points) {
                writeln!(
                    out,
                    "\nApproximate breakeven: {:.0} km/yr (difference {:.0})",
                    p.annual_km, p.difference
                )?;
            }
            export(output_dir, "mileage_sensitivity.csv", &points)?;
        }
        Command::UsedVsNew { min_hold, max_hold, max_start } => {
            let runner = build_runner(catalog, config)?;
            let points = runner.used_vs_new_sweep(min_hold..=max_hold, 1..=max_start)?;
            writeln!(
                out,
                "New {} vs used {} (same hold duration)\n",
                runner.config().electric.model,
                runner.config().combustion.model
            )?;
            report::write_used_vs_new(out, &points)?;
            export(output_dir, "used_vs_new.csv", &points)?;
        }
        Command::Heatmap { threshold } => {
            let runner = build_runner(catalog, config)?;
            let grid = runner.decision_grid(threshold)?;
            report::write_decision_grid(out, &grid)?;
            export(output_dir, "decision_grid.csv", &grid.cells)?;
        }
    }

    Ok(())
}

fn list_catalog<W: Write>(out: &mut W, catalog: &VehicleCatalog, power: Option<PowerType>) -> Result<()> {
    writeln!(out, "{:<22} {:<11} {:>7} {:>7} {:>9} {:>7} {:>9}", "Model", "Power", "City", "Highway", "Insurance", "Maint", "Resale@5")?;
    writeln!(out, "{}", "-".repeat(78))?;
    for model in catalog.models().iter().filter(|m| power.map_or(true, |p| m.power_type() == p)) {
        let (city, highway) = model.consumption.rates();
        writeln!(
            out,
            "{:<22} {:<11} {:>7.1} {:>7.1} {:>9.3} {:>7.0} {:>9.2}",
            model.name,
            model.power_type(),
            city,
            highway,
            model.insurance_rate,
            model.annual_maintenance,
            model.residual_fraction(5),
        )?;
    }
    Ok(())
}

fn export<T: serde::Serialize>(dir: Option<&Path>, file_name: &str, records: &[T]) -> Result<()> {
    if let Some(dir) = dir {
        report::write_csv(dir.join(file_name), records)?;
    }
    Ok(())
}
