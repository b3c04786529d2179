//! Console tables and CSV / JSON exports

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::projection::{CashflowTable, TableSummary};
use crate::scenario::{Choice, Comparison, DecisionGrid, MileagePoint, UsedVsNewPoint};

/// Write a cashflow table to the given writer as aligned columns
pub fn write_table<W: Write>(out: &mut W, table: &CashflowTable) -> io::Result<()> {
    writeln!(
        out,
        "{} ({}), years {}-{}",
        table.vehicle,
        table.power_type,
        table.window.start_year(),
        table.window.end_year()
    )?;
    writeln!(
        out,
        "{:>4} {:>11} {:>9} {:>9} {:>8} {:>8} {:>8} {:>8} {:>6} {:>10} {:>11} {:>12} {:>11}",
        "Year", "Purchase", "Energy", "Insurance", "Maint", "Toll", "Parking", "Plate", "Fine",
        "Resale", "Net", "Cumulative", "Discounted"
    )?;
    writeln!(out, "{}", "-".repeat(128))?;

    for row in &table.rows {
        writeln!(
            out,
            "{:>4} {:>11.0} {:>9.0} {:>9.0} {:>8.0} {:>8.0} {:>8.0} {:>8.0} {:>6.0} {:>10.0} {:>11.0} {:>12.0} {:>11.0}",
            row.year,
            row.purchase,
            row.energy,
            row.insurance,
            row.maintenance,
            row.toll,
            row.parking,
            row.plate_levy,
            row.fine,
            row.resale,
            row.net_cashflow,
            row.cumulative_cashflow,
            row.discounted_cashflow,
        )?;
    }

    writeln!(out, "NPV: {:.0}", table.npv())
}

/// Both tables followed by the NPV summary
pub fn write_comparison<W: Write>(out: &mut W, comparison: &Comparison) -> io::Result<()> {
    write_table(out, &comparison.combustion)?;
    writeln!(out)?;
    write_table(out, &comparison.electric)?;
    writeln!(out)?;

    writeln!(out, "NPV summary:")?;
    writeln!(out, "  {:<24} {:>12.0}", comparison.combustion.vehicle, comparison.combustion.npv())?;
    writeln!(out, "  {:<24} {:>12.0}", comparison.electric.vehicle, comparison.electric.npv())?;
    writeln!(
        out,
        "  Advantage: {:.0} ({} cheaper)",
        comparison.advantage().abs(),
        comparison.cheaper().as_str()
    )
}

pub fn write_mileage_points<W: Write>(out: &mut W, points: &[MileagePoint]) -> io::Result<()> {
    writeln!(out, "{:>10} {:>14} {:>14} {:>12}  Cheaper", "km/yr", "Combustion", "Electric", "Difference")?;
    for p in points {
        let cheaper = if p.difference > 0.0 { "electric" } else { "combustion" };
        writeln!(
            out,
            "{:>10.0} {:>14.0} {:>14.0} {:>12.0}  {}",
            p.annual_km, p.combustion_cost, p.electric_cost, p.difference, cheaper
        )?;
    }
    Ok(())
}

pub fn write_used_vs_new<W: Write>(out: &mut W, points: &[UsedVsNewPoint]) -> io::Result<()> {
    writeln!(out, "{:>5} {:>10} {:>14} {:>14} {:>12}", "Hold", "ICE start", "Combustion", "Electric", "Difference")?;
    for p in points {
        writeln!(
            out,
            "{:>5} {:>10} {:>14.0} {:>14.0} {:>12.0}",
            p.hold_years, p.combustion_start_year, p.combustion_cost, p.electric_cost, p.difference
        )?;
    }
    Ok(())
}

/// Grid with start years as rows and hold years as columns.
/// `E` electric, `C` combustion, `=` within threshold, `.` past the horizon.
pub fn write_decision_grid<W: Write>(out: &mut W, grid: &DecisionGrid) -> io::Result<()> {
    let max_hold = grid.cells.iter().map(|c| c.hold_years).max().unwrap_or(0);
    let max_start = grid.cells.iter().map(|c| c.start_year).max().unwrap_or(0);

    write!(out, "start\\hold")?;
    for hold in 1..=max_hold {
        write!(out, " {:>3}", hold)?;
    }
    writeln!(out)?;

    for start in 1..=max_start {
        write!(out, "{:>10}", start)?;
        for hold in 1..=max_hold {
            let mark = match grid.cell(start, hold).and_then(|c| c.choice) {
                Some(Choice::Electric) => "E",
                Some(Choice::Combustion) => "C",
                Some(Choice::Either) => "=",
                None => ".",
            };
            write!(out, " {:>3}", mark)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "threshold: {:.0}", grid.threshold)
}

/// Serialize any sequence of flat records to CSV
pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    log::info!("Wrote {} rows to {}", records.len(), path.as_ref().display());
    Ok(())
}

pub fn write_table_csv<P: AsRef<Path>>(path: P, table: &CashflowTable) -> Result<()> {
    write_csv(path, &table.rows)
}

/// JSON export of a comparison
#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub combustion: TableSummary,
    pub electric: TableSummary,
    /// Combustion cost minus electric cost
    pub advantage: f64,
    pub combustion_cashflows: &'a CashflowTable,
    pub electric_cashflows: &'a CashflowTable,
}

impl<'a> ComparisonReport<'a> {
    pub fn new(comparison: &'a Comparison) -> Self {
        Self {
            generated_at: Utc::now(),
            combustion: comparison.combustion.summary(),
            electric: comparison.electric.summary(),
            advantage: comparison.advantage(),
            combustion_cashflows: &comparison.combustion,
            electric_cashflows: &comparison.electric,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, self)?;
        log::info!("Wrote comparison report to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioRunner;

    #[test]
    fn test_table_text_has_ten_rows() {
        let runner = ScenarioRunner::new();
        let comparison = runner.compare(None).unwrap();

        let mut buf = Vec::new();
        write_table(&mut buf, &comparison.combustion).unwrap();
        let text = String::from_utf8(buf).unwrap();

        // title, header, rule, 10 rows, NPV line
        assert_eq!(text.lines().count(), 14);
        assert!(text.starts_with("Toyota Camry (combustion), years 4-8"));
        assert!(text.lines().last().unwrap().starts_with("NPV: -"));
    }

    #[test]
    fn test_comparison_json_round_trip() {
        let runner = ScenarioRunner::new();
        let comparison = runner.compare(Some(20_000.0)).unwrap();
        let json = ComparisonReport::new(&comparison).to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["combustion"]["vehicle"], "Toyota Camry");
        assert_eq!(value["electric_cashflows"]["rows"].as_array().unwrap().len(), 10);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_table_csv_export() {
        let runner = ScenarioRunner::new();
        let comparison = runner.compare(None).unwrap();

        let path = std::env::temp_dir().join(format!("vehicle_tco_table_{}.csv", std::process::id()));
        write_table_csv(&path, &comparison.electric).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "year");
        assert_eq!(&headers[12], "discounted_cashflow");
        let rows: Vec<crate::projection::CashflowRow> =
            reader.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows, comparison.electric.rows);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_decision_grid_text() {
        let runner = ScenarioRunner::new();
        let grid = runner.decision_grid(2_000.0).unwrap();

        let mut buf = Vec::new();
        write_decision_grid(&mut buf, &grid).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // header + 10 start-year rows + threshold line
        assert_eq!(text.lines().count(), 12);
        assert!(text.lines().nth(10).unwrap().contains('.'));
    }
}
