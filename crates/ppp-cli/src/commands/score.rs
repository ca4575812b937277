//! `ppp score`: validity, penalty and per-tower overlaps of a solution file

use super::{load_instance, load_placement};
use anyhow::{Context, Result};
use ppp_cli::OutputFormat;
use ppp_core::{tower_penalty, Placement, Point};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;

#[derive(Debug, Serialize)]
struct ScoreReport {
    valid: bool,
    penalty: f64,
    towers: usize,
    uncovered: Vec<Point>,
    overlaps: Vec<TowerRow>,
}

#[derive(Debug, Serialize)]
struct TowerRow {
    id: u64,
    x: i32,
    y: i32,
    overlap: usize,
    cost: f64,
}

impl ScoreReport {
    fn new(placement: &Placement) -> Self {
        let counts = placement.overlap_counts();
        let overlaps = placement
            .iter()
            .map(|(id, p)| {
                let overlap = counts.get(&id).copied().unwrap_or(0);
                TowerRow {
                    id: id.value(),
                    x: p.x,
                    y: p.y,
                    overlap,
                    cost: tower_penalty(overlap),
                }
            })
            .collect();
        ScoreReport {
            valid: placement.is_valid(),
            penalty: placement.penalty(),
            towers: placement.len(),
            uncovered: placement.uncovered_cities(),
            overlaps,
        }
    }
}

pub fn handle(instance_path: &Path, solution_path: &Path, format: OutputFormat) -> Result<()> {
    let instance = load_instance(instance_path)?;
    let placement = load_placement(solution_path, &instance)?;
    let report = ScoreReport::new(&placement);

    match format {
        OutputFormat::Plain => print_plain(&report),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), &report)
                .context("serializing score report to JSON")?;
            println!();
            Ok(())
        }
    }
}

fn print_plain(report: &ScoreReport) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Valid: {}", if report.valid { "yes" } else { "no" })?;
    writeln!(out, "Penalty: {}", report.penalty)?;
    writeln!(out, "Towers: {}", report.towers)?;
    if !report.uncovered.is_empty() {
        let cities: Vec<String> = report.uncovered.iter().map(Point::to_string).collect();
        writeln!(out, "Uncovered cities: {}", cities.join(" "))?;
    }
    if report.overlaps.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    let mut writer = TabWriter::new(out);
    writeln!(writer, "TOWER\tX\tY\tOVERLAP\tCOST")?;
    for row in &report.overlaps {
        writeln!(
            writer,
            "#{}\t{}\t{}\t{}\t{:.4}",
            row.id, row.x, row.y, row.overlap, row.cost
        )?;
    }
    writer.flush()?;
    Ok(())
}
