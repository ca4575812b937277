//! `ppp solve`: build the MILP, solve it, write the decoded placement

use super::load_instance;
use anyhow::{anyhow, Context, Result};
use ppp_algo::{solve_placement, ModelStats, PlacementSolution, SolverBackend, SolverConfig};
use ppp_cli::{ApproximationKind, OutputFormat};
use ppp_core::Point;
use serde::Serialize;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct SolveArgs<'a> {
    pub instance: &'a Path,
    pub out: Option<&'a Path>,
    pub order: ApproximationKind,
    pub reference: u32,
    pub time_limit: u64,
    pub backend: SolverBackend,
    pub only_if_better: bool,
    pub verbose: bool,
    pub format: OutputFormat,
}

/// Solution output format
#[derive(Debug, Serialize)]
struct SolveOutput {
    approximation: String,
    backend: SolverBackend,
    towers: Vec<Point>,
    approximate_objective: f64,
    penalty: f64,
    gap: f64,
    stats: ModelStats,
    solve_time_ms: u64,
    /// `None` when no output file was requested
    written: Option<bool>,
}

impl SolveOutput {
    fn new(solution: &PlacementSolution, written: Option<bool>) -> Self {
        SolveOutput {
            approximation: solution.approximation.clone(),
            backend: solution.backend,
            towers: solution.placement.points().collect(),
            approximate_objective: solution.approximate_objective,
            penalty: solution.penalty,
            gap: solution.approximation_gap(),
            stats: solution.stats,
            solve_time_ms: solution.solve_time.as_millis() as u64,
            written,
        }
    }
}

pub fn handle(args: &SolveArgs<'_>) -> Result<()> {
    let instance = load_instance(args.instance)?;
    let approximation = args.order.build(args.reference);
    let config = SolverConfig {
        time_limit: Duration::from_secs(args.time_limit),
        backend: args.backend,
        verbose: args.verbose,
    };

    let solution = solve_placement(Arc::clone(&instance), approximation.as_ref(), &config)
        .map_err(|e| {
            if e.is_non_convergence() {
                anyhow!("solver did not converge: {e}")
            } else {
                anyhow!(e)
            }
        })
        .context("solving placement model")?;

    let written = match args.out {
        Some(path) if args.only_if_better => {
            let written = ppp_io::write_placement_if_better(path, &solution.placement)?;
            if written {
                info!("wrote improved placement to {}", path.display());
            } else {
                info!("kept existing placement in {}", path.display());
            }
            Some(written)
        }
        Some(path) => {
            ppp_io::write_placement(path, &solution.placement)?;
            info!("wrote placement to {}", path.display());
            Some(true)
        }
        None => None,
    };

    match args.format {
        OutputFormat::Plain => {
            print!("{}", solution.summary());
            if written.is_none() {
                println!();
                print!("{}", ppp_io::format_placement(&solution.placement));
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), &SolveOutput::new(&solution, written))
                .context("serializing solve report to JSON")?;
            println!();
        }
    }
    Ok(())
}
