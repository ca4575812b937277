use crate::common::{ApproximationKind, OutputFormat};
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use ppp_algo::{SolverBackend, DEFAULT_REFERENCE_OVERLAP};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ppp", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a solution file against an instance and report its penalty
    Score {
        /// Instance file
        #[arg(value_hint = ValueHint::FilePath)]
        instance: PathBuf,
        /// Solution file
        #[arg(value_hint = ValueHint::FilePath)]
        solution: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Optimize a placement with a mixed-integer solver
    Solve {
        /// Instance file
        #[arg(value_hint = ValueHint::FilePath)]
        instance: PathBuf,
        /// Write the placement here instead of printing it
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Penalty approximation to optimize
        #[arg(long, value_enum, default_value_t = ApproximationKind::Quadratic)]
        order: ApproximationKind,
        /// Overlap count the Taylor expansions are centred on
        #[arg(long, default_value_t = DEFAULT_REFERENCE_OVERLAP)]
        reference: u32,
        /// Solver time limit in seconds
        #[arg(long, default_value_t = 300)]
        time_limit: u64,
        /// MIP backend
        #[arg(long, default_value_t = SolverBackend::default())]
        backend: SolverBackend,
        /// Keep an existing output file unless the new penalty is lower
        #[arg(long, requires = "out")]
        only_if_better: bool,
        /// Let the backend print its own progress
        #[arg(long)]
        verbose: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Draw an instance, optionally with a solution, as a character grid
    Render {
        /// Instance file
        #[arg(value_hint = ValueHint::FilePath)]
        instance: PathBuf,
        /// Solution file
        #[arg(value_hint = ValueHint::FilePath)]
        solution: Option<PathBuf>,
    },
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn test_solve_defaults() {
        let cli = Cli::try_parse_from(["ppp", "solve", "case.in"]).unwrap();
        match cli.command {
            Some(Commands::Solve {
                order,
                reference,
                time_limit,
                backend,
                only_if_better,
                out,
                ..
            }) => {
                assert_eq!(order, ApproximationKind::Quadratic);
                assert_eq!(reference, 6);
                assert_eq!(time_limit, 300);
                assert_eq!(backend, SolverBackend::default());
                assert!(!only_if_better);
                assert!(out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.log_level, tracing::Level::INFO);
    }

    #[test]
    fn test_only_if_better_needs_out() {
        assert!(Cli::try_parse_from(["ppp", "solve", "case.in", "--only-if-better"]).is_err());
        assert!(Cli::try_parse_from([
            "ppp",
            "solve",
            "case.in",
            "--out",
            "case.out",
            "--only-if-better"
        ])
        .is_ok());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Cli::try_parse_from(["ppp", "solve", "case.in", "--backend", "cplex"]).is_err());
    }
}
