use clap::Parser;
use ppp_cli::{Cli, Commands};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so `--format json` output stays parseable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }

    let (name, result) = match &cli.command {
        Some(Commands::Score {
            instance,
            solution,
            format,
        }) => ("Score", commands::score::handle(instance, solution, *format)),
        Some(Commands::Solve {
            instance,
            out,
            order,
            reference,
            time_limit,
            backend,
            only_if_better,
            verbose,
            format,
        }) => (
            "Solve",
            commands::solve::handle(&commands::solve::SolveArgs {
                instance,
                out: out.as_deref(),
                order: *order,
                reference: *reference,
                time_limit: *time_limit,
                backend: *backend,
                only_if_better: *only_if_better,
                verbose: *verbose,
                format: *format,
            }),
        ),
        Some(Commands::Render { instance, solution }) => (
            "Render",
            commands::render::handle(instance, solution.as_deref()),
        ),
        None => {
            info!("No subcommand provided. Use `ppp --help` for more information.");
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{name} command failed: {e:?}");
            ExitCode::FAILURE
        }
    }
}
