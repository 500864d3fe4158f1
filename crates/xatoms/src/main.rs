#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::config::{CliArgs, RunConfig};
use cli::display::DisplayConnection;
use cli::telemetry::init_telemetry;
use std::io::{self, BufWriter};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let config = match CliArgs::try_parse().and_then(RunConfig::from_args) {
        Ok(config) => config,
        Err(e) => return report_usage(&e),
    };

    init_telemetry()?;
    log_startup_info(&config);

    let display = DisplayConnection::open(config.display.as_deref())?;
    let mut out = BufWriter::new(io::stdout().lock());
    let result = xatoms_core::scan(&display, &config.scan, &mut out);
    display.close();

    let report = result?;
    tracing::debug!(
        requested = report.requested,
        named = report.named,
        unknown = report.unknown,
        matched = report.matched,
        "Scan complete"
    );
    if let Some(atom) = report.stopped_at {
        tracing::info!("Stopped at atom {atom}, the first without a name");
    }

    Ok(ExitCode::SUCCESS)
}

/// Prints a clap outcome. `--help` and `--version` land here too and go to
/// stdout with a success code.
fn report_usage(e: &clap::Error) -> anyhow::Result<ExitCode> {
    e.print()?;
    Ok(if e.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn log_startup_info(config: &RunConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Starting atom scan with full config: {:#?}", config);
    } else {
        tracing::debug!(
            "Starting atom scan over {} in batches of {} with format `{}`",
            config.scan.range,
            config.scan.batch_size,
            config.scan.template
        );
    }
}
