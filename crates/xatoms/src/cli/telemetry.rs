//! # Logging
//!
//! All diagnostics go to stderr through `tracing_subscriber::fmt`; stdout is
//! reserved for rendered atom records.
//!
//! The filter is read from `RUST_LOG` and defaults to `warn`, so a normal run
//! prints nothing but its records. `RUST_LOG=debug` shows the connection and
//! the scan summary, `RUST_LOG=trace` every batch.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;

    Ok(())
}
