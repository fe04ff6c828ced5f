//! Tracing initialization for the binaries.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `CATMERGE_LOG=debug`.
pub const LOG_ENV: &str = "CATMERGE_LOG";

static INIT: Once = Once::new();

/// Install a stderr `fmt` subscriber filtered by `$CATMERGE_LOG` (default `info`).
///
/// Stdout is left alone so JSON output stays machine-readable. Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}
