//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `IDEAL_LOG=ideal_curves=debug`.
pub const LOG_ENV: &str = "IDEAL_LOG";

const DEFAULT_FILTER: &str = "ideal_curves=info";

/// Install a stderr subscriber so stdout stays reserved for reports.
///
/// Falls back to `ideal_curves=info` if `IDEAL_LOG` is unset or invalid.
/// Calling it more than once is a no-op.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Another subscriber may already be installed (e.g. by an embedding test).
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(filter)
            .try_init();
    });
}
