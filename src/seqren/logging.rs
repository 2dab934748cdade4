use std::env;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a tracing filter, e.g. `seqren=debug`.
pub const LOG_ENV: &str = "SEQREN_LOG";

/// Filter used when `SEQREN_LOG` is unset.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. Logs go to stderr so that command output
/// on stdout stays clean. Calling it twice is harmless.
pub fn init_logger(verbosity: u8) {
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| default_filter(verbosity).to_string());
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter_layer)
        .try_init();
}
