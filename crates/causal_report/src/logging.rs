use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter, e.g.
/// `CAUSAL_REPORT_LOG=causal_report=debug,tower_http=debug`.
pub const LOG_ENV: &str = "CAUSAL_REPORT_LOG";

const DEFAULT_FILTER: &str = "causal_report=info,tower_http=info";

static INIT: Once = Once::new();

/// Installs the stderr log subscriber. Safe to call more than once.
///
/// Logs go to stderr so the batch progress lines stay the only stdout
/// output.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("still alive");
    }
}
