//! Subscriber setup for the `fql` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the application. `FQL_LOG` takes any `EnvFilter` directive, e.g.
//! `FQL_LOG=debug` or `FQL_LOG=fql_filter=trace`.

use std::env;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub const LOG_ENV: &str = "FQL_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Filter directive from `FQL_LOG`, or `warn` when unset or blank.
pub fn log_directive() -> String {
    env::var(LOG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Install a stderr fmt subscriber. Later calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(log_directive()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
        // another subscriber may already be installed by the host
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
