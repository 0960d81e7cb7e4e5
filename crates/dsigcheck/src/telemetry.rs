#![forbid(unsafe_code)]

//! Logging setup. Diagnostics go to stderr; stdout carries only reports.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `default_filter`. Later calls do nothing.
pub fn init_tracing(default_filter: &str) {
    let _ = INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(env_filter)
            .try_init();
    });
}
