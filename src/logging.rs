//! Diagnostic logging to stderr.
//!
//! Stdout carries the report, so diagnostics stay off unless `RUST_LOG`
//! asks for them (e.g. `RUST_LOG=opencode_usage=debug`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("[opencode-usage] Warning: logging disabled: {}", e);
    }
}
