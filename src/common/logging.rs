//! Logging and tracing configuration
//!
//! Both binaries log to stderr so stdout stays free for help text,
//! version output and the list reporter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the `xq-keeper` launcher
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// The launcher is quiet by default: WARN for this crate and dependencies.
pub fn init_cli() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xq_keeper=warn,warn"));

    init_stderr(filter);
}

/// Initialize tracing for the `xq-runner` binary
///
/// Default level is INFO for this crate, WARN for dependencies, so cleanup
/// warnings and API error diagnostics always reach the terminal.
pub fn init_runner() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xq_keeper=info,warn"));

    init_stderr(filter);
}

fn init_stderr(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
