//! Structured logging using **tracing**.
//!
//! Everything goes to stderr: when running as a protoc plugin, stdout carries
//! the encoded `CodeGeneratorResponse` and must not contain anything else.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset. protoc relays plugin stderr to the
/// user, so only warnings and errors are shown by default.
const DEFAULT_FILTER: &str = "warn";

/// Initializes the global tracing subscriber.
///
/// Call *once* at the beginning of the process. Configures structured JSON
/// output to stderr.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=protocheck_core=debug`)
pub fn init_structured_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // try_init: a second call (tests, embedders) must not panic
    let _ = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
