#![forbid(unsafe_code)]

//! Tracing subscriber installation for applications embedding navkit.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "navkit=info";

/// Install a global `fmt` subscriber honouring `RUST_LOG`.
///
/// With `json = true` events are written as JSON lines. Returns `false` if a
/// global subscriber was already installed.
pub fn init_tracing(json: bool) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
