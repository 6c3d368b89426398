//! Tracing subscriber initialisation

use meridian_domain::MeridianError;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// Honours `RUST_LOG` and falls back to `info`. With `json` set, events are
/// written as one JSON object per line.
///
/// # Errors
/// Returns [`MeridianError::Internal`] if a global subscriber is already set.
pub fn init_tracing(json: bool) -> Result<(), MeridianError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt().with_env_filter(filter).with_target(true);

    let result = if json { builder.json().try_init() } else { builder.try_init() };
    result.map_err(|e| MeridianError::Internal(format!("Failed to initialise tracing: {e}")))
}
