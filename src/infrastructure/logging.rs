// Logging setup - tracing subscriber driven by RUST_LOG or configured level
use crate::infrastructure::config::LogSettings;
use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins over the configured level. Repeat calls are no-ops.
pub fn init_logging(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let installed = if settings.json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(false)
            .try_init()
            .is_ok()
    } else {
        fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
    };

    if installed {
        tracing::info!(level = %settings.level, json = settings.json, "logging initialised");
    }
}
