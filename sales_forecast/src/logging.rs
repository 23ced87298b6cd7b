//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::error::{ForecastError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global fmt subscriber filtered by `RUST_LOG`, or by the
/// configured level when `RUST_LOG` is unset.
///
/// Returns a `ConfigError` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let default_directive = format!(
        "sales_forecast={level},sales_stats_workspace={level}",
        level = config.level
    );
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let installed = if config.json {
        fmt().with_env_filter(EnvFilter::new(filter)).json().try_init()
    } else {
        fmt().with_env_filter(EnvFilter::new(filter)).try_init()
    };

    installed.map_err(|e| ForecastError::ConfigError(format!("failed to install tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_an_error_not_a_panic() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
