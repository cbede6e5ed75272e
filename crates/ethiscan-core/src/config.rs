use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("ETHISCAN_ENV", "development"))?;

    let bind_addr = parse_addr("ETHISCAN_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("ETHISCAN_LOG_LEVEL", "info");

    let analyze_endpoint = or_default(
        "ETHISCAN_ANALYZE_ENDPOINT",
        "http://localhost:5000/api/analyze",
    );
    if !analyze_endpoint.starts_with("http://") && !analyze_endpoint.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "ETHISCAN_ANALYZE_ENDPOINT".to_string(),
            reason: format!("expected an http(s) URL, got \"{analyze_endpoint}\""),
        });
    }

    let cache_dir = PathBuf::from(or_default("ETHISCAN_CACHE_DIR", "./.ethiscan"));
    let settle_delay_ms = parse_u64("ETHISCAN_SETTLE_DELAY_MS", "2000")?;

    let http_timeout_secs = parse_u64("ETHISCAN_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ETHISCAN_USER_AGENT", "ethiscan/0.1 (product-extractor)");
    let max_retries = parse_u32("ETHISCAN_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("ETHISCAN_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        analyze_endpoint,
        cache_dir,
        settle_delay_ms,
        http_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ETHISCAN_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
