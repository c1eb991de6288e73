use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default schedule for the unclassified-tweet sweep: every day at 00:00 UTC.
pub const DEFAULT_SWEEP_CRON: &str = "0 0 0 * * *";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
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

    let backend_url = require("TWEETWATCH_BACKEND_URL")?;
    let backend_token = optional("TWEETWATCH_BACKEND_TOKEN");
    let backend_ca_cert = optional("TWEETWATCH_BACKEND_CA_CERT").map(PathBuf::from);
    let backend_timeout_secs = parse_u64("TWEETWATCH_BACKEND_TIMEOUT_SECS", "240")?;
    if backend_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TWEETWATCH_BACKEND_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let backend_max_retries = parse_u32("TWEETWATCH_BACKEND_MAX_RETRIES", "2")?;
    let backend_retry_backoff_ms = parse_u64("TWEETWATCH_BACKEND_RETRY_BACKOFF_MS", "1000")?;

    let env = parse_environment(&or_default("TWEETWATCH_ENV", "development"));
    let bind_addr = parse_addr("TWEETWATCH_BIND_ADDR", "0.0.0.0:9703")?;
    let log_level = or_default("TWEETWATCH_LOG_LEVEL", "info");
    let sweep_cron = or_default("TWEETWATCH_SWEEP_CRON", DEFAULT_SWEEP_CRON);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        backend_url,
        backend_token,
        backend_ca_cert,
        backend_timeout_secs,
        backend_max_retries,
        backend_retry_backoff_ms,
        sweep_cron,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
