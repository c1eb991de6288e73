use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("TWEETWATCH_BACKEND_URL", "https://backend.example.com");
    m
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_fails_without_backend_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TWEETWATCH_BACKEND_URL"),
        "expected MissingEnvVar(TWEETWATCH_BACKEND_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_backend_url_as_missing() {
    let mut map = full_env();
    map.insert("TWEETWATCH_BACKEND_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:9703");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.backend_url, "https://backend.example.com");
    assert_eq!(cfg.backend_token, None);
    assert_eq!(cfg.backend_ca_cert, None);
    assert_eq!(cfg.backend_timeout_secs, 240);
    assert_eq!(cfg.backend_max_retries, 2);
    assert_eq!(cfg.backend_retry_backoff_ms, 1000);
    assert_eq!(cfg.sweep_cron, DEFAULT_SWEEP_CRON);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("TWEETWATCH_ENV", "production");
    map.insert("TWEETWATCH_BIND_ADDR", "127.0.0.1:8080");
    map.insert("TWEETWATCH_BACKEND_TOKEN", "secret");
    map.insert("TWEETWATCH_BACKEND_CA_CERT", "/etc/tweetwatch/ca_chain.crt");
    map.insert("TWEETWATCH_BACKEND_TIMEOUT_SECS", "60");
    map.insert("TWEETWATCH_BACKEND_MAX_RETRIES", "0");
    map.insert("TWEETWATCH_SWEEP_CRON", "0 30 1 * * *");

    let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.backend_token.as_deref(), Some("secret"));
    assert_eq!(
        cfg.backend_ca_cert.as_deref(),
        Some(std::path::Path::new("/etc/tweetwatch/ca_chain.crt"))
    );
    assert_eq!(cfg.backend_timeout_secs, 60);
    assert_eq!(cfg.backend_max_retries, 0);
    assert_eq!(cfg.sweep_cron, "0 30 1 * * *");
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("TWEETWATCH_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TWEETWATCH_BIND_ADDR"),
        "expected InvalidEnvVar(TWEETWATCH_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_non_numeric_timeout() {
    let mut map = full_env();
    map.insert("TWEETWATCH_BACKEND_TIMEOUT_SECS", "four minutes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TWEETWATCH_BACKEND_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TWEETWATCH_BACKEND_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = full_env();
    map.insert("TWEETWATCH_BACKEND_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn debug_output_redacts_backend_token() {
    let mut map = full_env();
    map.insert("TWEETWATCH_BACKEND_TOKEN", "super-secret-token");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret-token"));
    assert!(debug.contains("[redacted]"));
}
