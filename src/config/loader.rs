//! Load settings from the process environment (after `.env`, when present).

use crate::config::types::*;
use crate::config::validator::{validate_server, validate_web};
use crate::error::ConfigError;
use std::str::FromStr;

/// Read `HOST`, `PORT`, `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`.
pub fn server_config_from_env() -> Result<ServerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    server_config_from(|key| std::env::var(key).ok())
}

/// Read `WEB_PORT`, `API_URL`, `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `APP_ENV`.
pub fn web_config_from_env() -> Result<WebConfig, ConfigError> {
    dotenvy::dotenv().ok();
    web_config_from(|key| std::env::var(key).ok())
}

/// Build server settings from any key lookup. Missing or blank keys take defaults.
pub fn server_config_from<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let config = ServerConfig {
        host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
        port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
        database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
        max_connections: parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?,
    };
    validate_server(&config)?;
    Ok(config)
}

/// Build web frontend settings from any key lookup. Missing or blank keys take defaults.
pub fn web_config_from<F>(lookup: F) -> Result<WebConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let config = WebConfig {
        port: parse_or("WEB_PORT", get("WEB_PORT"), DEFAULT_WEB_PORT)?,
        api_url: get("API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
        database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
        max_connections: parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?,
        env: get("APP_ENV").map(|v| AppEnv::parse(&v)).unwrap_or_default(),
    };
    validate_web(&config)?;
    Ok(config)
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(s) => s.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn server_defaults() {
        let config = server_config_from(lookup(&[])).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn server_port_override_and_blank_values() {
        let config = server_config_from(lookup(&[("PORT", "8080"), ("HOST", "  ")])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = server_config_from(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn web_defaults_and_env() {
        let config = web_config_from(lookup(&[])).unwrap();
        assert_eq!(config.api_url, "http://localhost:3001");
        assert_eq!(config.port, 3000);
        assert_eq!(config.env, AppEnv::Development);

        let config = web_config_from(lookup(&[("APP_ENV", "Production")])).unwrap();
        assert!(config.env.is_production());
    }

    #[test]
    fn web_rejects_unparseable_api_url() {
        let err = web_config_from(lookup(&[("API_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "API_URL", .. }));
    }
}
