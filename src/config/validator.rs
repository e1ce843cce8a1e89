//! Settings validation.

use crate::config::{ServerConfig, WebConfig};
use crate::error::ConfigError;

pub fn validate_server(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.port == 0 {
        return Err(ConfigError::Validation("PORT must be non-zero".into()));
    }
    if config.max_connections == 0 {
        return Err(ConfigError::Validation(
            "DATABASE_MAX_CONNECTIONS must be at least 1".into(),
        ));
    }
    Ok(())
}

pub fn validate_web(config: &WebConfig) -> Result<(), ConfigError> {
    if config.port == 0 {
        return Err(ConfigError::Validation("WEB_PORT must be non-zero".into()));
    }
    let url = url::Url::parse(&config.api_url).map_err(|e| ConfigError::Invalid {
        key: "API_URL",
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: "API_URL",
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(())
}
