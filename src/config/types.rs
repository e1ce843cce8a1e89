//! Runtime settings for the API service and the web frontend.

use std::fmt;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/course_market";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_WEB_PORT: u16 = 3000;

/// Deployment environment. Selects the session cookie name among other things.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppEnv {
    Production,
    #[default]
    Development,
}

impl AppEnv {
    /// Anything other than `production` (case-insensitive) is treated as development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            AppEnv::Production
        } else {
            AppEnv::Development
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnv::Production => f.write_str("production"),
            AppEnv::Development => f.write_str("development"),
        }
    }
}

/// API service settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Web frontend settings.
#[derive(Clone, Debug)]
pub struct WebConfig {
    pub port: u16,
    /// Base URL of the API service; endpoint paths are appended verbatim.
    pub api_url: String,
    pub database_url: String,
    pub max_connections: u32,
    pub env: AppEnv,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            port: DEFAULT_WEB_PORT,
            api_url: DEFAULT_API_URL.into(),
            database_url: DEFAULT_DATABASE_URL.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            env: AppEnv::Development,
        }
    }
}
