//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `aerotech.toml` in the working directory. Every field has a
//! default so the file is optional, except the JWT secret which must come
//! from the file or `AEROTECH_JWT_SECRET`. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use aerotech_domain::device::Device;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Operator token verification.
    pub auth: AuthConfig,
    /// Devices registered at startup.
    pub devices: Vec<DeviceConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Bearer token verification settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider.
    pub jwt_secret: String,
    /// Required `aud` claim, if any.
    pub audience: Option<String>,
}

/// One `[[devices]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub id: String,
    pub name: String,
    /// Secret the device presents when submitting readings.
    pub secret: String,
}

impl DeviceConfig {
    fn to_device(&self) -> Result<Device, ConfigError> {
        Device::builder()
            .id(self.id.as_str())
            .name(self.name.as_str())
            .secret(self.secret.as_str())
            .build()
            .map_err(|err| ConfigError::Validation(format!("device `{}`: {err}", self.id)))
    }
}

impl Config {
    /// Load configuration from `aerotech.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("aerotech.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("AEROTECH_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("AEROTECH_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("AEROTECH_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("AEROTECH_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("AEROTECH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("AEROTECH_JWT_SECRET") {
            self.auth.jwt_secret = val;
        }
        if let Some(val) = var("AEROTECH_JWT_AUDIENCE") {
            self.auth.audience = Some(val).filter(|aud| !aud.is_empty());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Validation(
                "auth.jwt_secret must be set".to_string(),
            ));
        }
        self.devices()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Devices to provision at startup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first invalid entry.
    pub fn devices(&self) -> Result<Vec<Device>, ConfigError> {
        self.devices.iter().map(DeviceConfig::to_device).collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:aerotech.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "aerotechd=info,aerotech=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
