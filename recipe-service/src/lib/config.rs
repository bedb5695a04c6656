use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,
    #[serde(default = "default_refresh_token_minutes")]
    pub refresh_token_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    /// Send cookies with the `Secure` flag. Only disable for plaintext local development.
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self { secure: true }
    }
}

/// Administrator account ensured at start-up.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_token_minutes() -> i64 {
    30
}

fn default_refresh_token_minutes() -> i64 {
    7 * 24 * 60
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject token lifetimes that cannot work together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.access_token_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_minutes must be positive".to_string(),
            ));
        }
        if self.jwt.refresh_token_minutes <= self.jwt.access_token_minutes {
            return Err(ConfigError::Message(
                "jwt.refresh_token_minutes must exceed jwt.access_token_minutes".to_string(),
            ));
        }
        Ok(())
    }
}
