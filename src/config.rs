//! Configuration management for Maintrack server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Connection string assembled from the individual settings
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.name
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub confirmation_ttl_minutes: i64,
    pub session_ttl_hours: i64,
    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub smtp_from_name: Option<String>,
    pub smtp_use_tls: bool,
    /// Upper bound on concurrently running SMTP sends
    pub max_in_flight: usize,
}

/// Public base URLs used to build links in emails and redirects
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LinksConfig {
    pub backend_url: String,
    pub frontend_url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // MAINTRACK_DATABASE__HOST, MAINTRACK_AUTH__JWT_SECRET, ...
            .add_source(
                Environment::with_prefix("MAINTRACK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.host", env::var("DB_HOST").ok())?
            .set_override_option("database.port", env::var("DB_PORT").ok())?
            .set_override_option("database.user", env::var("DB_USER").ok())?
            .set_override_option("database.password", env::var("DB_PASSWORD").ok())?
            .set_override_option("database.name", env::var("DB_NAME").ok())?
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
            .set_override_option("email.smtp_host", env::var("EMAIL_HOST").ok())?
            .set_override_option("email.smtp_port", env::var("EMAIL_PORT").ok())?
            .set_override_option("email.smtp_username", env::var("EMAIL_USER").ok())?
            .set_override_option("email.smtp_password", env::var("EMAIL_PASS").ok())?
            .set_override_option("email.smtp_from", env::var("EMAIL_USER").ok())?
            .set_override_option("links.backend_url", env::var("BACKEND_URL").ok())?
            .set_override_option("links.frontend_url", env::var("FRONTEND_URL").ok())?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.database.user.is_empty() {
            missing.push("database.user (DB_USER)");
        }
        if self.database.password.is_empty() {
            missing.push("database.password (DB_PASSWORD)");
        }
        if self.database.name.is_empty() {
            missing.push("database.name (DB_NAME)");
        }
        if self.auth.jwt_secret.is_empty() {
            missing.push("auth.jwt_secret (JWT_SECRET)");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )))
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            user: String::new(),
            password: String::new(),
            name: String::new(),
            max_connections: 10,
            min_connections: 2,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            confirmation_ttl_minutes: 60,
            session_ttl_hours: 24,
            argon2_memory_kib: 19 * 1024,
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "noreply@maintrack.local".to_string(),
            smtp_from_name: Some("Maintrack".to_string()),
            smtp_use_tls: true,
            max_in_flight: 8,
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
