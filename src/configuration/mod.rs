use crate::database::{connect_store, User, UserStore};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::sync::Arc;
use thiserror::Error;
use tokio_postgres::config::SslMode;

pub const CONFIG_PATH_VAR: &str = "USERDIR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DATABASE_PASSWORD_VAR: &str = "DATABASE_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File read error")]
    FileError,

    #[error("Deserialization error:{0}")]
    DeserializationError(String),

    #[error("Unsupported ssl_mode:{0}")]
    InvalidSslMode(String),

    #[error("Store initialization error:{0}")]
    StoreInitError(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub seed_users: Option<Vec<User>>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub db_name: String,
    pub ssl_mode: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            http: HttpConfig::default(),
            storage: StorageConfig::default(),
            database: DatabaseConfig::default(),
            seed_users: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// Local development database
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: String::new(),
            db_name: "postgres".to_string(),
            ssl_mode: "disable".to_string(),
        }
    }
}

// Keeps the password out of logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

impl DatabaseConfig {
    // Only plaintext connections are wired, so modes that insist on TLS are refused
    pub fn ssl_mode(&self) -> Result<SslMode, ConfigError> {
        match self.ssl_mode.trim().to_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            other => Err(ConfigError::InvalidSslMode(other.to_string())),
        }
    }

    pub fn pg_config(&self) -> Result<tokio_postgres::Config, ConfigError> {
        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(self.host.as_str())
            .port(self.port)
            .user(self.username.as_str())
            .password(self.password.as_str())
            .dbname(self.db_name.as_str())
            .ssl_mode(self.ssl_mode()?);
        Ok(pg_config)
    }
}

impl Config {
    pub fn new(config_file: &str) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(config_file).map_err(|_| ConfigError::FileError)?;
        Self::from_json(&config_str)
    }

    pub fn from_json(config_str: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(config_str)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        if let Ok(password) = env::var(DATABASE_PASSWORD_VAR) {
            config.database.password = password;
        }
        config.database.ssl_mode()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

pub fn config_path() -> String {
    env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

#[derive(Clone)]
pub struct Context {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
}

impl Context {
    pub async fn new(config: Config) -> Result<Self, ConfigError> {
        let store = connect_store(&config)
            .await
            .map_err(|e| ConfigError::StoreInitError(e.to_string()))?;
        Ok(Self { config, store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_empty_config_uses_defaults() {
        env::remove_var(DATABASE_PASSWORD_VAR);
        let config = Config::from_json("{}").unwrap();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.db_name, "postgres");
        assert!(config.seed_users.is_none());
    }

    #[test]
    #[serial]
    fn test_partial_config() {
        env::remove_var(DATABASE_PASSWORD_VAR);
        let config = Config::from_json(
            r#"{
                "storage": { "backend": "postgres" },
                "database": { "host": "db.internal", "password": "from-file" },
                "seed_users": [{ "github_id": "1", "telegram_id": "t1" }]
            }"#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.password, "from-file");
        assert_eq!(config.database.username, "postgres");
        assert_eq!(config.http.port, 8080);

        let seed = config.seed_users.unwrap();
        assert_eq!(seed.len(), 1);
        assert_eq!(seed[0].telegram_id, "t1");
    }

    #[test]
    #[serial]
    fn test_password_from_env_overrides_file() {
        env::set_var(DATABASE_PASSWORD_VAR, "from-env");
        let config = Config::from_json(r#"{ "database": { "password": "from-file" } }"#);
        env::remove_var(DATABASE_PASSWORD_VAR);

        assert_eq!(config.unwrap().database.password, "from-env");
    }

    #[test]
    #[serial]
    fn test_invalid_ssl_mode_rejected() {
        env::remove_var(DATABASE_PASSWORD_VAR);
        let result = Config::from_json(r#"{ "database": { "ssl_mode": "verify-full" } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidSslMode(mode)) if mode == "verify-full"));
    }

    #[test]
    #[serial]
    fn test_unknown_backend_rejected() {
        let result = Config::from_json(r#"{ "storage": { "backend": "redis" } }"#);
        assert!(matches!(result, Err(ConfigError::DeserializationError(_))));
    }

    #[test]
    #[serial]
    fn test_require_ssl_rejected_at_load() {
        env::remove_var(DATABASE_PASSWORD_VAR);
        let result = Config::from_json(r#"{ "database": { "ssl_mode": "require" } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidSslMode(mode)) if mode == "require"));
    }

    #[test]
    fn test_ssl_modes() {
        let mut database = DatabaseConfig::default();
        assert!(matches!(database.ssl_mode(), Ok(SslMode::Disable)));
        database.ssl_mode = "Disable".to_string();
        assert!(matches!(database.ssl_mode(), Ok(SslMode::Disable)));
        database.ssl_mode = "prefer".to_string();
        assert!(matches!(database.ssl_mode(), Ok(SslMode::Prefer)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let database = DatabaseConfig {
            password: "postgres1G5".to_string(),
            ..Default::default()
        };
        let printed = format!("{:?}", database);
        assert!(!printed.contains("postgres1G5"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::new("does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::FileError)));
    }

    #[tokio::test]
    #[serial]
    async fn test_context_with_seeded_memory_store() {
        env::remove_var(DATABASE_PASSWORD_VAR);
        let config = Config::from_json(
            r#"{ "seed_users": [{ "github_id": "1", "telegram_id": "t1", "roles": "Студент" }] }"#,
        )
        .unwrap();

        let context = Context::new(config).await.unwrap();
        assert_eq!(context.store.get_roles("t1").await.unwrap(), "Студент");
        assert_eq!(context.store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_context_defaults_to_builtin_seed() {
        let context = Context::new(Config::default()).await.unwrap();
        let users = context.store.list().await.unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].github_id, "11242");
    }
}
