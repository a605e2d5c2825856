//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Message broker configuration.
    pub amqp: AmqpConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Message broker (RabbitMQ) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AmqpConfig {
    /// AMQP connection URL.
    #[serde(default = "default_amqp_url")]
    pub url: String,
    /// Queue that receives strategic-rebranding corporate action events.
    ///
    /// When absent, creating a rebranding record fails with a not-found
    /// error after the database write has committed.
    #[serde(default)]
    pub rebranding_queue: Option<String>,
}

fn default_amqp_url() -> String {
    "amqp://localhost".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("RITEFOLIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let server: ServerConfig = serde_json::from_str("{}").expect("defaults apply");
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_database_defaults() {
        let db: DatabaseConfig =
            serde_json::from_str(r#"{"url": "postgres://localhost/ritefolio"}"#)
                .expect("defaults apply");
        assert_eq!(db.max_connections, 10);
        assert_eq!(db.min_connections, 1);
    }

    #[test]
    fn test_amqp_defaults() {
        let amqp: AmqpConfig = serde_json::from_str("{}").expect("defaults apply");
        assert_eq!(amqp.url, "amqp://localhost");
        assert!(amqp.rebranding_queue.is_none());
    }

    #[test]
    fn test_amqp_queue_configured() {
        let amqp: AmqpConfig =
            serde_json::from_str(r#"{"rebranding_queue": "corp-action-rebranding"}"#)
                .expect("valid config");
        assert_eq!(amqp.rebranding_queue.as_deref(), Some("corp-action-rebranding"));
    }

    #[test]
    fn test_load_from_env() {
        temp_env::with_vars(
            [
                ("RITEFOLIO__DATABASE__URL", Some("postgres://env/db")),
                ("RITEFOLIO__AMQP__URL", Some("amqp://broker:5672")),
                ("RITEFOLIO__AMQP__REBRANDING_QUEUE", Some("rebranding")),
            ],
            || {
                let config = AppConfig::load().expect("config loads from env");
                assert_eq!(config.database.url, "postgres://env/db");
                assert_eq!(config.amqp.url, "amqp://broker:5672");
                assert_eq!(config.amqp.rebranding_queue.as_deref(), Some("rebranding"));
            },
        );
    }
}
