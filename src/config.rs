use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub inbox: InboxConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Origin used to build shareable message URLs (no trailing slash)
    pub public_origin: String,
}

#[derive(Debug, Clone)]
pub struct InboxConfig {
    /// Maximum message length in characters
    pub max_message_length: usize,
    /// How often clients should re-read links and messages (seconds)
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Redb,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding the redb file
    pub data_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            public_origin: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            max_message_length: 5000,
            poll_interval_seconds: 3,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Redb,
            data_dir: "./data".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let public_origin = std::env::var("PUBLIC_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "redb".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            _ => StorageBackend::Redb,
        };

        let poll_interval_seconds = std::env::var("POLL_INTERVAL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);

        let max_message_length = std::env::var("MAX_MESSAGE_LENGTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        let config = Config {
            inbox: InboxConfig {
                max_message_length,
                poll_interval_seconds,
            },
            server: ServerConfig {
                bind_address,
                public_origin,
            },
            storage: StorageConfig { backend, data_dir },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.public_origin.is_empty() {
            return Err(ConfigError::ValidationError(
                "PUBLIC_ORIGIN cannot be empty".to_string(),
            ));
        }

        if self.inbox.poll_interval_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "POLL_INTERVAL_SECONDS must be greater than 0".to_string(),
            ));
        }

        if self.inbox.max_message_length == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_MESSAGE_LENGTH must be greater than 0".to_string(),
            ));
        }

        if self.storage.backend == StorageBackend::Memory {
            tracing::warn!("Using in-memory storage. Links and messages are lost on restart.");
        }

        Ok(())
    }
}
