//! Shared test helpers for anon-inbox unit tests.

use std::sync::Arc;

use crate::config::{Config, InboxConfig, ServerConfig, StorageConfig};
use crate::storage::Database;
use crate::AppState;

pub const TEST_ORIGIN: &str = "http://inbox.test";

/// Create a test AppState backed by a redb file in a temporary directory.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");

    let config = Config {
        inbox: InboxConfig {
            max_message_length: 100,
            ..InboxConfig::default()
        },
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            public_origin: TEST_ORIGIN.to_string(),
        },
        storage: StorageConfig {
            data_dir: data_dir.to_string_lossy().to_string(),
            ..StorageConfig::default()
        },
    };

    let db = Database::open(&data_dir).expect("Failed to open test database");
    Arc::new(AppState::new(config, Arc::new(db)))
}
