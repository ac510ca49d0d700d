//! anon-inbox - shareable anonymous-message links backed by a local key/value store
//!
//! This crate provides:
//! - A link registry and per-link message lists stored as JSON values
//! - Swappable key/value backends (redb on disk, in-memory)
//! - Atomic message append + count update in a single store transaction
//! - REST API mirroring the dashboard, submission form and inbox screens

pub mod api;
pub mod config;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use config::Config;
use storage::{KeyValueStore, LinkRegistry, MessageStore, Session};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub links: LinkRegistry,
    pub messages: MessageStore,
    pub session: Session,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            links: LinkRegistry::new(Arc::clone(&store)),
            messages: MessageStore::new(Arc::clone(&store), config.inbox.max_message_length),
            session: Session::new(store),
            config,
        }
    }
}
