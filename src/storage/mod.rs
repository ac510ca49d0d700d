pub mod db;
pub mod ids;
mod links;
mod memory;
mod messages;
pub mod models;
mod session;
mod store;
mod tables;

pub use db::{Database, DatabaseError};
pub use links::LinkRegistry;
pub use memory::MemoryStore;
pub use messages::MessageStore;
pub use session::Session;
pub use store::{KeyValueStore, Transaction};
pub use tables::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors from inbox operations: input rejected before any write, or a
/// failure in the underlying store.
#[derive(Debug, Error)]
pub enum InboxError {
    #[error("Please enter an email address")]
    EmptyEmail,
    #[error("Please enter a message")]
    EmptyMessage,
    #[error("Message exceeds {max} characters")]
    MessageTooLong { max: usize },
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Decode a stored JSON array for display. Absent or malformed values read as
/// empty; entries that do not fit `T` are skipped.
fn decode_list<T: DeserializeOwned>(raw: Option<String>, key: &str) -> Vec<T> {
    let entries = match load_entries(raw, key) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Treating malformed stored value as empty");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping unreadable stored entry");
                None
            }
        })
        .collect()
}

/// Raw entries of a stored JSON array, for read-modify-write. Entries are kept
/// as they are stored; a value that is not a JSON array is an error and is
/// left untouched.
fn load_entries(raw: Option<String>, key: &str) -> Result<Vec<Value>, DatabaseError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    serde_json::from_str(&raw).map_err(|source| DatabaseError::Corrupt {
        key: key.to_string(),
        source,
    })
}

fn encode_list<T: Serialize>(items: &[T]) -> Result<String, DatabaseError> {
    Ok(serde_json::to_string(items)?)
}
