use serde_json::Value;
use std::sync::Arc;

use super::db::DatabaseError;
use super::ids::generate_id;
use super::models::LinkRecord;
use super::store::{KeyValueStore, Transaction};
use super::tables::*;
use super::{decode_list, encode_list, load_entries};

/// Creates, enumerates and updates the registry of generated links.
#[derive(Clone)]
pub struct LinkRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl LinkRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All links in creation order.
    pub fn list_links(&self) -> Result<Vec<LinkRecord>, DatabaseError> {
        Ok(decode_list(self.store.get(LINKS_KEY)?, LINKS_KEY))
    }

    /// Register a new link and give it an empty message list.
    pub fn create_link(&self, owner_email: Option<&str>) -> Result<LinkRecord, DatabaseError> {
        let link = LinkRecord::new(generate_id(), owner_email.map(str::to_string));

        self.store.write(&mut |txn: &mut dyn Transaction| {
            let mut links = load_entries(txn.get(LINKS_KEY)?, LINKS_KEY)?;
            links.push(serde_json::to_value(&link)?);
            txn.set(LINKS_KEY, &encode_list(&links)?)?;
            txn.set(&messages_key(&link.id), "[]")?;
            Ok(())
        })?;

        tracing::debug!(link_id = %link.id, owner = ?link.owner_email, "Created link");
        Ok(link)
    }

    pub fn find_link(&self, id: &str) -> Result<Option<LinkRecord>, DatabaseError> {
        Ok(self.list_links()?.into_iter().find(|link| link.id == id))
    }

    /// Overwrite a link's message count. Returns false if no link has this id.
    pub fn increment_message_count(&self, id: &str, new_count: u64) -> Result<bool, DatabaseError> {
        let mut found = false;
        self.store.write(&mut |txn: &mut dyn Transaction| {
            found = set_message_count(txn, id, new_count)?;
            Ok(())
        })?;
        Ok(found)
    }
}

/// Set `messageCount` on the matching link inside an open transaction,
/// leaving every other field and every other entry as stored.
pub(super) fn set_message_count(
    txn: &mut dyn Transaction,
    id: &str,
    count: u64,
) -> Result<bool, DatabaseError> {
    let mut links = load_entries(txn.get(LINKS_KEY)?, LINKS_KEY)?;

    let Some(link) = links
        .iter_mut()
        .filter_map(Value::as_object_mut)
        .find(|fields| fields.get("id").and_then(Value::as_str) == Some(id))
    else {
        return Ok(false);
    };
    link.insert("messageCount".to_string(), Value::from(count));

    txn.set(LINKS_KEY, &encode_list(&links)?)?;
    Ok(true)
}
