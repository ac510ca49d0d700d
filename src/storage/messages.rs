use std::sync::Arc;

use super::ids::generate_id;
use super::links::set_message_count;
use super::models::MessageRecord;
use super::store::{KeyValueStore, Transaction};
use super::tables::*;
use super::{decode_list, encode_list, load_entries, InboxError};

/// Appends and lists the messages submitted to each link.
#[derive(Clone)]
pub struct MessageStore {
    store: Arc<dyn KeyValueStore>,
    max_length: usize,
}

impl MessageStore {
    pub fn new(store: Arc<dyn KeyValueStore>, max_length: usize) -> Self {
        Self { store, max_length }
    }

    /// Messages for a link, newest first.
    pub fn list_messages(&self, link_id: &str) -> Result<Vec<MessageRecord>, InboxError> {
        let key = messages_key(link_id);
        let mut messages: Vec<MessageRecord> = decode_list(self.store.get(&key)?, &key);
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    /// Store a message and bring the link's count in line, in one write.
    ///
    /// The link id is not checked against the registry; messages sent to an
    /// unknown id are kept under that id and no count is updated.
    pub fn append_message(
        &self,
        link_id: &str,
        content: &str,
    ) -> Result<MessageRecord, InboxError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(InboxError::EmptyMessage);
        }
        if content.chars().count() > self.max_length {
            return Err(InboxError::MessageTooLong {
                max: self.max_length,
            });
        }

        let message = MessageRecord::new(generate_id(), content.to_string());
        let key = messages_key(link_id);
        let mut total = 0;
        let mut linked = false;

        self.store.write(&mut |txn: &mut dyn Transaction| {
            let mut messages = load_entries(txn.get(&key)?, &key)?;
            messages.push(serde_json::to_value(&message)?);
            txn.set(&key, &encode_list(&messages)?)?;

            total = messages.len() as u64;
            linked = set_message_count(txn, link_id, total)?;
            Ok(())
        })?;

        tracing::debug!(
            link_id = %link_id,
            message_id = %message.id,
            total,
            linked,
            "Appended message"
        );
        Ok(message)
    }
}
