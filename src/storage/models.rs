use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix that turns a link id into its public subdomain token.
pub const LINK_PREFIX: &str = "msg-";

/// A generated link, stored in the `generatedLinks` registry.
///
/// Field names follow the persisted JSON layout, so records written by older
/// clients load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: String,
    pub subdomain: String,
    pub created_at: DateTime<Utc>,
    /// Mirrors the length of the link's message list.
    #[serde(default)]
    pub message_count: u64,
    #[serde(
        default,
        rename = "userEmail",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_email: Option<String>,
}

impl LinkRecord {
    pub fn new(id: String, owner_email: Option<String>) -> Self {
        Self {
            subdomain: format!("{LINK_PREFIX}{id}"),
            id,
            created_at: Utc::now(),
            message_count: 0,
            owner_email,
        }
    }

    /// Public URL where visitors submit messages to this link.
    pub fn share_url(&self, origin: &str) -> String {
        share_url(origin, &self.subdomain)
    }
}

/// An anonymous message, stored under `messages-{link_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(id: String, content: String) -> Self {
        Self {
            id,
            content,
            timestamp: Utc::now(),
        }
    }
}

pub fn share_url(origin: &str, subdomain: &str) -> String {
    format!("{}/message/{subdomain}", origin.trim_end_matches('/'))
}

/// Recover the link id from a subdomain token. Tokens without the prefix are
/// taken to be bare ids.
pub fn link_id_from_subdomain(subdomain: &str) -> &str {
    subdomain.strip_prefix(LINK_PREFIX).unwrap_or(subdomain)
}
