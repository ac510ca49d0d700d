use redb::TableDefinition;

/// Key/value namespace: key -> JSON text (or a plain string for the session email)
pub const ENTRIES: TableDefinition<&str, &str> = TableDefinition::new("entries");

/// Registry of generated links: JSON array of `LinkRecord`
pub const LINKS_KEY: &str = "generatedLinks";

/// Currently signed-in email, stored as a plain string
pub const SESSION_EMAIL_KEY: &str = "userEmail";

/// Key holding the JSON array of `MessageRecord` for one link
pub fn messages_key(link_id: &str) -> String {
    format!("messages-{link_id}")
}
