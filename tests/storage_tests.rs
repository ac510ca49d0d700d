use std::collections::HashSet;
use std::sync::Arc;

use anon_inbox::storage::models::{LinkRecord, MessageRecord};
use anon_inbox::storage::{
    messages_key, Database, DatabaseError, InboxError, KeyValueStore, LinkRegistry, MemoryStore, MessageStore,
    Session, LINKS_KEY,
};

fn test_db() -> (tempfile::TempDir, Arc<dyn KeyValueStore>) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, Arc::new(db))
}

fn managers(store: &Arc<dyn KeyValueStore>) -> (LinkRegistry, MessageStore) {
    (
        LinkRegistry::new(Arc::clone(store)),
        MessageStore::new(Arc::clone(store), 5000),
    )
}

#[test]
fn test_list_links_empty() {
    let (_dir, store) = test_db();
    let (links, _) = managers(&store);
    assert!(links.list_links().unwrap().is_empty());
}

#[test]
fn test_links_listed_in_creation_order() {
    let (_dir, store) = test_db();
    let (links, _) = managers(&store);

    let created: Vec<LinkRecord> = (0..5).map(|_| links.create_link(None).unwrap()).collect();
    let listed = links.list_links().unwrap();

    assert_eq!(listed, created);
    let ids: HashSet<&str> = listed.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
}

#[test]
fn test_new_link_starts_empty() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);

    let link = links.create_link(Some("me@example.com")).unwrap();
    assert_eq!(link.message_count, 0);
    assert_eq!(link.subdomain, format!("msg-{}", link.id));
    assert_eq!(link.owner_email.as_deref(), Some("me@example.com"));

    assert!(messages.list_messages(&link.id).unwrap().is_empty());
    assert_eq!(
        store.get(&messages_key(&link.id)).unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn test_find_link() {
    let (_dir, store) = test_db();
    let (links, _) = managers(&store);

    let link = links.create_link(None).unwrap();
    assert_eq!(links.find_link(&link.id).unwrap(), Some(link));
    assert!(links.find_link("nonexistent").unwrap().is_none());
}

#[test]
fn test_increment_message_count_only_touches_count() {
    let (_dir, store) = test_db();
    let (links, _) = managers(&store);

    let first = links.create_link(Some("a@example.com")).unwrap();
    let second = links.create_link(None).unwrap();

    assert!(links.increment_message_count(&first.id, 7).unwrap());

    let updated = links.find_link(&first.id).unwrap().unwrap();
    assert_eq!(updated.message_count, 7);
    assert_eq!(updated.subdomain, first.subdomain);
    assert_eq!(updated.created_at, first.created_at);
    assert_eq!(updated.owner_email, first.owner_email);
    assert_eq!(links.find_link(&second.id).unwrap(), Some(second));
}

#[test]
fn test_increment_message_count_unknown_link() {
    let (_dir, store) = test_db();
    let (links, _) = managers(&store);
    links.create_link(None).unwrap();

    assert!(!links.increment_message_count("nonexistent", 3).unwrap());
    assert!(links.list_links().unwrap().iter().all(|l| l.message_count == 0));
}

#[test]
fn test_append_message_updates_count() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);
    let link = links.create_link(None).unwrap();

    for (i, text) in ["first", "second", "third"].iter().enumerate() {
        let message = messages.append_message(&link.id, text).unwrap();
        assert_eq!(message.content, *text);

        let listed = messages.list_messages(&link.id).unwrap();
        assert_eq!(listed.len(), i + 1);
        let stored = links.find_link(&link.id).unwrap().unwrap();
        assert_eq!(stored.message_count, listed.len() as u64);
    }
}

#[test]
fn test_append_message_trims_content() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);
    let link = links.create_link(None).unwrap();

    let message = messages.append_message(&link.id, "\n  hello there \t").unwrap();
    assert_eq!(message.content, "hello there");
}

#[test]
fn test_blank_messages_rejected_without_changes() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);
    let link = links.create_link(None).unwrap();
    messages.append_message(&link.id, "kept").unwrap();

    for blank in ["", "   ", "\n\t"] {
        let result = messages.append_message(&link.id, blank);
        assert!(matches!(result, Err(InboxError::EmptyMessage)));
    }

    assert_eq!(messages.list_messages(&link.id).unwrap().len(), 1);
    assert_eq!(links.find_link(&link.id).unwrap().unwrap().message_count, 1);
}

#[test]
fn test_message_length_limit() {
    let (_dir, store) = test_db();
    let links = LinkRegistry::new(Arc::clone(&store));
    let messages = MessageStore::new(Arc::clone(&store), 5);
    let link = links.create_link(None).unwrap();

    assert!(messages.append_message(&link.id, "héllo").is_ok());
    assert!(matches!(
        messages.append_message(&link.id, "toolong"),
        Err(InboxError::MessageTooLong { max: 5 })
    ));
}

#[test]
fn test_messages_listed_newest_first() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);
    let link = links.create_link(None).unwrap();

    for text in ["a", "b", "c", "d"] {
        messages.append_message(&link.id, text).unwrap();
    }

    let listed = messages.list_messages(&link.id).unwrap();
    assert_eq!(listed.len(), 4);
    for pair in listed.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}

#[test]
fn test_sorting_follows_timestamps_not_storage_order() {
    let (_dir, store) = test_db();
    let (_, messages) = managers(&store);

    let raw = r#"[
        {"id":"old","content":"old","timestamp":"2024-01-01T00:00:00.000Z"},
        {"id":"new","content":"new","timestamp":"2024-06-01T00:00:00.000Z"},
        {"id":"mid","content":"mid","timestamp":"2024-03-01T00:00:00.000Z"}
    ]"#;
    store.set(&messages_key("legacy"), raw).unwrap();

    let ids: Vec<String> = messages
        .list_messages("legacy")
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, ["new", "mid", "old"]);
}

#[test]
fn test_message_to_unregistered_link_is_kept() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);

    messages.append_message("orphan", "hello").unwrap();

    assert_eq!(messages.list_messages("orphan").unwrap().len(), 1);
    assert!(links.list_links().unwrap().is_empty());
}

#[test]
fn test_corrupted_registry_reads_as_empty() {
    let (_dir, store) = test_db();
    let (links, _) = managers(&store);

    store.set(LINKS_KEY, "definitely not json").unwrap();
    assert!(links.list_links().unwrap().is_empty());
    assert!(links.find_link("anything").unwrap().is_none());

    // Writes refuse to replace a value they cannot parse
    assert!(matches!(
        links.create_link(None),
        Err(DatabaseError::Corrupt { .. })
    ));
    assert_eq!(
        store.get(LINKS_KEY).unwrap().as_deref(),
        Some("definitely not json")
    );
}

#[test]
fn test_corrupted_message_list_left_untouched() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);
    let link = links.create_link(None).unwrap();

    store.set(&messages_key(&link.id), "[{\"broken\":").unwrap();
    assert!(messages.list_messages(&link.id).unwrap().is_empty());

    assert!(matches!(
        messages.append_message(&link.id, "fresh"),
        Err(InboxError::Database(DatabaseError::Corrupt { .. }))
    ));
    assert_eq!(
        store.get(&messages_key(&link.id)).unwrap().as_deref(),
        Some("[{\"broken\":")
    );
    assert_eq!(links.find_link(&link.id).unwrap().unwrap().message_count, 0);
}

#[test]
fn test_append_keeps_unreadable_message_entries() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);
    let link = links.create_link(None).unwrap();

    let raw = r#"[
        {"id":"a","content":"keep me","timestamp":"2024-01-01T00:00:00.000Z"},
        {"id":"b","content":"x","timestamp":"yesterday"}
    ]"#;
    store.set(&messages_key(&link.id), raw).unwrap();

    let listed = messages.list_messages(&link.id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "keep me");

    messages.append_message(&link.id, "new").unwrap();

    let contents: Vec<String> = messages
        .list_messages(&link.id)
        .unwrap()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, ["new", "keep me"]);

    let stored: Vec<serde_json::Value> =
        serde_json::from_str(&store.get(&messages_key(&link.id)).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[1]["timestamp"], "yesterday");
    assert_eq!(links.find_link(&link.id).unwrap().unwrap().message_count, 3);
}

#[test]
fn test_registry_writes_keep_unreadable_link_entries() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);

    let raw = r#"[
        {"id":"good","subdomain":"msg-good","createdAt":"2024-01-01T00:00:00.000Z","messageCount":0,"note":"extra"},
        {"id":"nosub","createdAt":"2024-01-02T00:00:00.000Z","messageCount":4}
    ]"#;
    store.set(LINKS_KEY, raw).unwrap();
    assert_eq!(links.list_links().unwrap().len(), 1);

    let created = links.create_link(None).unwrap();
    messages.append_message("good", "hello").unwrap();

    let ids: Vec<String> = links.list_links().unwrap().into_iter().map(|l| l.id).collect();
    assert_eq!(ids, ["good".to_string(), created.id]);
    assert_eq!(links.find_link("good").unwrap().unwrap().message_count, 1);

    let stored: Vec<serde_json::Value> =
        serde_json::from_str(&store.get(LINKS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0]["note"], "extra");
    assert_eq!(stored[1]["id"], "nosub");
    assert_eq!(stored[1]["messageCount"], 4);
}

#[test]
fn test_registry_and_messages_round_trip() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);
    let link = links.create_link(Some("me@example.com")).unwrap();
    messages.append_message(&link.id, "one").unwrap();
    messages.append_message(&link.id, "two").unwrap();

    let raw_links = store.get(LINKS_KEY).unwrap().unwrap();
    let decoded: Vec<LinkRecord> = serde_json::from_str(&raw_links).unwrap();
    assert_eq!(decoded, links.list_links().unwrap());

    let raw_messages = store.get(&messages_key(&link.id)).unwrap().unwrap();
    let decoded: Vec<MessageRecord> = serde_json::from_str(&raw_messages).unwrap();
    let reencoded = serde_json::to_string(&decoded).unwrap();
    let again: Vec<MessageRecord> = serde_json::from_str(&reencoded).unwrap();
    assert_eq!(decoded, again);
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let link_id = {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(Database::open(dir.path().join("data")).unwrap());
        let (links, messages) = managers(&store);
        let link = links.create_link(None).unwrap();
        messages.append_message(&link.id, "persisted").unwrap();
        link.id
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(Database::open(dir.path().join("data")).unwrap());
    let (links, messages) = managers(&store);
    assert_eq!(links.find_link(&link_id).unwrap().unwrap().message_count, 1);
    assert_eq!(messages.list_messages(&link_id).unwrap()[0].content, "persisted");
}

#[test]
fn test_concurrent_appends_lose_nothing() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);
    let link = links.create_link(None).unwrap();

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let messages = messages.clone();
            let link_id = link.id.clone();
            scope.spawn(move || {
                for i in 0..10 {
                    messages
                        .append_message(&link_id, &format!("worker {worker} message {i}"))
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(messages.list_messages(&link.id).unwrap().len(), 40);
    assert_eq!(links.find_link(&link.id).unwrap().unwrap().message_count, 40);
}

#[test]
fn test_memory_store_matches_database_behavior() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let (links, messages) = managers(&store);

    let link = links.create_link(None).unwrap();
    messages.append_message(&link.id, "hello").unwrap();

    let inbox = messages.list_messages(&link.id).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].content, "hello");
    assert_eq!(links.find_link(&link.id).unwrap().unwrap().message_count, 1);
}

#[test]
fn test_session_sign_in_and_out() {
    let (_dir, store) = test_db();
    let session = Session::new(Arc::clone(&store));

    assert!(session.current_email().unwrap().is_none());
    assert!(matches!(session.sign_in("  "), Err(InboxError::EmptyEmail)));

    assert_eq!(session.sign_in(" me@example.com ").unwrap(), "me@example.com");
    assert_eq!(
        session.current_email().unwrap().as_deref(),
        Some("me@example.com")
    );

    session.sign_out().unwrap();
    assert!(session.current_email().unwrap().is_none());
}

#[test]
fn test_share_link_scenario() {
    let (_dir, store) = test_db();
    let (links, messages) = managers(&store);

    let link = links.create_link(None).unwrap();
    let url = link.share_url("https://inbox.example");
    assert_eq!(url, format!("https://inbox.example/message/msg-{}", link.id));

    let subdomain = url.rsplit('/').next().unwrap();
    let link_id = anon_inbox::storage::models::link_id_from_subdomain(subdomain);
    messages.append_message(link_id, "hello").unwrap();

    let inbox = messages.list_messages(&link.id).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].content, "hello");
    assert_eq!(links.find_link(&link.id).unwrap().unwrap().message_count, 1);
}
