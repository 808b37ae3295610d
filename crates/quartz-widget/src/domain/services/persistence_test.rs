use quartz_types::MessageKind;
use quartz_types::Role;

use super::WidgetStorage;
use crate::domain::models::KeyValueStore;
use crate::domain::models::Message;
use crate::infrastructure::storage::MemoryStore;

fn storage() -> (WidgetStorage, MemoryStore) {
    let store = MemoryStore::default();
    return (WidgetStorage::new(Box::new(store.clone())), store);
}

#[test]
fn it_clears_every_key() {
    let (storage, store) = storage();
    storage.save_open(true);
    storage.save_session("abc123", "Nabeel Ahmad");
    storage.save_history(&[Message::new(Role::Assistant, "Hello!")]);
    assert_eq!(store.len(), 5);

    storage.clear();

    assert!(store.is_empty());
    assert!(!storage.is_open());
    assert_eq!(storage.session_id(), None);
}

#[test]
fn it_treats_empty_session_id_as_missing() {
    let (storage, store) = storage();
    store.set("sessionId", "").unwrap();

    assert_eq!(storage.session_id(), None);
}

#[test]
fn it_keeps_error_kind_in_rendered_history() {
    let (storage, _) = storage();
    let messages = vec![
        Message::new(Role::Assistant, "Hello!"),
        Message::new_with_kind(Role::Assistant, MessageKind::Error, "failed"),
    ];

    storage.save_history(&messages);

    assert_eq!(storage.load_history(), messages);
}

#[test]
fn it_discards_malformed_history() {
    let (storage, store) = storage();
    store.set("chatMessages", "{not json").unwrap();
    store
        .set("gptMessages", r#"[{"role":"assistant","content":"Hello!"}]"#)
        .unwrap();

    assert!(storage.load_history().is_empty());
}
