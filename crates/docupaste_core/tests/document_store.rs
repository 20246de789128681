use docupaste_core::config::{DEFAULT_CURRENT_KEY, DEFAULT_DOCUMENTS_KEY};
use docupaste_core::db::{open_db, open_db_in_memory};
use docupaste_core::model::document::{WELCOME_DOCUMENT_ID, WELCOME_DOCUMENT_TITLE};
use docupaste_core::{
    Document, DocumentStore, KvRepository, LoadSource, MemoryKvRepository, RepoError,
    SqliteKvRepository, StoreConfig, StoreError, StoreEvent,
};
use std::cell::RefCell;
use std::rc::Rc;

fn empty_store() -> DocumentStore<MemoryKvRepository> {
    let mut repo = MemoryKvRepository::new();
    repo.set_value(DEFAULT_DOCUMENTS_KEY, "[]").unwrap();
    DocumentStore::load(repo, StoreConfig::default()).unwrap()
}

#[test]
fn fresh_storage_seeds_single_welcome_document() {
    let store = DocumentStore::load(MemoryKvRepository::new(), StoreConfig::default()).unwrap();

    assert_eq!(store.load_source(), LoadSource::Bootstrap);
    assert_eq!(store.len(), 1);
    let welcome = &store.list()[0];
    assert_eq!(welcome.id, WELCOME_DOCUMENT_ID);
    assert_eq!(welcome.title, WELCOME_DOCUMENT_TITLE);
    assert_eq!(store.current(), Some(welcome));

    let persisted = store.repo().get_value(DEFAULT_DOCUMENTS_KEY).unwrap();
    assert!(persisted.unwrap().contains(WELCOME_DOCUMENT_TITLE));
    assert!(store.repo().get_value(DEFAULT_CURRENT_KEY).unwrap().is_some());
}

#[test]
fn malformed_persisted_state_falls_back_to_welcome() {
    let mut repo = MemoryKvRepository::new();
    repo.set_value(DEFAULT_DOCUMENTS_KEY, "{\"not\": \"a list\"").unwrap();

    let store = DocumentStore::load(repo, StoreConfig::default()).unwrap();
    assert_eq!(store.load_source(), LoadSource::Recovered);
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].id, WELCOME_DOCUMENT_ID);
}

#[test]
fn malformed_current_snapshot_falls_back_to_first_document() {
    let mut store = empty_store();
    let first = store.create("first", "a").unwrap();
    store.create("second", "b").unwrap();
    let mut repo = store.close().unwrap();
    repo.set_value(DEFAULT_CURRENT_KEY, "garbage").unwrap();

    let reloaded = DocumentStore::load(repo, StoreConfig::default()).unwrap();
    assert_eq!(reloaded.current().map(|doc| doc.id.as_str()), Some(first.id.as_str()));
}

#[test]
fn create_appends_and_becomes_current() {
    let mut store = empty_store();
    let first = store.create("First", "alpha").unwrap();
    let second = store.create("Second", "beta").unwrap();

    assert_eq!(second.title, "Second");
    assert_eq!(second.content, "beta");
    assert_eq!(second.created_at, second.updated_at);
    assert_ne!(first.id, second.id);
    assert_eq!(store.list().last(), Some(&second));
    assert_eq!(store.current(), Some(&second));
}

#[test]
fn update_replaces_fields_and_refreshes_current_snapshot() {
    let mut store = empty_store();
    let doc = store.create("Draft", "v1").unwrap();

    assert!(store.update(&doc.id, "Final", "v2").unwrap());

    let updated = store.get(&doc.id).unwrap().clone();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "v2");
    assert_eq!(updated.created_at, doc.created_at);
    assert!(updated.updated_at > doc.updated_at);
    assert_eq!(store.len(), 1);
    assert_eq!(store.current(), Some(&updated));
}

#[test]
fn update_of_non_current_document_leaves_current_alone() {
    let mut store = empty_store();
    let first = store.create("first", "a").unwrap();
    let second = store.create("second", "b").unwrap();

    assert!(store.update(&first.id, "first v2", "a2").unwrap());
    assert_eq!(store.current(), Some(&second));
}

#[test]
fn update_and_delete_of_unknown_id_are_noops() {
    let mut store = empty_store();
    let doc = store.create("only", "text").unwrap();
    let before = store.list().to_vec();

    assert!(!store.update("missing", "x", "y").unwrap());
    assert!(!store.delete("missing").unwrap());
    assert_eq!(store.list(), before.as_slice());
    assert_eq!(store.current(), Some(&doc));
}

#[test]
fn deleting_current_moves_to_first_remaining_document() {
    let mut store = empty_store();
    let first = store.create("first", "a").unwrap();
    let second = store.create("second", "b").unwrap();
    let third = store.create("third", "c").unwrap();

    assert!(store.delete(&third.id).unwrap());
    assert_eq!(store.len(), 2);
    assert_eq!(store.current(), Some(&first));

    store.set_current(Some(second.clone())).unwrap();
    assert!(store.delete(&first.id).unwrap());
    assert_eq!(store.current(), Some(&second));
}

#[test]
fn deleting_last_document_clears_current_and_persisted_snapshot() {
    let mut store = empty_store();
    let only = store.create("only", "text").unwrap();

    assert!(store.delete(&only.id).unwrap());
    assert!(store.is_empty());
    assert_eq!(store.current(), None);
    assert_eq!(
        store.repo().get_value(DEFAULT_CURRENT_KEY).unwrap().as_deref(),
        Some("null")
    );
    assert_eq!(
        store.repo().get_value(DEFAULT_DOCUMENTS_KEY).unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn deleting_non_current_document_keeps_current() {
    let mut store = empty_store();
    let first = store.create("first", "a").unwrap();
    let second = store.create("second", "b").unwrap();

    assert!(store.delete(&first.id).unwrap());
    assert_eq!(store.current(), Some(&second));
}

#[test]
fn set_current_accepts_none_and_unlisted_documents() {
    let mut store = empty_store();
    store.create("first", "a").unwrap();

    store.set_current(None).unwrap();
    assert_eq!(store.current(), None);

    let outsider = Document::new("outsider", "not in the store");
    store.set_current(Some(outsider.clone())).unwrap();
    assert_eq!(store.current(), Some(&outsider));
}

#[test]
fn cleared_current_survives_reload() {
    let mut store = empty_store();
    store.create("a", "alpha").unwrap();
    store.set_current(None).unwrap();
    let repo = store.close().unwrap();

    let reloaded = DocumentStore::load(repo, StoreConfig::default()).unwrap();
    assert_eq!(reloaded.load_source(), LoadSource::Persisted);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.current(), None);
}

#[test]
fn missing_current_key_falls_back_to_first_document() {
    let mut store = empty_store();
    let first = store.create("first", "a").unwrap();
    store.create("second", "b").unwrap();
    let mut repo = store.close().unwrap();
    assert!(repo.remove_value(DEFAULT_CURRENT_KEY).unwrap());

    let reloaded = DocumentStore::load(repo, StoreConfig::default()).unwrap();
    assert_eq!(reloaded.current(), Some(&first));
}

#[test]
fn cleared_current_survives_sqlite_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        let mut store = DocumentStore::load(repo, StoreConfig::default()).unwrap();
        store.create("kept", "text").unwrap();
        store.set_current(None).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let store = DocumentStore::load(repo, StoreConfig::default()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.current(), None);
}

#[test]
fn search_matches_title_or_content_case_insensitively_in_order() {
    let mut store = empty_store();
    let a = store.create("Shopping", "Buy MILK").unwrap();
    store.create("Ideas", "nothing relevant").unwrap();
    let c = store.create("milk recipes", "pancakes").unwrap();

    let results = store.search("Milk");
    assert_eq!(results, vec![a, c]);
    assert_eq!(store.search("Milk"), results);
}

#[test]
fn blank_queries_return_nothing() {
    let mut store = empty_store();
    store.create("title", "   ").unwrap();

    assert!(store.search("").is_empty());
    assert!(store.search("   ").is_empty());
    assert!(store.search_hits("\t").is_empty());
}

#[test]
fn search_hits_include_highlighted_snippet() {
    let mut store = empty_store();
    let doc = store.create("Notes", "The quick brown fox").unwrap();

    let hits = store.search_hits("QUICK");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, doc.id);
    assert_eq!(hits[0].snippet, "The quick brown fox");
    assert_eq!(
        hits[0].highlighted,
        r#"The <span class="bg-yellow-200">quick</span> brown fox"#
    );
}

#[test]
fn listeners_receive_events_for_each_mutation() {
    let mut store = empty_store();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let doc = store.create("t", "c").unwrap();
    store.update(&doc.id, "t2", "c2").unwrap();
    store.update("missing", "x", "y").unwrap();
    store.delete(&doc.id).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            StoreEvent::Created { id: doc.id.clone() },
            StoreEvent::CurrentChanged {
                id: Some(doc.id.clone())
            },
            StoreEvent::Updated { id: doc.id.clone() },
            StoreEvent::Deleted { id: doc.id.clone() },
            StoreEvent::CurrentChanged { id: None },
        ]
    );
}

#[test]
fn state_survives_reload_from_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite3");

    let (first, second) = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        let mut store = DocumentStore::load(repo, StoreConfig::default()).unwrap();
        let first = store.create("first", "alpha").unwrap();
        let second = store.create("second", "beta").unwrap();
        store.set_current(Some(first.clone())).unwrap();
        store.close().unwrap();
        (first, second)
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let store = DocumentStore::load(repo, StoreConfig::default()).unwrap();

    assert_eq!(store.load_source(), LoadSource::Persisted);
    let ids: Vec<_> = store.list().iter().map(|doc| doc.id.clone()).collect();
    assert_eq!(
        ids,
        vec![WELCOME_DOCUMENT_ID.to_string(), first.id.clone(), second.id]
    );
    assert_eq!(store.current(), Some(&first));
}

#[test]
fn namespaced_stores_share_one_database_independently() {
    let conn = open_db_in_memory().unwrap();

    let mut work = DocumentStore::load(
        SqliteKvRepository::try_new(&conn).unwrap(),
        StoreConfig::with_namespace("work"),
    )
    .unwrap();
    work.create("report", "q3").unwrap();

    let home = DocumentStore::load(
        SqliteKvRepository::try_new(&conn).unwrap(),
        StoreConfig::with_namespace("home"),
    )
    .unwrap();

    assert_eq!(work.len(), 2);
    assert_eq!(home.len(), 1);
}

#[test]
fn identical_keys_are_rejected() {
    let config = StoreConfig {
        documents_key: "same".to_string(),
        current_key: "same".to_string(),
    };
    let err = DocumentStore::load(MemoryKvRepository::new(), config)
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::KeyCollision(_)));
}

#[test]
fn write_failure_propagates_and_keeps_in_memory_state() {
    let mut repo = MemoryKvRepository::with_quota(4_096);
    repo.set_value(DEFAULT_DOCUMENTS_KEY, "[]").unwrap();
    let mut store = DocumentStore::load(repo, StoreConfig::default()).unwrap();

    let err = store.create("huge", "x".repeat(10_000)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Repo(RepoError::QuotaExceeded { .. })
    ));
    assert_eq!(store.len(), 1);
    assert_eq!(store.current().map(|doc| doc.title.as_str()), Some("huge"));
    assert_eq!(
        store.repo().get_value(DEFAULT_DOCUMENTS_KEY).unwrap().as_deref(),
        Some("[]")
    );
}
