//! Store effects against real in-memory stores: every operation yields
//! exactly one message, successes carry the store's value and failures
//! carry the store's error.

use pouchfx::{AllDocsOptions, Document, DocumentStore, Error, MemoryStore, Msg, database};

fn note(id: &str, text: &str) -> Document {
    Document::new(id, serde_json::json!({"text": text}))
}

// =========================================================================
// put
// =========================================================================

#[tokio::test]
async fn put_effect_writes_once() {
    let db = MemoryStore::new("local");

    let msgs = database::put(&db, note("n1", "hello")).collect().await;
    assert_eq!(msgs.len(), 1);

    let Msg::RespondPut { value } = &msgs[0] else {
        panic!("expected RespondPut, got {:?}", msgs[0]);
    };
    assert!(value.ok);
    assert_eq!(value.id, "n1");

    let stored = db.get("n1").await.unwrap();
    assert_eq!(stored.rev.as_deref(), Some(value.rev.as_str()));
    assert_eq!(db.doc_count().await, 1);
}

#[tokio::test]
async fn put_effect_surfaces_conflict() {
    let db = MemoryStore::new("local");
    db.put(note("n1", "first")).await.unwrap();

    let msgs = database::put(&db, note("n1", "second")).collect().await;
    assert_eq!(
        msgs,
        vec![Msg::FailPut {
            error: Error::Conflict("n1".into())
        }]
    );
    assert_eq!(db.get("n1").await.unwrap().data["text"], "first");
}

#[tokio::test]
async fn put_effect_with_rev_updates() {
    let db = MemoryStore::new("local");
    let first = db.put(note("n1", "a")).await.unwrap();

    let msgs = database::put(&db, note("n1", "b").with_rev(first.rev))
        .collect()
        .await;
    assert!(matches!(&msgs[..], [Msg::RespondPut { value }] if value.rev.starts_with("2-")));
}

#[tokio::test]
async fn put_effect_does_nothing_until_run() {
    let db = MemoryStore::new("local");
    let effect = database::put(&db, note("n1", "later"));
    assert_eq!(db.doc_count().await, 0);

    effect.collect().await;
    assert_eq!(db.doc_count().await, 1);
}

// =========================================================================
// restore
// =========================================================================

#[tokio::test]
async fn restore_returns_docs_in_row_order() {
    let db = MemoryStore::new("local");
    for (id, text) in [("c", "three"), ("a", "one"), ("b", "two")] {
        db.put(note(id, text)).await.unwrap();
    }

    let msgs = database::restore(&db).collect().await;
    let [Msg::RespondRestore { value }] = &msgs[..] else {
        panic!("expected RespondRestore, got {msgs:?}");
    };

    let expected: Vec<Document> = db
        .all_docs(AllDocsOptions::with_docs())
        .await
        .unwrap()
        .rows
        .into_iter()
        .map(|r| r.doc.unwrap())
        .collect();
    assert_eq!(value, &expected);

    let texts: Vec<&str> = value.iter().map(|d| d.data["text"].as_str().unwrap()).collect();
    assert_eq!(texts, ["one", "two", "three"]);
    assert_eq!(value[0].id, "a");
}

#[tokio::test]
async fn restored_document_updates_in_place() {
    let db = MemoryStore::new("local");
    db.put(note("a", "draft")).await.unwrap();

    let msgs = database::restore(&db).collect().await;
    let [Msg::RespondRestore { value }] = &msgs[..] else {
        panic!("expected RespondRestore, got {msgs:?}");
    };
    let mut doc = value[0].clone();
    doc.data.insert("text".into(), "final".into());

    let msgs = database::put(&db, doc).collect().await;
    assert!(matches!(&msgs[..], [Msg::RespondPut { .. }]));
    assert_eq!(db.get("a").await.unwrap().data["text"], "final");
}

#[tokio::test]
async fn restore_empty_store() {
    let db = MemoryStore::new("empty");
    let msgs = database::restore(&db).collect().await;
    assert_eq!(msgs, vec![Msg::RespondRestore { value: vec![] }]);
}

#[tokio::test]
async fn request_restore_keeps_model() {
    let db = MemoryStore::new("local");
    db.put(note("a", "x")).await.unwrap();

    let model = String::from("untouched");
    let ptr = model.as_ptr();
    let (model, effect) = database::request_restore(model, &db);
    assert_eq!(model.as_ptr(), ptr);
    assert_eq!(model, "untouched");

    let msgs = effect.collect().await;
    assert!(matches!(&msgs[..], [Msg::RespondRestore { value }] if value.len() == 1));
}

// =========================================================================
// push / pull / sync
// =========================================================================

#[tokio::test]
async fn push_effect_replicates_to_remote() {
    let local = MemoryStore::new("local");
    let remote = MemoryStore::new("remote");
    local.put(note("a", "1")).await.unwrap();
    local.put(note("b", "2")).await.unwrap();

    let msgs = database::push(&local, &remote).collect().await;
    let [Msg::CompletePush { value }] = &msgs[..] else {
        panic!("expected CompletePush, got {msgs:?}");
    };
    assert!(value.ok);
    assert_eq!(value.docs_written, 2);
    assert_eq!(remote.doc_count().await, 2);
}

#[tokio::test]
async fn pull_effect_replicates_from_remote() {
    let local = MemoryStore::new("local");
    let remote = MemoryStore::new("remote");
    remote.put(note("r", "1")).await.unwrap();

    let (_, effect) = database::request_pull((), &local, &remote);
    let msgs = effect.collect().await;
    let [Msg::CompletePull { value }] = &msgs[..] else {
        panic!("expected CompletePull, got {msgs:?}");
    };
    assert_eq!(value.docs_written, 1);
    assert_eq!(local.get("r").await.unwrap().data["text"], "1");
    // Pull is one-way
    assert_eq!(remote.doc_count().await, 1);
}

#[tokio::test]
async fn sync_effect_goes_both_ways() {
    let local = MemoryStore::new("local");
    let remote = MemoryStore::new("remote");
    local.put(note("l", "")).await.unwrap();
    remote.put(note("r", "")).await.unwrap();

    let msgs = database::sync(&local, &remote).collect().await;
    let [Msg::CompleteSync { value }] = &msgs[..] else {
        panic!("expected CompleteSync, got {msgs:?}");
    };
    assert!(value.ok());
    assert_eq!(value.push.docs_written, 1);
    assert_eq!(value.pull.docs_written, 1);
    assert_eq!(local.doc_count().await, 2);
    assert_eq!(remote.doc_count().await, 2);
}

#[tokio::test]
async fn push_reports_diverged_documents() {
    let local = MemoryStore::new("local");
    let remote = MemoryStore::new("remote");
    let base = local.put(note("n", "base")).await.unwrap();
    local.replicate_to(&remote).await.unwrap();
    local.put(note("n", "mine").with_rev(&base.rev)).await.unwrap();
    remote.put(note("n", "theirs").with_rev(&base.rev)).await.unwrap();

    let msgs = database::push(&local, &remote).collect().await;
    let [Msg::CompletePush { value }] = &msgs[..] else {
        panic!("expected CompletePush, got {msgs:?}");
    };
    assert!(!value.ok);
    assert_eq!(value.docs_written, 0);
    assert_eq!(value.errors.len(), 1);
}
