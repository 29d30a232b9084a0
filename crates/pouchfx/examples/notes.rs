//! Save a few notes, push them to a second database and restore the list,
//! all through the update loop.
//!
//! Run with `RUST_LOG=debug` to see effects being created and settled.
use pouchfx::{Document, Effect, MemoryStore, Msg, Runtime, RuntimeOptions, database};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Model {
    pending: usize,
    notes: Vec<Document>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let local = MemoryStore::new("notes");
    let remote = MemoryStore::new("backup");

    let texts = ["buy milk", "call mum", "water plants"];
    let init = Effect::batch(texts.iter().enumerate().map(|(i, text)| {
        Effect::receive(Msg::RequestPut {
            value: Document::new(format!("note-{i}"), serde_json::json!({ "text": text })),
        })
    }));
    let model = Model {
        pending: texts.len(),
        ..Default::default()
    };

    let runtime = Runtime::new(RuntimeOptions::default());
    let (db, backup) = (local.clone(), remote.clone());
    let outcome = runtime
        .run(model, init, move |mut model, msg| match msg {
            Msg::RequestPut { value } => (model, database::put(&db, value)),
            Msg::RespondPut { .. } | Msg::FailPut { .. } => {
                model.pending -= 1;
                if model.pending == 0 {
                    (model, database::push(&db, &backup))
                } else {
                    (model, Effect::none())
                }
            }
            Msg::CompletePush { value } => {
                tracing::info!(written = value.docs_written, "backup complete");
                database::request_restore(model, &db)
            }
            Msg::RespondRestore { value } => {
                model.notes = value;
                (model, Effect::none())
            }
            other => {
                if let Some(error) = other.error() {
                    tracing::warn!(kind = other.kind(), %error, "store operation failed");
                }
                (model, Effect::none())
            }
        })
        .await;

    for note in &outcome.model.notes {
        println!("{}: {}", note.id, note.data["text"]);
    }
    println!(
        "{} messages processed, {} holds {} notes",
        outcome.processed,
        remote.name(),
        remote.doc_count().await
    );
}
