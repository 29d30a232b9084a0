//! Effects for the five store operations.
//!
//! Every function clones what it needs and returns immediately; the store
//! is called once, when the effect runs, and the outcome becomes exactly
//! one message. There is no retry and no inspection of errors.
use std::future::Future;

use tracing::debug;

use crate::document::{AllDocsOptions, AllDocsResponse, Document};
use crate::effect::{Effect, Task};
use crate::error::{Error, Result};
use crate::message::Msg;
use crate::store::DocumentStore;

fn perform<T, Fut>(
    op: &'static str,
    call: Fut,
    on_ok: fn(T) -> Msg,
    on_err: fn(Error) -> Msg,
) -> Effect<Msg>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    debug!(op, "store effect created");
    Effect::attempt(Task::new(call), on_ok, on_err).map(move |msg| {
        debug!(op, kind = msg.kind(), "store effect settled");
        msg
    })
}

/// Persist `doc`. Yields `RespondPut` or `FailPut`.
pub fn put<S: DocumentStore>(store: &S, doc: Document) -> Effect<Msg> {
    let store = store.clone();
    perform(
        "put",
        async move { store.put(doc).await },
        |value| Msg::RespondPut { value },
        |error| Msg::FailPut { error },
    )
}

/// Load every document. Yields `RespondRestore` with the row documents in
/// store order, or `FailRestore`.
pub fn restore<S: DocumentStore>(store: &S) -> Effect<Msg> {
    let store = store.clone();
    perform(
        "restore",
        async move {
            store
                .all_docs(AllDocsOptions::with_docs())
                .await
                .and_then(read_docs)
        },
        |value| Msg::RespondRestore { value },
        |error| Msg::FailRestore { error },
    )
}

/// Pull the `doc` field out of each row. Rows were requested with their
/// documents, so a bare row means the store broke that contract.
fn read_docs(response: AllDocsResponse) -> Result<Vec<Document>> {
    response
        .rows
        .into_iter()
        .map(|row| {
            row.doc
                .ok_or_else(|| Error::BadRequest(format!("row {} came without its document", row.id)))
        })
        .collect()
}

/// Replicate local changes to `replica`. Yields `CompletePush` or `FailPush`.
pub fn push<S: DocumentStore>(store: &S, replica: &S::Replica) -> Effect<Msg> {
    let store = store.clone();
    let replica = replica.clone();
    perform(
        "push",
        async move { store.replicate_to(&replica).await },
        |value| Msg::CompletePush { value },
        |error| Msg::FailPush { error },
    )
}

/// Replicate `replica`'s changes into the store. Yields `CompletePull` or
/// `FailPull`.
pub fn pull<S: DocumentStore>(store: &S, replica: &S::Replica) -> Effect<Msg> {
    let store = store.clone();
    let replica = replica.clone();
    perform(
        "pull",
        async move { store.replicate_from(&replica).await },
        |value| Msg::CompletePull { value },
        |error| Msg::FailPull { error },
    )
}

/// Replicate both ways. Yields `CompleteSync` or `FailSync`.
pub fn sync<S: DocumentStore>(store: &S, replica: &S::Replica) -> Effect<Msg> {
    let store = store.clone();
    let replica = replica.clone();
    perform(
        "sync",
        async move { store.sync(&replica).await },
        |value| Msg::CompleteSync { value },
        |error| Msg::FailSync { error },
    )
}

/// Keep `model` as is and start a restore.
pub fn request_restore<M, S: DocumentStore>(model: M, store: &S) -> (M, Effect<Msg>) {
    (model, restore(store))
}

/// Keep `model` as is and start a pull from `replica`.
pub fn request_pull<M, S: DocumentStore>(
    model: M,
    store: &S,
    replica: &S::Replica,
) -> (M, Effect<Msg>) {
    (model, pull(store, replica))
}
