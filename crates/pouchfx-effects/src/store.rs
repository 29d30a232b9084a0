use async_trait::async_trait;

use crate::document::{
    AllDocsOptions, AllDocsResponse, Document, PutResponse, ReplicationResult, SyncResult,
};
use crate::error::Result;

/// The store capability the effect functions drive.
///
/// Handles are cheap to clone; effects take an owned clone so they can
/// outlive the caller's borrow. Any error a method returns is passed on
/// to the matching `Fail*` message unchanged.
#[async_trait]
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// The other side of a replication: a remote or another local store.
    type Replica: Clone + Send + Sync + 'static;

    /// Write a single document. A write the store refuses, such as a
    /// conflicting revision, is an `Err`.
    async fn put(&self, doc: Document) -> Result<PutResponse>;

    /// List documents.
    async fn all_docs(&self, opts: AllDocsOptions) -> Result<AllDocsResponse>;

    /// One-way replication from this store to `target`.
    async fn replicate_to(&self, target: &Self::Replica) -> Result<ReplicationResult>;

    /// One-way replication from `source` into this store.
    async fn replicate_from(&self, source: &Self::Replica) -> Result<ReplicationResult>;

    /// Replicate in both directions.
    async fn sync(&self, other: &Self::Replica) -> Result<SyncResult>;
}
