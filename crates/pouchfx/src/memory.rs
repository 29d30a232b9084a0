//! An in-process [`DocumentStore`].
//!
//! Each document keeps the list of revisions it went through. Replication
//! copies a document when the receiving side has never seen it or only
//! holds one of its ancestors. Documents edited independently on both
//! sides are left alone and reported in [`ReplicationResult::errors`].
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use md5::{Digest, Md5};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use pouchfx_effects::{
    AllDocsOptions, AllDocsResponse, AllDocsRow, Document, DocumentStore, Error, PutResponse,
    ReplicationResult, Result, SyncResult,
};

#[derive(Debug, Clone)]
struct Entry {
    /// Oldest first; never empty.
    revs: Vec<String>,
    deleted: bool,
    data: Map<String, Value>,
}

impl Entry {
    fn current(&self) -> &str {
        self.revs.last().map(String::as_str).unwrap_or_default()
    }

    fn descends_from(&self, rev: &str) -> bool {
        self.revs.iter().any(|r| r == rev)
    }

    fn to_document(&self, id: &str) -> Document {
        Document {
            id: id.to_string(),
            rev: Some(self.current().to_string()),
            deleted: self.deleted,
            data: self.data.clone(),
        }
    }
}

/// `<generation>-<md5 of parent rev and body>`
fn next_rev(parent: Option<&str>, doc: &Document) -> String {
    let generation = parent
        .and_then(|rev| rev.split_once('-'))
        .and_then(|(n, _)| n.parse::<u64>().ok())
        .unwrap_or(0)
        + 1;

    let mut hasher = Md5::new();
    hasher.update(parent.unwrap_or_default().as_bytes());
    hasher.update([u8::from(doc.deleted)]);
    hasher.update(serde_json::to_vec(&doc.data).unwrap_or_default());
    format!("{generation}-{:x}", hasher.finalize())
}

/// A document store held in memory. Clones share the same contents.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    name: Arc<str>,
    docs: Arc<RwLock<BTreeMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            docs: Arc::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current revision of a live document.
    pub async fn get(&self, id: &str) -> Result<Document> {
        let docs = self.docs.read().await;
        match docs.get(id) {
            Some(entry) if !entry.deleted => Ok(entry.to_document(id)),
            _ => Err(Error::NotFound(id.to_string())),
        }
    }

    /// Number of live documents.
    pub async fn doc_count(&self) -> usize {
        self.docs.read().await.values().filter(|e| !e.deleted).count()
    }

    async fn write(&self, mut doc: Document) -> Result<PutResponse> {
        if doc.id.is_empty() {
            doc.id = uuid::Uuid::new_v4().to_string();
        }

        let mut docs = self.docs.write().await;
        let parent = match (docs.get(&doc.id), doc.rev.as_deref()) {
            (None, None) => None,
            (None, Some(_)) => return Err(Error::NotFound(doc.id.clone())),
            // Recreating a deleted document continues its history.
            (Some(entry), None) if entry.deleted => Some(entry.current().to_string()),
            (Some(entry), Some(rev)) if entry.current() == rev => Some(rev.to_string()),
            (Some(_), _) => return Err(Error::Conflict(doc.id.clone())),
        };

        let rev = next_rev(parent.as_deref(), &doc);
        match docs.get_mut(&doc.id) {
            Some(entry) => {
                entry.revs.push(rev.clone());
                entry.deleted = doc.deleted;
                entry.data = doc.data;
            }
            None => {
                docs.insert(
                    doc.id.clone(),
                    Entry {
                        revs: vec![rev.clone()],
                        deleted: doc.deleted,
                        data: doc.data,
                    },
                );
            }
        }

        debug!(store = %self.name, id = %doc.id, %rev, "document written");
        Ok(PutResponse {
            ok: true,
            id: doc.id,
            rev,
        })
    }
}

/// Copy every document of `source` that `target` is behind on.
async fn replicate(source: &MemoryStore, target: &MemoryStore) -> ReplicationResult {
    // Snapshot first so replicating a store into itself cannot deadlock.
    let incoming: Vec<(String, Entry)> = {
        let docs = source.docs.read().await;
        docs.iter().map(|(id, e)| (id.clone(), e.clone())).collect()
    };

    let mut result = ReplicationResult {
        docs_read: incoming.len() as u64,
        ..Default::default()
    };
    let mut docs = target.docs.write().await;
    for (id, entry) in incoming {
        let known = docs
            .get(&id)
            .map(|existing| (existing.descends_from(entry.current()), existing.current().to_string()));
        match known {
            Some((true, _)) => {}
            Some((false, current)) if !entry.descends_from(&current) => {
                warn!(
                    source = %source.name,
                    target = %target.name,
                    %id,
                    "document edited on both sides, not replicated"
                );
                result
                    .errors
                    .push(format!("{id}: {} and {current} have diverged", entry.current()));
            }
            _ => {
                docs.insert(id, entry);
                result.docs_written += 1;
            }
        }
    }
    result.ok = result.errors.is_empty();

    debug!(
        source = %source.name,
        target = %target.name,
        read = result.docs_read,
        written = result.docs_written,
        "replication finished"
    );
    result
}

#[async_trait]
impl DocumentStore for MemoryStore {
    type Replica = MemoryStore;

    async fn put(&self, doc: Document) -> Result<PutResponse> {
        self.write(doc).await
    }

    async fn all_docs(&self, opts: AllDocsOptions) -> Result<AllDocsResponse> {
        let docs = self.docs.read().await;
        let live = docs.iter().filter(|(_, e)| !e.deleted);
        let total_rows = live.clone().count();

        let rows = live
            .take(opts.limit.unwrap_or(usize::MAX))
            .map(|(id, entry)| AllDocsRow {
                id: id.clone(),
                rev: entry.current().to_string(),
                doc: opts.include_docs.then(|| entry.to_document(id)),
            })
            .collect();

        Ok(AllDocsResponse { total_rows, rows })
    }

    async fn replicate_to(&self, target: &MemoryStore) -> Result<ReplicationResult> {
        Ok(replicate(self, target).await)
    }

    async fn replicate_from(&self, source: &MemoryStore) -> Result<ReplicationResult> {
        Ok(replicate(source, self).await)
    }

    async fn sync(&self, other: &MemoryStore) -> Result<SyncResult> {
        let push = replicate(self, other).await;
        let pull = replicate(other, self).await;
        Ok(SyncResult { push, pull })
    }
}
