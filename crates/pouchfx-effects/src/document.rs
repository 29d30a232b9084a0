//! Values exchanged with a [`DocumentStore`](crate::DocumentStore).
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An application record. Serializes in the usual `_id` / `_rev` /
/// `_deleted` shape with the body fields alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(rename = "_deleted", default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    /// A new document without a revision. An empty `id` lets the store
    /// pick one. A body that is not a JSON object is kept under `value`.
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        let data = match body {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => Map::from_iter([("value".to_string(), other)]),
        };
        Self {
            id: id.into(),
            rev: None,
            deleted: false,
            data,
        }
    }

    /// Base the document on an existing revision, as needed to update it.
    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    /// Turn the document into a deletion of revision `rev`.
    pub fn tombstone(id: impl Into<String>, rev: impl Into<String>) -> Self {
        Self {
            deleted: true,
            ..Self::new(id, Value::Null).with_rev(rev)
        }
    }
}

/// A successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResponse {
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllDocsOptions {
    pub include_docs: bool,
    pub limit: Option<usize>,
}

impl AllDocsOptions {
    /// Every row, each with its document.
    pub fn with_docs() -> Self {
        Self {
            include_docs: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    pub rev: String,
    /// Present when the listing was asked to include documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllDocsResponse {
    /// Live documents in the store, independent of `limit`.
    pub total_rows: usize,
    pub rows: Vec<AllDocsRow>,
}

/// Outcome of a one-way replication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationResult {
    /// False when any document could not be transferred.
    pub ok: bool,
    pub docs_read: u64,
    pub docs_written: u64,
    pub errors: Vec<String>,
}

/// Outcome of a push followed by a pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub push: ReplicationResult,
    pub pull: ReplicationResult,
}

impl SyncResult {
    pub fn ok(&self) -> bool {
        self.push.ok && self.pull.ok
    }
}
