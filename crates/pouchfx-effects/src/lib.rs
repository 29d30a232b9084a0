//! Effect and message wrappers for document store operations.
//!
//! Each operation in [`database`] issues exactly one call against a
//! [`DocumentStore`] and turns its outcome into a single [`Msg`]. Nothing
//! runs until the returned [`Effect`] is executed, usually by a
//! [`Runtime`] that feeds the resulting messages into an update function.
//!
//! ```no_run
//! use pouchfx_effects::{Document, Effect, Msg, Runtime, RuntimeOptions, database};
//! # async fn example<S: pouchfx_effects::DocumentStore>(store: S) {
//! let runtime = Runtime::new(RuntimeOptions::default());
//! let (model, effect) = database::request_restore(Vec::<Document>::new(), &store);
//! let outcome = runtime
//!     .run(model, effect, |mut docs, msg| {
//!         if let Msg::RespondRestore { value } = msg {
//!             docs = value;
//!         }
//!         (docs, Effect::none())
//!     })
//!     .await;
//! println!("restored {} documents", outcome.model.len());
//! # }
//! ```
pub mod database;
pub mod document;
pub mod effect;
pub mod error;
pub mod message;
pub mod runtime;
pub mod store;

pub use document::{
    AllDocsOptions, AllDocsResponse, AllDocsRow, Document, PutResponse, ReplicationResult,
    SyncResult,
};
pub use effect::{BoxFuture, Effect, Task};
pub use error::{Error, Result};
pub use message::Msg;
pub use runtime::{RunOutcome, Runtime, RuntimeHandle, RuntimeOptions, StopReason};
pub use store::DocumentStore;
