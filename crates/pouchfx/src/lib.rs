//! # pouchfx
//!
//! Message/effect wrappers for applications built around an update loop,
//! plus an in-memory document store to drive them with.
//!
//! Store operations (`put`, `all_docs`, replication) are turned into
//! [`Effect`]s that resolve into a single [`Msg`] each, ready to be routed
//! through an update function by the [`Runtime`]. Any type implementing
//! [`DocumentStore`] can sit behind them; [`MemoryStore`] is the one
//! shipped here.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pouchfx::{Document, Effect, MemoryStore, Msg, Runtime, RuntimeOptions, database};
//!
//! # async fn example() {
//! let db = MemoryStore::new("notes");
//! let runtime = Runtime::new(RuntimeOptions::default());
//!
//! let save = database::put(&db, Document::new("n1", serde_json::json!({"text": "hi"})));
//! let outcome = runtime
//!     .run(0u32, save, |saved, msg| match msg {
//!         Msg::RespondPut { .. } => (saved + 1, Effect::none()),
//!         _ => (saved, Effect::none()),
//!     })
//!     .await;
//! assert_eq!(outcome.model, 1);
//! # }
//! ```
mod memory;

pub use memory::MemoryStore;
pub use pouchfx_effects::*;
