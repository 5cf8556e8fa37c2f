//! # CloudChat Operation Log
//!
//! **A durable, ordered, per-peer log of outgoing chat mutations.**
//!
//! When a user deletes messages, clears a history, or removes a chat, the
//! intent is recorded locally first and replayed to the server later. The
//! log guarantees:
//!
//! - **Atomic recording**: an entry commits together with the local change
//!   that produced it, inside one store transaction
//! - **Per-scope ordering**: entries of one `(peer, tag)` scope are applied in
//!   the order they were recorded
//! - **Durability**: entries survive restarts and crashes until removed
//! - **At-least-once delivery**: the synchronizer removes an entry only after
//!   the remote confirmed it, and tolerates concurrent undo
//!
//! ## Quick Start
//!
//! ```rust
//! use cloudchat_oplog::operations::record_remove_messages;
//! use cloudchat_oplog::{Database, MessageId, OperationLog, PeerId, RemoveMessagesMode};
//!
//! let db = Database::open_in_memory()?;
//! let log = OperationLog::default();
//! let peer = PeerId::new(0, 42);
//!
//! let entry = db.transaction(|txn| {
//!     record_remove_messages(
//!         &log,
//!         txn,
//!         peer,
//!         vec![MessageId::new(peer, 0, 7)],
//!         RemoveMessagesMode::ForEveryone,
//!     )
//! })?;
//! assert_eq!(entry.local_sequence, 0);
//! # Ok::<(), cloudchat_oplog::OplogError>(())
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ids`] | Peer and message identities, MessageId array buffer |
//! | [`codec`] | Keyed binary encoding of payloads and preferences entries |
//! | [`payload`] | Remove-messages, remove-chat, clear-history, chat-input-state |
//! | [`storage`] | Transactional key-value store over SQLite |
//! | [`oplog`] | Append / iterate / remove, merged sequences, quarantine |
//! | [`operations`] | Business helpers that record intents |
//! | [`preferences`] | Conditional-update preferences entries |
//! | [`sync`] | Ordered remote application with retry and backoff |
//! | [`worker`] | Background drain loop (feature `native`) |
//! | [`config`] | JSON-loadable configuration |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `native` | Yes | tokio background worker |

#![allow(clippy::too_many_arguments, clippy::type_complexity)]

// ── Public modules ──────────────────────────────────────────────────────────

pub mod codec;
pub mod config;
pub mod ids;
pub mod limits;
pub mod operations;
pub mod oplog;
pub mod payload;
pub mod preferences;
pub mod storage;
pub mod sync;

/// Background drain loop on tokio.
#[cfg(feature = "native")]
pub mod worker;

// ── Re-exports for convenience ──────────────────────────────────────────────

pub use codec::{CodecError, CodecOptions, OptionalIdEncoding};
pub use config::{ConfigError, OplogConfig};
pub use ids::{MessageId, PeerId};
pub use operations::{MessageIndex, StoredMessageIndex};
pub use oplog::{EntryKey, LogEntry, LogTag, MergeDomain, OperationLog, OplogError, TagRegistry};
pub use payload::{
    ChatInputStatePayload, ClearHistoryPayload, OperationPayload, PayloadKind, RemoveChatPayload,
    RemoveMessagesMode, RemoveMessagesPayload,
};
pub use preferences::{
    EntryUpdate, Preferences, PreferencesError, PreferencesKey, SuggestedLocalizationEntry,
};
pub use storage::{Database, StoreError, Transaction};
pub use sync::{DrainOutcome, RemoteApplier, RetryPolicy, SyncError, Synchronizer};

#[cfg(feature = "native")]
pub use worker::SyncWorker;

// ── Library metadata ────────────────────────────────────────────────────────

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}

// ── Tests ───────────────────────────────────────────────────────────────────
