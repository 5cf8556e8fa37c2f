//! Log-driven synchronizer.
//!
//! Drains each `(peer, tag)` scope strictly in `local_sequence` order:
//!
//! 1. read the head entry in one transaction,
//! 2. apply it remotely with no transaction held,
//! 3. remove it in a new transaction.
//!
//! A crash between 2 and 3 replays the entry on the next drain, so delivery
//! is at-least-once and every [`RemoteApplier`] method must be idempotent.
//! A concurrent undo (`OperationLog::remove`) either wins before step 1, in
//! which case the entry is never sent, or loses, in which case step 3 finds
//! nothing to remove. Either way the entry is applied at most once per drain
//! and never duplicated in the log.
//!
//! Remote failures leave the entry in place and put the scope into
//! exponential backoff. Entries that cannot be decoded are quarantined so
//! the rest of the scope can proceed.

mod retry;

pub use retry::{RetryPolicy, RetryState};

use chrono::{DateTime, Utc};
use lru::LruCache;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::ids::PeerId;
use crate::limits;
use crate::oplog::{EntryKey, LogEntry, LogTag, OperationLog, OplogError};
use crate::payload::{
    ChatInputStatePayload, ClearHistoryPayload, OperationPayload, RemoveChatPayload,
    RemoveMessagesPayload,
};
use crate::storage::Database;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Operation log error: {0}")]
    Oplog(#[from] OplogError),

    #[error("Remote apply failed: {0}")]
    Remote(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;

// ---------------------------------------------------------------------------
// RemoteApplier
// ---------------------------------------------------------------------------

/// Server-side application of logged intents.
///
/// Called from blocking context, outside any store transaction. Every
/// method may be called more than once with the same arguments and must
/// treat a repeat as success.
pub trait RemoteApplier: Send + Sync {
    fn remove_messages(
        &self,
        peer_id: PeerId,
        payload: &RemoveMessagesPayload,
    ) -> anyhow::Result<()>;

    fn remove_chat(&self, payload: &RemoveChatPayload) -> anyhow::Result<()>;

    fn clear_history(&self, payload: &ClearHistoryPayload) -> anyhow::Result<()>;

    fn synchronize_chat_input_state(
        &self,
        peer_id: PeerId,
        payload: &ChatInputStatePayload,
    ) -> anyhow::Result<()>;
}

impl<R: RemoteApplier + ?Sized> RemoteApplier for Arc<R> {
    fn remove_messages(
        &self,
        peer_id: PeerId,
        payload: &RemoveMessagesPayload,
    ) -> anyhow::Result<()> {
        (**self).remove_messages(peer_id, payload)
    }

    fn remove_chat(&self, payload: &RemoveChatPayload) -> anyhow::Result<()> {
        (**self).remove_chat(payload)
    }

    fn clear_history(&self, payload: &ClearHistoryPayload) -> anyhow::Result<()> {
        (**self).clear_history(payload)
    }

    fn synchronize_chat_input_state(
        &self,
        peer_id: PeerId,
        payload: &ChatInputStatePayload,
    ) -> anyhow::Result<()> {
        (**self).synchronize_chat_input_state(peer_id, payload)
    }
}

// ---------------------------------------------------------------------------
// DrainOutcome
// ---------------------------------------------------------------------------

pub type Scope = (PeerId, LogTag);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The scope is empty.
    Drained { applied: usize, quarantined: usize },
    /// Per-drain work limit reached; more entries remain.
    Yielded { applied: usize },
    /// A remote apply failed; the head entry stays for a later attempt.
    RetryScheduled {
        applied: usize,
        attempts: u32,
        next_attempt_at: DateTime<Utc>,
    },
    /// The scope is backing off and was not touched.
    Deferred { next_attempt_at: DateTime<Utc> },
    /// Another drain of this scope is in progress.
    Busy,
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

pub struct Synchronizer<R: RemoteApplier> {
    db: Arc<Database>,
    log: OperationLog,
    remote: R,
    policy: RetryPolicy,
    retries: Mutex<HashMap<Scope, RetryState>>,
    /// Entries confirmed remotely whose removal has not committed yet.
    applied: Mutex<LruCache<EntryKey, ()>>,
    in_flight: Mutex<HashSet<Scope>>,
}

/// Marks a scope as being drained; released on drop.
struct ScopeGuard<'a> {
    in_flight: &'a Mutex<HashSet<Scope>>,
    scope: Scope,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        lock(self.in_flight).remove(&self.scope);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<R: RemoteApplier> Synchronizer<R> {
    pub fn new(db: Arc<Database>, log: OperationLog, remote: R) -> Self {
        Self::with_policy(
            db,
            log,
            remote,
            RetryPolicy::default(),
            limits::DEFAULT_APPLIED_CACHE_CAPACITY,
        )
    }

    pub fn with_policy(
        db: Arc<Database>,
        log: OperationLog,
        remote: R,
        policy: RetryPolicy,
        applied_cache_capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(applied_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Synchronizer {
            db,
            log,
            remote,
            policy,
            retries: Mutex::new(HashMap::new()),
            applied: Mutex::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn retry_state(&self, peer_id: PeerId, tag: LogTag) -> Option<RetryState> {
        lock(&self.retries).get(&(peer_id, tag)).cloned()
    }

    pub fn pending_scopes(&self) -> Result<Vec<Scope>> {
        Ok(self.db.transaction(|txn| self.log.pending_scopes(txn))?)
    }

    /// Drain every pending scope once, sequentially.
    pub fn drain_all(&self) -> Result<Vec<(Scope, DrainOutcome)>> {
        let mut outcomes = Vec::new();
        for scope in self.pending_scopes()? {
            let outcome = self.drain_scope(scope.0, scope.1)?;
            outcomes.push((scope, outcome));
        }
        Ok(outcomes)
    }

    /// Apply and remove entries of one scope in order until it is empty, a
    /// remote apply fails, or the per-drain limit is reached.
    pub fn drain_scope(&self, peer_id: PeerId, tag: LogTag) -> Result<DrainOutcome> {
        let scope = (peer_id, tag);
        let Some(_guard) = self.claim(scope) else {
            return Ok(DrainOutcome::Busy);
        };

        if let Some(state) = self.retry_state(peer_id, tag) {
            if state.next_attempt_at > Utc::now() {
                return Ok(DrainOutcome::Deferred {
                    next_attempt_at: state.next_attempt_at,
                });
            }
        }

        let mut applied = 0;
        let mut quarantined = 0;
        let mut processed = 0;
        while processed < limits::MAX_ENTRIES_PER_DRAIN {
            let head = match self.db.transaction(|txn| self.log.first(txn, peer_id, tag)) {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    lock(&self.retries).remove(&scope);
                    return Ok(DrainOutcome::Drained {
                        applied,
                        quarantined,
                    });
                }
                Err(err) => {
                    self.quarantine_or_fail(err)?;
                    quarantined += 1;
                    processed += 1;
                    continue;
                }
            };
            processed += 1;

            match self.apply(&head) {
                Ok(()) => {}
                Err(SyncError::Oplog(err)) => {
                    self.quarantine_or_fail(err)?;
                    quarantined += 1;
                    continue;
                }
                Err(SyncError::Remote(err)) => {
                    let state = self.schedule_retry(scope, &err);
                    return Ok(DrainOutcome::RetryScheduled {
                        applied,
                        attempts: state.attempts,
                        next_attempt_at: state.next_attempt_at,
                    });
                }
            }

            let key = head.key();
            self.db.transaction(|txn| self.log.remove(txn, key))?;
            lock(&self.applied).pop(&key);
            lock(&self.retries).remove(&scope);
            applied += 1;
        }

        Ok(DrainOutcome::Yielded { applied })
    }

    fn claim(&self, scope: Scope) -> Option<ScopeGuard<'_>> {
        if !lock(&self.in_flight).insert(scope) {
            return None;
        }
        Some(ScopeGuard {
            in_flight: &self.in_flight,
            scope,
        })
    }

    /// Send one entry to the remote, unless it was already confirmed.
    fn apply(&self, entry: &LogEntry) -> Result<()> {
        let key = entry.key();
        if lock(&self.applied).contains(&key) {
            log::debug!(
                "Entry {}/{}/{} already applied, removing",
                key.peer_id,
                key.tag.as_str(),
                key.local_sequence
            );
            return Ok(());
        }

        log::trace!(
            "Applying {:?} {}/{}/{}",
            entry.payload_kind(),
            key.peer_id,
            key.tag.as_str(),
            key.local_sequence
        );
        match entry.decode_payload(self.log.codec_options())? {
            OperationPayload::RemoveMessages(p) => self.remote.remove_messages(entry.peer_id, &p),
            OperationPayload::RemoveChat(p) => self.remote.remove_chat(&p),
            OperationPayload::ClearHistory(p) => self.remote.clear_history(&p),
            OperationPayload::ChatInputState(p) => {
                self.remote.synchronize_chat_input_state(entry.peer_id, &p)
            }
        }?;

        lock(&self.applied).put(key, ());
        Ok(())
    }

    fn quarantine_or_fail(&self, err: OplogError) -> Result<()> {
        let Some(key) = err.corrupt_key() else {
            return Err(err.into());
        };
        let reason = err.to_string();
        self.db
            .transaction(|txn| self.log.quarantine(txn, key, &reason))?;
        Ok(())
    }

    fn schedule_retry(&self, scope: Scope, err: &anyhow::Error) -> RetryState {
        let mut retries = lock(&self.retries);
        let attempts = retries
            .get(&scope)
            .map(|s| s.attempts.saturating_add(1))
            .unwrap_or(1);
        let state = RetryState {
            attempts,
            next_attempt_at: self.policy.next_attempt_at(attempts, Utc::now()),
            last_error: format!("{:#}", err),
        };
        log::warn!(
            "Remote apply failed for {}/{} (attempt {}), retrying at {}: {:#}",
            scope.0,
            scope.1.as_str(),
            attempts,
            state.next_attempt_at,
            err
        );
        retries.insert(scope, state.clone());
        state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MessageId;
    use crate::oplog::StoredEntry;
    use crate::operations::{record_chat_input_state, record_remove_messages};
    use crate::payload::{PayloadKind, RemoveMessagesMode};
    use crate::storage::{Space, Transaction};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records every call; fails the first `fail_first` calls.
    #[derive(Default)]
    struct RecordingRemote {
        calls: Mutex<Vec<(PeerId, PayloadKind, i32)>>,
        fail_first: AtomicUsize,
    }

    impl RecordingRemote {
        fn failing(n: usize) -> Self {
            RecordingRemote {
                calls: Mutex::new(Vec::new()),
                fail_first: AtomicUsize::new(n),
            }
        }

        fn record(&self, peer: PeerId, kind: PayloadKind, marker: i32) -> anyhow::Result<()> {
            let remaining = self.fail_first.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_first.store(remaining - 1, Ordering::SeqCst);
                anyhow::bail!("server unavailable");
            }
            self.calls.lock().unwrap().push((peer, kind, marker));
            Ok(())
        }

        fn markers(&self) -> Vec<i32> {
            self.calls.lock().unwrap().iter().map(|c| c.2).collect()
        }
    }

    impl RemoteApplier for RecordingRemote {
        fn remove_messages(
            &self,
            peer_id: PeerId,
            payload: &RemoveMessagesPayload,
        ) -> anyhow::Result<()> {
            let marker = payload.message_ids.first().map(|m| m.id).unwrap_or(-1);
            self.record(peer_id, PayloadKind::RemoveMessages, marker)
        }

        fn remove_chat(&self, payload: &RemoveChatPayload) -> anyhow::Result<()> {
            self.record(payload.peer_id, PayloadKind::RemoveChat, 0)
        }

        fn clear_history(&self, payload: &ClearHistoryPayload) -> anyhow::Result<()> {
            self.record(payload.peer_id, PayloadKind::ClearHistory, payload.top_message_id.id)
        }

        fn synchronize_chat_input_state(
            &self,
            peer_id: PeerId,
            payload: &ChatInputStatePayload,
        ) -> anyhow::Result<()> {
            self.record(peer_id, PayloadKind::ChatInputState, payload.timestamp)
        }
    }

    fn peer() -> PeerId {
        PeerId::new(0, 77)
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            backoff_initial_ms: 0,
            backoff_max_ms: 0,
        }
    }

    fn setup(remote: RecordingRemote) -> Synchronizer<Arc<RecordingRemote>> {
        let db = Arc::new(Database::open_in_memory().unwrap());
        Synchronizer::with_policy(db, OperationLog::default(), Arc::new(remote), fast_policy(), 16)
    }

    fn append(sync: &Synchronizer<Arc<RecordingRemote>>, markers: &[i32]) {
        sync.database()
            .transaction(|txn| -> std::result::Result<(), OplogError> {
                for m in markers {
                    record_remove_messages(
                        sync.log(),
                        txn,
                        peer(),
                        vec![MessageId::new(peer(), 0, *m)],
                        RemoveMessagesMode::ForEveryone,
                    )?;
                }
                Ok(())
            })
            .unwrap();
    }

    fn remaining(sync: &Synchronizer<Arc<RecordingRemote>>) -> usize {
        sync.database()
            .transaction(|txn| sync.log().count(txn, peer(), LogTag::CloudChatRemoveMessages))
            .unwrap()
    }

    #[test]
    fn test_drain_applies_in_order_and_empties_scope() {
        let sync = setup(RecordingRemote::default());
        append(&sync, &[10, 20, 30]);

        let outcome = sync
            .drain_scope(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        assert_eq!(
            outcome,
            DrainOutcome::Drained {
                applied: 3,
                quarantined: 0
            }
        );
        assert_eq!(sync.remote.markers(), vec![10, 20, 30]);
        assert_eq!(remaining(&sync), 0);
    }

    #[test]
    fn test_remote_failure_keeps_entry_and_retries() {
        let sync = setup(RecordingRemote::failing(1));
        append(&sync, &[1, 2]);

        let first = sync
            .drain_scope(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        assert!(matches!(
            first,
            DrainOutcome::RetryScheduled {
                applied: 0,
                attempts: 1,
                ..
            }
        ));
        assert_eq!(remaining(&sync), 2);
        let state = sync
            .retry_state(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        assert!(state.last_error.contains("server unavailable"));

        // Zero backoff: due immediately.
        let second = sync
            .drain_scope(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        assert_eq!(
            second,
            DrainOutcome::Drained {
                applied: 2,
                quarantined: 0
            }
        );
        assert_eq!(sync.remote.markers(), vec![1, 2]);
        assert!(sync
            .retry_state(peer(), LogTag::CloudChatRemoveMessages)
            .is_none());
    }

    #[test]
    fn test_scope_in_backoff_is_deferred() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let policy = RetryPolicy {
            backoff_initial_ms: 60_000,
            backoff_max_ms: 60_000,
        };
        let sync = Synchronizer::with_policy(
            db,
            OperationLog::default(),
            Arc::new(RecordingRemote::failing(1)),
            policy,
            16,
        );
        append(&sync, &[1]);

        let first = sync
            .drain_scope(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        let DrainOutcome::RetryScheduled {
            next_attempt_at, ..
        } = first
        else {
            panic!("expected retry, got {:?}", first);
        };
        assert_eq!(
            sync.drain_scope(peer(), LogTag::CloudChatRemoveMessages)
                .unwrap(),
            DrainOutcome::Deferred { next_attempt_at }
        );
        assert!(sync.remote.markers().is_empty());
    }

    #[test]
    fn test_corrupt_entry_is_quarantined_and_drain_continues() {
        let sync = setup(RecordingRemote::default());
        append(&sync, &[1, 2]);

        // Rewrite the first entry's contents with an unknown removal mode.
        sync.database()
            .transaction(|txn: &Transaction<'_>| -> std::result::Result<(), OplogError> {
                let head = sync
                    .log()
                    .first(txn, peer(), LogTag::CloudChatRemoveMessages)?
                    .unwrap();
                let mut encoder = crate::codec::Encoder::new(Default::default());
                encoder.encode_int32(9, "t");
                let stored = StoredEntry {
                    merged_sequence: head.merged_sequence,
                    domain: head.domain,
                    kind: head.kind,
                    contents: encoder.finish(),
                };
                txn.put(Space::OperationLog, &head.key().to_key(), &stored.to_bytes()?)?;
                Ok(())
            })
            .unwrap();

        let outcome = sync
            .drain_scope(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        assert_eq!(
            outcome,
            DrainOutcome::Drained {
                applied: 1,
                quarantined: 1
            }
        );
        assert_eq!(sync.remote.markers(), vec![2]);

        let quarantined = sync
            .database()
            .transaction(|txn| sync.log().quarantined(txn))
            .unwrap();
        assert_eq!(quarantined.len(), 1);
        assert_eq!(quarantined[0].key.local_sequence, 0);
        assert!(quarantined[0].reason.contains("discriminant"));
    }

    #[test]
    fn test_drain_yields_after_work_limit() {
        let sync = setup(RecordingRemote::default());
        let markers: Vec<i32> = (0..(limits::MAX_ENTRIES_PER_DRAIN as i32 + 3)).collect();
        append(&sync, &markers);

        let first = sync
            .drain_scope(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        assert_eq!(
            first,
            DrainOutcome::Yielded {
                applied: limits::MAX_ENTRIES_PER_DRAIN
            }
        );
        let second = sync
            .drain_scope(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        assert_eq!(
            second,
            DrainOutcome::Drained {
                applied: 3,
                quarantined: 0
            }
        );
        assert_eq!(sync.remote.markers(), markers);
    }

    #[test]
    fn test_drain_all_covers_every_scope() {
        let sync = setup(RecordingRemote::default());
        append(&sync, &[5]);
        let other = PeerId::new(1, 3);
        sync.database()
            .transaction(|txn| {
                record_chat_input_state(
                    sync.log(),
                    txn,
                    other,
                    ChatInputStatePayload {
                        reply_to_message_id: None,
                        text: "hi".to_string(),
                        timestamp: 99,
                    },
                )
            })
            .unwrap();

        let outcomes = sync.drain_all().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(sync.pending_scopes().unwrap().is_empty());
        let mut markers = sync.remote.markers();
        markers.sort();
        assert_eq!(markers, vec![5, 99]);
    }

    #[test]
    fn test_second_drain_of_same_scope_is_busy() {
        let sync = setup(RecordingRemote::default());
        let guard = sync
            .claim((peer(), LogTag::CloudChatRemoveMessages))
            .unwrap();
        assert_eq!(
            sync.drain_scope(peer(), LogTag::CloudChatRemoveMessages)
                .unwrap(),
            DrainOutcome::Busy
        );
        drop(guard);
        assert_eq!(
            sync.drain_scope(peer(), LogTag::CloudChatRemoveMessages)
                .unwrap(),
            DrainOutcome::Drained {
                applied: 0,
                quarantined: 0
            }
        );
    }

    #[test]
    fn test_concurrent_undo_applies_at_most_once() {
        for _ in 0..16 {
            let sync = Arc::new(setup(RecordingRemote::default()));
            append(&sync, &[42]);
            let key = EntryKey::new(peer(), LogTag::CloudChatRemoveMessages, 0);

            let drainer = {
                let sync = Arc::clone(&sync);
                std::thread::spawn(move || {
                    sync.drain_scope(peer(), LogTag::CloudChatRemoveMessages)
                        .unwrap()
                })
            };
            let undo = {
                let sync = Arc::clone(&sync);
                std::thread::spawn(move || {
                    sync.database()
                        .transaction(|txn| sync.log().remove(txn, key))
                        .unwrap()
                })
            };
            drainer.join().unwrap();
            undo.join().unwrap();

            assert!(sync.remote.markers().len() <= 1);
            assert_eq!(remaining(&sync), 0);
        }
    }

    /// Undoes the entry being applied from inside the remote call, so the
    /// undo commits between the drain's read and its removal.
    struct UndoingRemote {
        db: Arc<Database>,
        log: OperationLog,
        calls: AtomicUsize,
        undone: Mutex<Vec<bool>>,
    }

    impl RemoteApplier for UndoingRemote {
        fn remove_messages(
            &self,
            peer_id: PeerId,
            _payload: &RemoveMessagesPayload,
        ) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = EntryKey::new(peer_id, LogTag::CloudChatRemoveMessages, 0);
            let removed = self.db.transaction(|txn| self.log.remove(txn, key))?;
            self.undone.lock().unwrap().push(removed);
            Ok(())
        }

        fn remove_chat(&self, _payload: &RemoveChatPayload) -> anyhow::Result<()> {
            Ok(())
        }

        fn clear_history(&self, _payload: &ClearHistoryPayload) -> anyhow::Result<()> {
            Ok(())
        }

        fn synchronize_chat_input_state(
            &self,
            _peer_id: PeerId,
            _payload: &ChatInputStatePayload,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_undo_between_read_and_remove_applies_once() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let remote = Arc::new(UndoingRemote {
            db: Arc::clone(&db),
            log: OperationLog::default(),
            calls: AtomicUsize::new(0),
            undone: Mutex::new(Vec::new()),
        });
        let sync = Synchronizer::with_policy(
            Arc::clone(&db),
            OperationLog::default(),
            Arc::clone(&remote),
            fast_policy(),
            16,
        );
        db.transaction(|txn| {
            record_remove_messages(
                sync.log(),
                txn,
                peer(),
                vec![MessageId::new(peer(), 0, 42)],
                RemoveMessagesMode::ForEveryone,
            )
        })
        .unwrap();

        let outcome = sync
            .drain_scope(peer(), LogTag::CloudChatRemoveMessages)
            .unwrap();
        assert_eq!(
            outcome,
            DrainOutcome::Drained {
                applied: 1,
                quarantined: 0
            }
        );
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*remote.undone.lock().unwrap(), vec![true]);
        let left = db
            .transaction(|txn| sync.log().count(txn, peer(), LogTag::CloudChatRemoveMessages))
            .unwrap();
        assert_eq!(left, 0);

        // The scope stays empty on the next pass.
        assert_eq!(
            sync.drain_scope(peer(), LogTag::CloudChatRemoveMessages)
                .unwrap(),
            DrainOutcome::Drained {
                applied: 0,
                quarantined: 0
            }
        );
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }
}

