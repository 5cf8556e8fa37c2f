//! Durable, ordered operation log.
//!
//! Entries are grouped into scopes `(peer, tag)`. Within a scope every entry
//! gets a gap-free `local_sequence` starting at 0; across all scopes in one
//! merge domain entries also get a `merged_sequence`, strictly increasing in
//! commit order. Both counters are persisted, so sequences are never reused
//! after removal or restart.
//!
//! Every operation takes a [`Transaction`]: an append, and whatever local
//! state change it records, commit or roll back together.

mod entry;
mod tags;

pub use entry::{EntryKey, LogEntry, QuarantinedEntry};
pub use tags::{LogTag, MergeDomain, TagRegistry};

use std::collections::VecDeque;
use thiserror::Error;

use crate::codec::{CodecError, CodecOptions};
use crate::ids::PeerId;
use crate::limits::{self, ContentsStatus};
use crate::payload::OperationPayload;
use crate::storage::keys::prefix_successor;
use crate::storage::{KeyRange, Space, StoreError, Transaction};
pub(crate) use entry::StoredEntry;
use entry::{local_counter_key, merged_counter_key, merged_key, scope_prefix};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum OplogError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Log tag {0:?} is not registered")]
    UnregisteredTag(LogTag),

    #[error("Payload too large ({size} > {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Corrupt entry {peer_id}/{tag:?}/{local_sequence}: {source}")]
    CorruptEntry {
        peer_id: PeerId,
        tag: LogTag,
        local_sequence: u64,
        source: CodecError,
    },

    #[error("Corrupt record {key:?}: {reason}")]
    CorruptRecord { key: EntryKey, reason: String },
}

pub type Result<T> = std::result::Result<T, OplogError>;

impl OplogError {
    /// Key of the offending entry when the error is per-entry corruption.
    pub fn corrupt_key(&self) -> Option<EntryKey> {
        match self {
            OplogError::CorruptEntry {
                peer_id,
                tag,
                local_sequence,
                ..
            } => Some(EntryKey::new(*peer_id, *tag, *local_sequence)),
            OplogError::CorruptRecord { key, .. } => Some(*key),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// OperationLog
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct OperationLog {
    registry: TagRegistry,
    options: CodecOptions,
}

impl OperationLog {
    pub fn new(registry: TagRegistry, options: CodecOptions) -> Self {
        OperationLog { registry, options }
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn codec_options(&self) -> CodecOptions {
        self.options
    }

    /// Append `payload` to the `(peer_id, tag)` scope.
    ///
    /// Visible to readers only once `txn` commits.
    pub fn append(
        &self,
        txn: &Transaction<'_>,
        peer_id: PeerId,
        tag: LogTag,
        payload: &OperationPayload,
    ) -> Result<LogEntry> {
        let domain = self
            .registry
            .domain_of(tag)
            .ok_or(OplogError::UnregisteredTag(tag))?;

        let contents = payload.encode(self.options);
        if limits::check_contents_size(contents.len()) == ContentsStatus::TooLarge {
            return Err(OplogError::PayloadTooLarge {
                size: contents.len(),
                max: limits::MAX_ENTRY_CONTENTS_BYTES,
            });
        }

        let local_sequence = next_counter(txn, &local_counter_key(peer_id, tag))?;
        let merged_sequence = next_counter(txn, &merged_counter_key(domain))?;

        let key = EntryKey::new(peer_id, tag, local_sequence);
        let stored = StoredEntry {
            merged_sequence,
            domain,
            kind: payload.kind() as u8,
            contents,
        };
        let log_key = key.to_key();
        txn.put(Space::OperationLog, &log_key, &stored.to_bytes()?)?;
        txn.put(
            Space::MergedIndex,
            &merged_key(domain, merged_sequence),
            &log_key,
        )?;

        log::debug!(
            "Appended {} to {}/{} (local {}, merged {})",
            payload.kind().as_str(),
            peer_id,
            tag.as_str(),
            local_sequence,
            merged_sequence
        );
        Ok(LogEntry::from_stored(key, stored))
    }

    /// Entries of one scope in ascending `local_sequence`, fetched lazily in
    /// pages. Sees uncommitted writes made earlier in `txn`.
    pub fn iterate<'t, 'c>(
        &self,
        txn: &'t Transaction<'c>,
        peer_id: PeerId,
        tag: LogTag,
    ) -> Entries<'t, 'c> {
        Entries {
            txn,
            range: KeyRange::prefix(scope_prefix(peer_id, tag).as_slice()),
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Head of a scope, if any.
    pub fn first(
        &self,
        txn: &Transaction<'_>,
        peer_id: PeerId,
        tag: LogTag,
    ) -> Result<Option<LogEntry>> {
        self.iterate(txn, peer_id, tag).next().transpose()
    }

    pub fn get(&self, txn: &Transaction<'_>, key: EntryKey) -> Result<Option<LogEntry>> {
        match txn.get(Space::OperationLog, &key.to_key())? {
            Some(raw) => read_entry(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    pub fn count(&self, txn: &Transaction<'_>, peer_id: PeerId, tag: LogTag) -> Result<usize> {
        let range = KeyRange::prefix(scope_prefix(peer_id, tag).as_slice());
        Ok(txn.count(Space::OperationLog, &range)?)
    }

    /// Delete one entry. Returns `false` if it was already gone.
    pub fn remove(&self, txn: &Transaction<'_>, key: EntryKey) -> Result<bool> {
        let log_key = key.to_key();
        let Some(raw) = txn.get(Space::OperationLog, &log_key)? else {
            return Ok(false);
        };
        match StoredEntry::from_bytes(&raw) {
            Ok(stored) => {
                txn.remove(
                    Space::MergedIndex,
                    &merged_key(stored.domain, stored.merged_sequence),
                )?;
            }
            Err(_) => remove_index_rows_for(txn, &log_key)?,
        }
        txn.remove(Space::OperationLog, &log_key)?;
        log::debug!(
            "Removed {}/{}/{}",
            key.peer_id,
            key.tag.as_str(),
            key.local_sequence
        );
        Ok(true)
    }

    /// Up to `limit` entries of `domain` in `merged_sequence` order, starting
    /// strictly after `after`.
    pub fn merged_entries(
        &self,
        txn: &Transaction<'_>,
        domain: MergeDomain,
        after: Option<u64>,
        limit: usize,
    ) -> Result<Vec<LogEntry>> {
        let prefix = [domain.0];
        let mut range = KeyRange::prefix(&prefix);
        if let Some(after) = after {
            range = range.after(&merged_key(domain, after));
        }

        let mut out = Vec::new();
        while out.len() < limit {
            let want = (limit - out.len()).min(limits::ITERATE_PAGE_SIZE);
            let rows = txn.scan(Space::MergedIndex, &range, want)?;
            let fetched = rows.len();
            for (index_key, log_key) in &rows {
                let Some(key) = EntryKey::from_key(log_key) else {
                    log::warn!("Skipping malformed merged index value {}", hex::encode(log_key));
                    continue;
                };
                match txn.get(Space::OperationLog, log_key)? {
                    Some(raw) => match read_entry(key, &raw) {
                        Ok(entry) => out.push(entry),
                        Err(e) => log::warn!("Skipping in merged scan: {}", e),
                    },
                    None => log::debug!("Merged index entry {} has no log entry", hex::encode(index_key)),
                }
            }
            match rows.last() {
                Some((last, _)) if fetched == want => range = range.after(last),
                _ => break,
            }
        }
        Ok(out)
    }

    /// Every scope that currently holds at least one entry, in key order.
    pub fn pending_scopes(&self, txn: &Transaction<'_>) -> Result<Vec<(PeerId, LogTag)>> {
        let mut scopes = Vec::new();
        let mut range = KeyRange::prefix(&[]);
        loop {
            let Some((key, _)) = txn.scan(Space::OperationLog, &range, 1)?.into_iter().next()
            else {
                break;
            };
            let Some(entry_key) = EntryKey::from_key(&key) else {
                log::warn!("Skipping malformed log key {}", hex::encode(&key));
                range = range.after(&key);
                continue;
            };
            scopes.push((entry_key.peer_id, entry_key.tag));
            let prefix = scope_prefix(entry_key.peer_id, entry_key.tag).into_vec();
            match prefix_successor(&prefix) {
                Some(next) => {
                    range = KeyRange {
                        lower: next,
                        lower_inclusive: true,
                        upper: None,
                    }
                }
                None => break,
            }
        }
        Ok(scopes)
    }

    /// Move an undecodable entry out of the log so its scope can continue.
    /// The raw record is kept for inspection. Returns `false` if the entry
    /// no longer exists.
    pub fn quarantine(&self, txn: &Transaction<'_>, key: EntryKey, reason: &str) -> Result<bool> {
        let log_key = key.to_key();
        let Some(raw) = txn.get(Space::OperationLog, &log_key)? else {
            return Ok(false);
        };
        let record = QuarantinedEntry {
            key,
            raw,
            reason: reason.to_string(),
            quarantined_at_ms: chrono::Utc::now().timestamp_millis(),
        };
        let bytes = bincode::serialize(&record).map_err(|e| StoreError::Record(e.to_string()))?;
        txn.put(Space::Quarantine, &log_key, &bytes)?;
        self.remove(txn, key)?;

        log::error!(
            "Quarantined {}/{}/{}: {}",
            key.peer_id,
            key.tag.as_str(),
            key.local_sequence,
            reason
        );
        Ok(true)
    }

    pub fn quarantined(&self, txn: &Transaction<'_>) -> Result<Vec<QuarantinedEntry>> {
        let mut out = Vec::new();
        let mut range = KeyRange::prefix(&[]);
        loop {
            let rows = txn.scan(Space::Quarantine, &range, limits::ITERATE_PAGE_SIZE)?;
            for (_, value) in &rows {
                let record: QuarantinedEntry = bincode::deserialize(value)
                    .map_err(|e| StoreError::Record(e.to_string()))?;
                out.push(record);
            }
            match rows.last() {
                Some((last, _)) if rows.len() == limits::ITERATE_PAGE_SIZE => {
                    range = range.after(last)
                }
                _ => break,
            }
        }
        Ok(out)
    }
}

fn next_counter(txn: &Transaction<'_>, key: &[u8]) -> Result<u64> {
    let current = match txn.get(Space::Counters, key)? {
        Some(raw) => {
            let bytes: [u8; 8] = raw.as_slice().try_into().map_err(|_| {
                StoreError::Record(format!("Counter {} has length {}", hex::encode(key), raw.len()))
            })?;
            u64::from_be_bytes(bytes)
        }
        None => 0,
    };
    let next = current
        .checked_add(1)
        .ok_or_else(|| StoreError::Record(format!("Counter {} overflowed", hex::encode(key))))?;
    txn.put(Space::Counters, key, &next.to_be_bytes())?;
    Ok(current)
}

/// Index rows of an entry whose stored record no longer says where they are.
fn remove_index_rows_for(txn: &Transaction<'_>, log_key: &[u8]) -> Result<()> {
    let mut range = KeyRange::prefix(&[]);
    let mut orphans = Vec::new();
    loop {
        let rows = txn.scan(Space::MergedIndex, &range, limits::ITERATE_PAGE_SIZE)?;
        orphans.extend(
            rows.iter()
                .filter(|(_, value)| value.as_slice() == log_key)
                .map(|(index_key, _)| index_key.clone()),
        );
        match rows.last() {
            Some((last, _)) if rows.len() == limits::ITERATE_PAGE_SIZE => range = range.after(last),
            _ => break,
        }
    }
    for index_key in &orphans {
        txn.remove(Space::MergedIndex, index_key)?;
        log::debug!("Dropped merged index row {}", hex::encode(index_key));
    }
    Ok(())
}

fn read_entry(key: EntryKey, raw: &[u8]) -> Result<LogEntry> {
    let stored =
        StoredEntry::from_bytes(raw).map_err(|reason| OplogError::CorruptRecord { key, reason })?;
    Ok(LogEntry::from_stored(key, stored))
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Lazy, paged iterator over one scope. See [`OperationLog::iterate`].
pub struct Entries<'t, 'c> {
    txn: &'t Transaction<'c>,
    range: KeyRange,
    buffer: VecDeque<(Vec<u8>, Vec<u8>)>,
    exhausted: bool,
}

impl Entries<'_, '_> {
    fn fill(&mut self) -> Result<()> {
        let rows = self
            .txn
            .scan(Space::OperationLog, &self.range, limits::ITERATE_PAGE_SIZE)?;
        if rows.len() < limits::ITERATE_PAGE_SIZE {
            self.exhausted = true;
        }
        if let Some((last, _)) = rows.last() {
            self.range = self.range.after(last);
        }
        self.buffer.extend(rows);
        Ok(())
    }
}

impl Iterator for Entries<'_, '_> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
        let (key, value) = self.buffer.pop_front()?;
        let Some(entry_key) = EntryKey::from_key(&key) else {
            return Some(Err(StoreError::Record(format!(
                "Malformed log key {}",
                hex::encode(&key)
            ))
            .into()));
        };
        Some(read_entry(entry_key, &value))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MessageId;
    use crate::payload::{RemoveMessagesMode, RemoveMessagesPayload};
    use crate::storage::Database;

    fn payload(id: i32) -> OperationPayload {
        RemoveMessagesPayload {
            message_ids: vec![MessageId::new(PeerId::new(0, 1), 0, id)],
            mode: RemoveMessagesMode::ForEveryone,
        }
        .into()
    }

    fn tag() -> LogTag {
        LogTag::CloudChatRemoveMessages
    }

    #[test]
    fn test_local_sequences_are_per_scope() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let (a, b) = (PeerId::new(0, 1), PeerId::new(0, 2));

        let seqs = db
            .transaction(|txn| -> Result<Vec<(u64, u64)>> {
                let mut out = Vec::new();
                for (peer, id) in [(a, 1), (b, 2), (a, 3), (b, 4), (a, 5)] {
                    let entry = log.append(txn, peer, tag(), &payload(id))?;
                    out.push((entry.local_sequence, entry.merged_sequence));
                }
                Ok(out)
            })
            .unwrap();

        assert_eq!(seqs, vec![(0, 0), (0, 1), (1, 2), (1, 3), (2, 4)]);
    }

    #[test]
    fn test_iterate_returns_scope_in_order() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let peer = PeerId::new(0, 1);
        let other = PeerId::new(0, 2);

        db.transaction(|txn| -> Result<()> {
            for id in 0..5 {
                log.append(txn, peer, tag(), &payload(id))?;
                log.append(txn, other, tag(), &payload(100 + id))?;
            }
            Ok(())
        })
        .unwrap();

        let entries = db
            .transaction(|txn| log.iterate(txn, peer, tag()).collect::<Result<Vec<_>>>())
            .unwrap();
        let locals: Vec<u64> = entries.iter().map(|e| e.local_sequence).collect();
        assert_eq!(locals, vec![0, 1, 2, 3, 4]);
        assert!(entries.iter().all(|e| e.peer_id == peer));
        assert_eq!(
            entries[2].decode_payload(log.codec_options()).unwrap(),
            payload(2)
        );
    }

    #[test]
    fn test_iterate_pages_past_page_size() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let peer = PeerId::new(0, 1);
        let total = limits::ITERATE_PAGE_SIZE * 2 + 7;

        db.transaction(|txn| -> Result<()> {
            for id in 0..total {
                log.append(txn, peer, tag(), &payload(id as i32))?;
            }
            Ok(())
        })
        .unwrap();

        let (seen, counted) = db
            .transaction(|txn| -> Result<_> {
                let seen: Vec<u64> = log
                    .iterate(txn, peer, tag())
                    .map(|e| e.map(|e| e.local_sequence))
                    .collect::<Result<_>>()?;
                Ok((seen, log.count(txn, peer, tag())?))
            })
            .unwrap();
        assert_eq!(seen, (0..total as u64).collect::<Vec<_>>());
        assert_eq!(counted, total);
    }

    #[test]
    fn test_remove_is_idempotent_and_sequences_not_reused() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let peer = PeerId::new(0, 1);

        let first = db
            .transaction(|txn| log.append(txn, peer, tag(), &payload(1)))
            .unwrap();
        let removed = db
            .transaction(|txn| -> Result<(bool, bool)> {
                Ok((log.remove(txn, first.key())?, log.remove(txn, first.key())?))
            })
            .unwrap();
        assert_eq!(removed, (true, false));

        let next = db
            .transaction(|txn| log.append(txn, peer, tag(), &payload(2)))
            .unwrap();
        assert_eq!(next.local_sequence, 1);
        assert_eq!(next.merged_sequence, 1);

        let merged = db
            .transaction(|txn| log.merged_entries(txn, next.domain, None, 10))
            .unwrap();
        assert_eq!(merged, vec![next]);
    }

    #[test]
    fn test_rolled_back_append_leaves_no_gap() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let peer = PeerId::new(0, 1);

        let failed: Result<()> = db.transaction(|txn| {
            log.append(txn, peer, tag(), &payload(1))?;
            Err(StoreError::Record("abort".to_string()).into())
        });
        assert!(failed.is_err());

        let entry = db
            .transaction(|txn| log.append(txn, peer, tag(), &payload(2)))
            .unwrap();
        assert_eq!(entry.local_sequence, 0);
        assert_eq!(
            db.transaction(|txn| log.count(txn, peer, tag())).unwrap(),
            1
        );
    }

    #[test]
    fn test_merged_order_spans_peers_and_shared_domain() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::new(
            TagRegistry::single_domain(MergeDomain(0)),
            CodecOptions::default(),
        );
        let (a, b) = (PeerId::new(0, 1), PeerId::new(1, 1));

        db.transaction(|txn| -> Result<()> {
            log.append(txn, a, LogTag::CloudChatRemoveMessages, &payload(1))?;
            log.append(txn, b, LogTag::SynchronizeChatInputStates, &payload(2))?;
            log.append(txn, a, LogTag::SynchronizeChatInputStates, &payload(3))?;
            Ok(())
        })
        .unwrap();

        let (all, tail) = db
            .transaction(|txn| -> Result<_> {
                Ok((
                    log.merged_entries(txn, MergeDomain(0), None, 10)?,
                    log.merged_entries(txn, MergeDomain(0), Some(0), 1)?,
                ))
            })
            .unwrap();
        let merged: Vec<u64> = all.iter().map(|e| e.merged_sequence).collect();
        assert_eq!(merged, vec![0, 1, 2]);
        assert_eq!(all[1].peer_id, b);
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].merged_sequence, 1);
    }

    #[test]
    fn test_unregistered_tag_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::new(
            TagRegistry::empty().with(LogTag::CloudChatRemoveMessages, MergeDomain(0)),
            CodecOptions::default(),
        );
        let result = db.transaction(|txn| {
            log.append(
                txn,
                PeerId::new(0, 1),
                LogTag::SynchronizeChatInputStates,
                &payload(1),
            )
        });
        assert!(matches!(
            result,
            Err(OplogError::UnregisteredTag(LogTag::SynchronizeChatInputStates))
        ));
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let peer = PeerId::new(0, 1);
        let ids: Vec<MessageId> = (0..(limits::MAX_ENTRY_CONTENTS_BYTES / 16 + 1) as i32)
            .map(|i| MessageId::new(peer, 0, i))
            .collect();
        let big: OperationPayload = RemoveMessagesPayload {
            message_ids: ids,
            mode: RemoveMessagesMode::ForEveryone,
        }
        .into();

        let result = db.transaction(|txn| log.append(txn, peer, tag(), &big));
        assert!(matches!(result, Err(OplogError::PayloadTooLarge { .. })));
    }

    #[test]
    fn test_pending_scopes_lists_each_scope_once() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let (a, b) = (PeerId::new(0, 1), PeerId::from_i64(-5));

        let scopes = db
            .transaction(|txn| -> Result<_> {
                for id in 0..3 {
                    log.append(txn, a, LogTag::CloudChatRemoveMessages, &payload(id))?;
                }
                log.append(txn, a, LogTag::SynchronizeChatInputStates, &payload(9))?;
                log.append(txn, b, LogTag::CloudChatRemoveMessages, &payload(7))?;
                log.pending_scopes(txn)
            })
            .unwrap();

        assert_eq!(
            scopes,
            vec![
                (b, LogTag::CloudChatRemoveMessages),
                (a, LogTag::CloudChatRemoveMessages),
                (a, LogTag::SynchronizeChatInputStates),
            ]
        );
    }

    #[test]
    fn test_quarantine_moves_entry_out_of_scope() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let peer = PeerId::new(0, 1);

        let (head, quarantined) = db
            .transaction(|txn| -> Result<_> {
                let bad = log.append(txn, peer, tag(), &payload(1))?;
                log.append(txn, peer, tag(), &payload(2))?;
                assert!(log.quarantine(txn, bad.key(), "test")?);
                assert!(!log.quarantine(txn, bad.key(), "test")?);
                Ok((log.first(txn, peer, tag())?, log.quarantined(txn)?))
            })
            .unwrap();

        assert_eq!(head.map(|e| e.local_sequence), Some(1));
        assert_eq!(quarantined.len(), 1);
        assert_eq!(quarantined[0].key.local_sequence, 0);
        assert_eq!(quarantined[0].reason, "test");
    }

    #[test]
    fn test_corrupt_record_is_reported_with_key() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let peer = PeerId::new(0, 1);
        let key = EntryKey::new(peer, tag(), 0);

        let result = db.transaction(|txn| {
            txn.put(Space::OperationLog, &key.to_key(), &[0xff])?;
            log.first(txn, peer, tag())
        });
        match result {
            Err(err) => assert_eq!(err.corrupt_key(), Some(key)),
            Ok(_) => panic!("expected corrupt record"),
        }
    }

    #[test]
    fn test_corrupt_record_leaves_no_index_rows_and_merged_scan_skips_it() {
        let db = Database::open_in_memory().unwrap();
        let log = OperationLog::default();
        let peer = PeerId::new(0, 1);
        let domain = log.registry().domain_of(tag()).unwrap();

        let (merged, quarantined) = db
            .transaction(|txn| -> Result<_> {
                let bad = log.append(txn, peer, tag(), &payload(1))?;
                log.append(txn, peer, tag(), &payload(2))?;
                txn.put(Space::OperationLog, &bad.key().to_key(), &[0xff])?;

                let merged = log.merged_entries(txn, domain, None, 10)?;
                let quarantined = log.quarantine(txn, bad.key(), "undecodable")?;
                Ok((merged, quarantined))
            })
            .unwrap();
        assert!(quarantined);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].local_sequence, 1);

        let index_rows = db
            .transaction(|txn| txn.count(Space::MergedIndex, &KeyRange::prefix(&[])))
            .unwrap();
        assert_eq!(index_rows, 1);
    }
}

