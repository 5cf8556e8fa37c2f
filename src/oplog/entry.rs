/// Log entry types and their storage layout.
///
/// - log key:     `[peer: i64 ordered][tag: u8][local_sequence: u64 BE]`
/// - merged key:  `[domain: u8][merged_sequence: u64 BE]` -> log key
/// - record:      bincode `StoredEntry`
use serde::{Deserialize, Serialize};

use super::tags::{LogTag, MergeDomain};
use super::{OplogError, Result};
use crate::codec::CodecOptions;
use crate::ids::PeerId;
use crate::payload::{OperationPayload, PayloadKind};
use crate::storage::keys::{KeyBuf, KeyReader};
use crate::storage::StoreError;

// ---------------------------------------------------------------------------
// EntryKey
// ---------------------------------------------------------------------------

/// Identity of one entry: unique per `(peer, tag, local_sequence)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub peer_id: PeerId,
    pub tag: LogTag,
    pub local_sequence: u64,
}

impl EntryKey {
    pub fn new(peer_id: PeerId, tag: LogTag, local_sequence: u64) -> Self {
        EntryKey {
            peer_id,
            tag,
            local_sequence,
        }
    }

    pub(crate) fn to_key(self) -> Vec<u8> {
        scope_prefix(self.peer_id, self.tag)
            .u64(self.local_sequence)
            .into_vec()
    }

    pub(crate) fn from_key(key: &[u8]) -> Option<Self> {
        let mut reader = KeyReader::new(key);
        let peer_id = reader.peer()?;
        let tag = LogTag::from_u8(reader.u8()?)?;
        let local_sequence = reader.u64()?;
        if !reader.is_empty() {
            return None;
        }
        Some(EntryKey::new(peer_id, tag, local_sequence))
    }
}

pub(crate) fn scope_prefix(peer_id: PeerId, tag: LogTag) -> KeyBuf {
    KeyBuf::new().peer(peer_id).u8(tag as u8)
}

pub(crate) fn merged_key(domain: MergeDomain, merged_sequence: u64) -> Vec<u8> {
    KeyBuf::new().u8(domain.0).u64(merged_sequence).into_vec()
}

pub(crate) fn local_counter_key(peer_id: PeerId, tag: LogTag) -> Vec<u8> {
    KeyBuf::new().u8(0x01).peer(peer_id).u8(tag as u8).into_vec()
}

pub(crate) fn merged_counter_key(domain: MergeDomain) -> Vec<u8> {
    KeyBuf::new().u8(0x02).u8(domain.0).into_vec()
}

// ---------------------------------------------------------------------------
// StoredEntry
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredEntry {
    pub merged_sequence: u64,
    pub domain: MergeDomain,
    pub kind: u8,
    pub contents: Vec<u8>,
}

impl StoredEntry {
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, StoreError> {
        bincode::serialize(self).map_err(|e| StoreError::Record(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, String> {
        bincode::deserialize(bytes).map_err(|e| e.to_string())
    }
}

// ---------------------------------------------------------------------------
// LogEntry
// ---------------------------------------------------------------------------

/// A committed entry as read back from the log.
///
/// `kind` is the raw discriminant byte so that an entry with an unknown kind
/// can still be surfaced and quarantined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub peer_id: PeerId,
    pub tag: LogTag,
    pub local_sequence: u64,
    pub merged_sequence: u64,
    pub domain: MergeDomain,
    pub kind: u8,
    pub contents: Vec<u8>,
}

impl LogEntry {
    pub(crate) fn from_stored(key: EntryKey, stored: StoredEntry) -> Self {
        LogEntry {
            peer_id: key.peer_id,
            tag: key.tag,
            local_sequence: key.local_sequence,
            merged_sequence: stored.merged_sequence,
            domain: stored.domain,
            kind: stored.kind,
            contents: stored.contents,
        }
    }

    pub fn key(&self) -> EntryKey {
        EntryKey::new(self.peer_id, self.tag, self.local_sequence)
    }

    pub fn payload_kind(&self) -> Option<PayloadKind> {
        PayloadKind::from_u8(self.kind)
    }

    /// Decode the payload; failures are reported as `CorruptEntry`.
    pub fn decode_payload(&self, options: CodecOptions) -> Result<OperationPayload> {
        OperationPayload::decode_raw(self.kind, &self.contents, options).map_err(|source| {
            OplogError::CorruptEntry {
                peer_id: self.peer_id,
                tag: self.tag,
                local_sequence: self.local_sequence,
                source,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// QuarantinedEntry
// ---------------------------------------------------------------------------

/// An entry pulled out of the log because it could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantinedEntry {
    pub key: EntryKey,
    /// The stored record exactly as it was found.
    pub raw: Vec<u8>,
    pub reason: String,
    pub quarantined_at_ms: i64,
}
