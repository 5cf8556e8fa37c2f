/// Core identity types for the operation log.
///
/// - `PeerId`: 64-bit peer identity (namespace in the high half, id in the low half)
/// - `MessageId`: `(peer, namespace, id)` composite identifying one message
/// - tight little-endian array buffer for bulk `MessageId` lists
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

pub mod namespaces {
    /// Peer namespaces (high 32 bits of a `PeerId`).
    pub mod peer {
        pub const CLOUD_USER: i32 = 0;
        pub const CLOUD_GROUP: i32 = 1;
        pub const CLOUD_CHANNEL: i32 = 2;
        pub const SECRET_CHAT: i32 = 3;
    }

    /// Message id namespaces within one peer's history.
    pub mod message {
        /// Server-confirmed messages.
        pub const CLOUD: i32 = 0;
        pub const LOCAL: i32 = 1;
        pub const SECRET_INCOMING: i32 = 2;
    }
}

// ---------------------------------------------------------------------------
// PeerId
// ---------------------------------------------------------------------------

/// Opaque, ordered peer identity.
///
/// Only decomposed into namespace/id at encode/decode boundaries; everywhere
/// else it is compared and hashed as a plain `i64`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId(i64);

impl PeerId {
    pub fn new(namespace: i32, id: i32) -> Self {
        PeerId(((namespace as i64) << 32) | (id as u32 as i64))
    }

    pub fn from_i64(value: i64) -> Self {
        PeerId(value)
    }

    pub fn to_i64(self) -> i64 {
        self.0
    }

    pub fn namespace(self) -> i32 {
        (self.0 >> 32) as i32
    }

    pub fn id(self) -> i32 {
        (self.0 & 0xffff_ffff) as u32 as i32
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({}:{})", self.namespace(), self.id())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace(), self.id())
    }
}

// ---------------------------------------------------------------------------
// MessageId
// ---------------------------------------------------------------------------

/// One message within one peer's conversation.
///
/// Field order matters: the derived ordering compares peer first, then
/// namespace, then id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId {
    pub peer_id: PeerId,
    pub namespace: i32,
    pub id: i32,
}

/// Size of one record in the tight array buffer: peer(8) + namespace(4) + id(4).
pub const MESSAGE_ID_RECORD_SIZE: usize = 16;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MessageIdBufferError {
    #[error("MessageId buffer too short for count prefix")]
    MissingCount,

    #[error("Negative MessageId count: {0}")]
    NegativeCount(i32),

    #[error("MessageId buffer length mismatch: {count} ids need {expected} bytes, got {actual}")]
    LengthMismatch {
        count: usize,
        expected: usize,
        actual: usize,
    },
}

impl MessageId {
    pub fn new(peer_id: PeerId, namespace: i32, id: i32) -> Self {
        MessageId {
            peer_id,
            namespace,
            id,
        }
    }

    /// Fixed 16-byte little-endian record.
    pub fn to_record(&self) -> [u8; MESSAGE_ID_RECORD_SIZE] {
        let mut out = [0u8; MESSAGE_ID_RECORD_SIZE];
        let mut buf = &mut out[..];
        buf.put_i64_le(self.peer_id.to_i64());
        buf.put_i32_le(self.namespace);
        buf.put_i32_le(self.id);
        out
    }

    /// Inverse of [`MessageId::to_record`].
    pub fn from_record(record: &[u8; MESSAGE_ID_RECORD_SIZE]) -> Self {
        let mut buf = &record[..];
        let peer_id = PeerId::from_i64(buf.get_i64_le());
        let namespace = buf.get_i32_le();
        let id = buf.get_i32_le();
        MessageId::new(peer_id, namespace, id)
    }

    /// Encode a list as `[count: i32 LE][record; count]`.
    ///
    /// Order is preserved; duplicates are written as given.
    pub fn encode_array(ids: &[MessageId]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + ids.len() * MESSAGE_ID_RECORD_SIZE);
        buf.put_i32_le(ids.len() as i32);
        for id in ids {
            buf.put_slice(&id.to_record());
        }
        buf
    }

    /// Decode a buffer produced by [`MessageId::encode_array`].
    ///
    /// The buffer must hold exactly `count` records.
    pub fn decode_array(bytes: &[u8]) -> Result<Vec<MessageId>, MessageIdBufferError> {
        let mut buf = bytes;
        if buf.remaining() < 4 {
            return Err(MessageIdBufferError::MissingCount);
        }
        let count = buf.get_i32_le();
        if count < 0 {
            return Err(MessageIdBufferError::NegativeCount(count));
        }
        let count = count as usize;
        let expected = count.saturating_mul(MESSAGE_ID_RECORD_SIZE);
        if buf.remaining() != expected {
            return Err(MessageIdBufferError::LengthMismatch {
                count,
                expected,
                actual: buf.remaining(),
            });
        }

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let peer_id = PeerId::from_i64(buf.get_i64_le());
            let namespace = buf.get_i32_le();
            let id = buf.get_i32_le();
            ids.push(MessageId::new(peer_id, namespace, id));
        }
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_peer_id_decomposition() {
        let peer = PeerId::new(namespaces::peer::CLOUD_CHANNEL, 1_000_000);
        assert_eq!(peer.namespace(), 2);
        assert_eq!(peer.id(), 1_000_000);
        assert_eq!(PeerId::from_i64(peer.to_i64()), peer);
    }

    #[test]
    fn test_peer_id_negative_id_survives() {
        let peer = PeerId::new(namespaces::peer::SECRET_CHAT, -5);
        assert_eq!(peer.namespace(), 3);
        assert_eq!(peer.id(), -5);
    }

    #[test]
    fn test_message_id_ordering_is_peer_first() {
        let a = PeerId::new(0, 1);
        let b = PeerId::new(0, 2);
        let low_peer_high_id = MessageId::new(a, 1, 999);
        let high_peer_low_id = MessageId::new(b, 0, 1);
        assert!(low_peer_high_id < high_peer_low_id);

        let same_peer_ns0 = MessageId::new(a, 0, 50);
        let same_peer_ns1 = MessageId::new(a, 1, 10);
        assert!(same_peer_ns0 < same_peer_ns1);
    }

    #[test]
    fn test_array_layout_is_tight() {
        let ids = vec![MessageId::new(PeerId::from_i64(1), 0, 7)];
        let bytes = MessageId::encode_array(&ids);
        assert_eq!(
            bytes,
            hex!("01000000 0100000000000000 00000000 07000000").to_vec()
        );
    }

    #[test]
    fn test_array_preserves_order_and_duplicates() {
        let peer = PeerId::new(0, 42);
        let ids = vec![
            MessageId::new(peer, 0, 3),
            MessageId::new(peer, 0, 1),
            MessageId::new(peer, 0, 3),
        ];
        let decoded = MessageId::decode_array(&MessageId::encode_array(&ids)).unwrap();
        assert_eq!(decoded, ids);
    }

    #[test]
    fn test_array_rejects_truncated_buffer() {
        let peer = PeerId::new(0, 42);
        let mut bytes = MessageId::encode_array(&[MessageId::new(peer, 0, 1)]);
        bytes.pop();
        assert!(matches!(
            MessageId::decode_array(&bytes),
            Err(MessageIdBufferError::LengthMismatch { count: 1, .. })
        ));
        assert_eq!(
            MessageId::decode_array(&[1, 0]),
            Err(MessageIdBufferError::MissingCount)
        );
    }

    #[test]
    fn test_array_rejects_negative_count() {
        let bytes = (-1i32).to_le_bytes();
        assert_eq!(
            MessageId::decode_array(&bytes),
            Err(MessageIdBufferError::NegativeCount(-1))
        );
    }
}
