/// Business-level helpers that record mutation intents.
///
/// Each helper builds a payload and appends it to the log inside the
/// caller's transaction. `record_remove_chat` and `record_clear_history`
/// read the peer's top cloud message through a [`MessageIndex`] in that same
/// transaction, so the snapshot and the append commit together.
use crate::ids::{namespaces, MessageId, MessageIdBufferError, PeerId, MESSAGE_ID_RECORD_SIZE};
use crate::oplog::{LogEntry, LogTag, OperationLog, Result};
use crate::payload::{
    ChatInputStatePayload, ClearHistoryPayload, RemoveChatPayload, RemoveMessagesMode,
    RemoveMessagesPayload,
};
use crate::storage::keys::KeyBuf;
use crate::storage::{Space, StoreError, Transaction};

// ---------------------------------------------------------------------------
// MessageIndex
// ---------------------------------------------------------------------------

/// Read access to per-peer message high-water marks.
pub trait MessageIndex {
    /// Highest message of `peer_id` in `namespace`, or `None` if the
    /// namespace holds no messages.
    fn top_message_id(
        &self,
        txn: &Transaction<'_>,
        peer_id: PeerId,
        namespace: i32,
    ) -> std::result::Result<Option<MessageId>, StoreError>;
}

/// [`MessageIndex`] kept in the operation store itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoredMessageIndex;

impl StoredMessageIndex {
    fn key(peer_id: PeerId, namespace: i32) -> Vec<u8> {
        KeyBuf::new().peer(peer_id).i32(namespace).into_vec()
    }

    pub fn set_top_message_id(
        &self,
        txn: &Transaction<'_>,
        message_id: MessageId,
    ) -> std::result::Result<(), StoreError> {
        txn.put(
            Space::MessageIndex,
            &Self::key(message_id.peer_id, message_id.namespace),
            &message_id.to_record(),
        )
    }

    pub fn clear_top_message_id(
        &self,
        txn: &Transaction<'_>,
        peer_id: PeerId,
        namespace: i32,
    ) -> std::result::Result<bool, StoreError> {
        txn.remove(Space::MessageIndex, &Self::key(peer_id, namespace))
    }
}

impl MessageIndex for StoredMessageIndex {
    fn top_message_id(
        &self,
        txn: &Transaction<'_>,
        peer_id: PeerId,
        namespace: i32,
    ) -> std::result::Result<Option<MessageId>, StoreError> {
        let Some(raw) = txn.get(Space::MessageIndex, &Self::key(peer_id, namespace))? else {
            return Ok(None);
        };
        let record: &[u8; MESSAGE_ID_RECORD_SIZE] = raw.as_slice().try_into().map_err(|_| {
            StoreError::Record(
                MessageIdBufferError::LengthMismatch {
                    count: 1,
                    expected: MESSAGE_ID_RECORD_SIZE,
                    actual: raw.len(),
                }
                .to_string(),
            )
        })?;
        Ok(Some(MessageId::from_record(record)))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Always appends.
pub fn record_remove_messages(
    log: &OperationLog,
    txn: &Transaction<'_>,
    peer_id: PeerId,
    message_ids: Vec<MessageId>,
    mode: RemoveMessagesMode,
) -> Result<LogEntry> {
    let payload = RemoveMessagesPayload { message_ids, mode };
    log.append(
        txn,
        peer_id,
        LogTag::CloudChatRemoveMessages,
        &payload.into(),
    )
}

/// Appends a removal carrying the current top cloud message (possibly none).
pub fn record_remove_chat<I: MessageIndex + ?Sized>(
    log: &OperationLog,
    index: &I,
    txn: &Transaction<'_>,
    peer_id: PeerId,
    report_spam: bool,
) -> Result<LogEntry> {
    let top_message_id = index.top_message_id(txn, peer_id, namespaces::message::CLOUD)?;
    let payload = RemoveChatPayload {
        peer_id,
        report_spam,
        top_message_id,
    };
    log.append(
        txn,
        peer_id,
        LogTag::CloudChatRemoveMessages,
        &payload.into(),
    )
}

/// Appends only when the peer has a top cloud message; clearing an empty
/// history records nothing and returns `None`.
pub fn record_clear_history<I: MessageIndex + ?Sized>(
    log: &OperationLog,
    index: &I,
    txn: &Transaction<'_>,
    peer_id: PeerId,
) -> Result<Option<LogEntry>> {
    let Some(top_message_id) = index.top_message_id(txn, peer_id, namespaces::message::CLOUD)?
    else {
        log::debug!("Clear history for {} skipped: no cloud messages", peer_id);
        return Ok(None);
    };
    let payload = ClearHistoryPayload {
        peer_id,
        top_message_id,
    };
    log.append(
        txn,
        peer_id,
        LogTag::CloudChatRemoveMessages,
        &payload.into(),
    )
    .map(Some)
}

pub fn record_chat_input_state(
    log: &OperationLog,
    txn: &Transaction<'_>,
    peer_id: PeerId,
    state: ChatInputStatePayload,
) -> Result<LogEntry> {
    log.append(
        txn,
        peer_id,
        LogTag::SynchronizeChatInputStates,
        &state.into(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
