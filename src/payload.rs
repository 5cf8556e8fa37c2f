/// Mutation-intent payloads carried by operation log entries.
///
/// Every payload is an immutable value built at the call site, encoded once
/// on append, and decoded by the synchronizer when the entry is drained.
/// The log entry stores an explicit [`PayloadKind`] discriminant next to the
/// encoded contents, so decoding dispatches on a closed set of kinds.
///
/// | Kind | Keys |
/// |------|------|
/// | `RemoveMessages` | `i` (MessageId array), `t` (mode) |
/// | `RemoveChat` | `p` (peer), `r` (report spam), `m` (optional top message) |
/// | `ClearHistory` | `p` (peer), `m` (top message) |
/// | `ChatInputState` | `t` (text), `s` (timestamp), `m` (optional reply-to) |
use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, CodecOptions, Coding, Decoder, Encoder, Result};
use crate::ids::{MessageId, PeerId};

// ---------------------------------------------------------------------------
// RemoveMessagesMode
// ---------------------------------------------------------------------------

/// Deletion scope. Stored as a raw `Int32`; there is no safe default for an
/// unrecognized value, so decoding one is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum RemoveMessagesMode {
    ForLocalPeerOnly = 0,
    ForEveryone = 1,
}

impl TryFrom<i32> for RemoveMessagesMode {
    type Error = i32;

    fn try_from(value: i32) -> std::result::Result<Self, i32> {
        match value {
            0 => Ok(Self::ForLocalPeerOnly),
            1 => Ok(Self::ForEveryone),
            other => Err(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload records
// ---------------------------------------------------------------------------

/// Delete a set of messages. Insertion order of `message_ids` is deletion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveMessagesPayload {
    pub message_ids: Vec<MessageId>,
    pub mode: RemoveMessagesMode,
}

impl Coding for RemoveMessagesPayload {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_message_id_array(&self.message_ids, "i");
        encoder.encode_int32(self.mode as i32, "t");
    }

    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        let message_ids = decoder.decode_message_id_array_for_key("i")?;
        let raw_mode = decoder.decode_int32_for_key("t", 0);
        let mode = RemoveMessagesMode::try_from(raw_mode).map_err(|value| {
            CodecError::UnknownDiscriminant {
                key: "t".to_string(),
                value,
            }
        })?;
        Ok(RemoveMessagesPayload { message_ids, mode })
    }
}

/// Remove a whole chat.
///
/// `top_message_id` is the cloud-namespace high-water mark captured when the
/// request was recorded; the remote side uses it to bound the deletion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveChatPayload {
    pub peer_id: PeerId,
    pub report_spam: bool,
    pub top_message_id: Option<MessageId>,
}

impl Coding for RemoveChatPayload {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_int64(self.peer_id.to_i64(), "p");
        encoder.encode_bool(self.report_spam, "r");
        encoder.encode_optional_message_id(self.top_message_id, "m");
    }

    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        Ok(RemoveChatPayload {
            peer_id: PeerId::from_i64(decoder.decode_int64_for_key("p", 0)),
            report_spam: decoder.decode_bool_for_key("r"),
            top_message_id: decoder.decode_optional_message_id_for_key("m")?,
        })
    }
}

/// Clear a chat's history up to and including `top_message_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClearHistoryPayload {
    pub peer_id: PeerId,
    pub top_message_id: MessageId,
}

impl Coding for ClearHistoryPayload {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_int64(self.peer_id.to_i64(), "p");
        encoder.encode_message_id(self.top_message_id, "m");
    }

    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        Ok(ClearHistoryPayload {
            peer_id: PeerId::from_i64(decoder.decode_int64_for_key("p", 0)),
            top_message_id: decoder.decode_message_id_for_key("m"),
        })
    }
}

/// Draft text and reply target to mirror to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatInputStatePayload {
    pub reply_to_message_id: Option<MessageId>,
    pub text: String,
    pub timestamp: i32,
}

impl Coding for ChatInputStatePayload {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_string(&self.text, "t");
        encoder.encode_int32(self.timestamp, "s");
        encoder.encode_optional_message_id(self.reply_to_message_id, "m");
    }

    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        Ok(ChatInputStatePayload {
            text: decoder.decode_string_for_key("t", ""),
            timestamp: decoder.decode_int32_for_key("s", 0),
            reply_to_message_id: decoder.decode_optional_message_id_for_key("m")?,
        })
    }
}

// ---------------------------------------------------------------------------
// PayloadKind / OperationPayload
// ---------------------------------------------------------------------------

/// Entry-level discriminant stored alongside the encoded contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PayloadKind {
    RemoveMessages = 0,
    RemoveChat = 1,
    ClearHistory = 2,
    ChatInputState = 3,
}

impl PayloadKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::RemoveMessages),
            1 => Some(Self::RemoveChat),
            2 => Some(Self::ClearHistory),
            3 => Some(Self::ChatInputState),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::RemoveMessages => "RemoveMessages",
            PayloadKind::RemoveChat => "RemoveChat",
            PayloadKind::ClearHistory => "ClearHistory",
            PayloadKind::ChatInputState => "ChatInputState",
        }
    }
}

/// Closed set of payloads an entry can carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationPayload {
    RemoveMessages(RemoveMessagesPayload),
    RemoveChat(RemoveChatPayload),
    ClearHistory(ClearHistoryPayload),
    ChatInputState(ChatInputStatePayload),
}

impl OperationPayload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            OperationPayload::RemoveMessages(_) => PayloadKind::RemoveMessages,
            OperationPayload::RemoveChat(_) => PayloadKind::RemoveChat,
            OperationPayload::ClearHistory(_) => PayloadKind::ClearHistory,
            OperationPayload::ChatInputState(_) => PayloadKind::ChatInputState,
        }
    }

    /// Encode the contents (without the kind discriminant).
    pub fn encode(&self, options: CodecOptions) -> Vec<u8> {
        match self {
            OperationPayload::RemoveMessages(p) => p.to_bytes(options),
            OperationPayload::RemoveChat(p) => p.to_bytes(options),
            OperationPayload::ClearHistory(p) => p.to_bytes(options),
            OperationPayload::ChatInputState(p) => p.to_bytes(options),
        }
    }

    /// Decode contents previously written for `kind`.
    pub fn decode(kind: PayloadKind, contents: &[u8], options: CodecOptions) -> Result<Self> {
        Ok(match kind {
            PayloadKind::RemoveMessages => {
                OperationPayload::RemoveMessages(RemoveMessagesPayload::from_bytes(contents, options)?)
            }
            PayloadKind::RemoveChat => {
                OperationPayload::RemoveChat(RemoveChatPayload::from_bytes(contents, options)?)
            }
            PayloadKind::ClearHistory => {
                OperationPayload::ClearHistory(ClearHistoryPayload::from_bytes(contents, options)?)
            }
            PayloadKind::ChatInputState => OperationPayload::ChatInputState(
                ChatInputStatePayload::from_bytes(contents, options)?,
            ),
        })
    }

    /// Decode with a raw discriminant, as read back from storage.
    pub fn decode_raw(kind: u8, contents: &[u8], options: CodecOptions) -> Result<Self> {
        let kind = PayloadKind::from_u8(kind).ok_or(CodecError::UnknownPayloadKind(kind))?;
        Self::decode(kind, contents, options)
    }
}

impl From<RemoveMessagesPayload> for OperationPayload {
    fn from(p: RemoveMessagesPayload) -> Self {
        OperationPayload::RemoveMessages(p)
    }
}

impl From<RemoveChatPayload> for OperationPayload {
    fn from(p: RemoveChatPayload) -> Self {
        OperationPayload::RemoveChat(p)
    }
}

impl From<ClearHistoryPayload> for OperationPayload {
    fn from(p: ClearHistoryPayload) -> Self {
        OperationPayload::ClearHistory(p)
    }
}

impl From<ChatInputStatePayload> for OperationPayload {
    fn from(p: ChatInputStatePayload) -> Self {
        OperationPayload::ChatInputState(p)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
