use bytes::BufMut;

use super::{CodecOptions, OptionalIdEncoding, ValueType};
use crate::ids::MessageId;
use crate::limits::MAX_CODEC_KEY_LEN;

/// Append-only writer for keyed records.
///
/// Keys are short static tags chosen by the record types in this crate, so
/// an over-long key is a programming error rather than a runtime condition.
pub struct Encoder {
    buf: Vec<u8>,
    options: CodecOptions,
}

impl Encoder {
    pub fn new(options: CodecOptions) -> Self {
        Encoder {
            buf: Vec::new(),
            options,
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn put_key(&mut self, key: &str, value_type: ValueType) {
        debug_assert!(key.len() <= MAX_CODEC_KEY_LEN, "codec key too long: {}", key);
        let key = &key.as_bytes()[..key.len().min(MAX_CODEC_KEY_LEN)];
        self.buf.put_u8(key.len() as u8);
        self.buf.put_slice(key);
        self.buf.put_u8(value_type as u8);
    }

    pub fn encode_int32(&mut self, value: i32, key: &str) {
        self.put_key(key, ValueType::Int32);
        self.buf.put_i32_le(value);
    }

    pub fn encode_int64(&mut self, value: i64, key: &str) {
        self.put_key(key, ValueType::Int64);
        self.buf.put_i64_le(value);
    }

    /// Booleans travel as `Int32` 0/1.
    pub fn encode_bool(&mut self, value: bool, key: &str) {
        self.encode_int32(if value { 1 } else { 0 }, key);
    }

    pub fn encode_string(&mut self, value: &str, key: &str) {
        self.put_key(key, ValueType::String);
        self.buf.put_u32_le(value.len() as u32);
        self.buf.put_slice(value.as_bytes());
    }

    pub fn encode_bytes(&mut self, value: &[u8], key: &str) {
        self.put_key(key, ValueType::Bytes);
        self.buf.put_u32_le(value.len() as u32);
        self.buf.put_slice(value);
    }

    pub fn encode_nil(&mut self, key: &str) {
        self.put_key(key, ValueType::Nil);
    }

    pub fn encode_message_id_array(&mut self, ids: &[MessageId], key: &str) {
        self.encode_bytes(&MessageId::encode_array(ids), key);
    }

    /// Required id: always the three split scalars.
    pub fn encode_message_id(&mut self, id: MessageId, key: &str) {
        self.encode_int64(id.peer_id.to_i64(), &format!("{}.p", key));
        self.encode_int32(id.namespace, &format!("{}.n", key));
        self.encode_int32(id.id, &format!("{}.i", key));
    }

    /// Optional id, all-or-none. Layout depends on [`OptionalIdEncoding`].
    pub fn encode_optional_message_id(&mut self, id: Option<MessageId>, key: &str) {
        match self.options.optional_ids {
            OptionalIdEncoding::SplitFields => match id {
                Some(id) => self.encode_message_id(id, key),
                None => {
                    self.encode_nil(&format!("{}.p", key));
                    self.encode_nil(&format!("{}.n", key));
                    self.encode_nil(&format!("{}.i", key));
                }
            },
            OptionalIdEncoding::Tagged => match id {
                Some(id) => {
                    let mut value = Vec::with_capacity(17);
                    value.put_u8(1);
                    value.put_slice(&id.to_record());
                    self.encode_bytes(&value, key);
                }
                None => self.encode_bytes(&[0], key),
            },
        }
    }
}
