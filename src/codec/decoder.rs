use bytes::Buf;

use super::{CodecError, CodecOptions, OptionalIdEncoding, Result, ValueType};
use crate::ids::{MessageId, PeerId, MESSAGE_ID_RECORD_SIZE};

#[derive(Clone, Copy, Debug)]
enum Value<'a> {
    Int32(i32),
    Int64(i64),
    String(&'a str),
    Bytes(&'a [u8]),
    Nil,
}

/// Read side of the keyed codec.
///
/// The whole record is validated once in [`Decoder::new`]; after that every
/// lookup is infallible except the few that interpret a value with no safe
/// default. When a key repeats, the first occurrence wins.
pub struct Decoder<'a> {
    fields: Vec<(&'a str, Value<'a>)>,
    options: CodecOptions,
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.data.len() < n {
            return Err(CodecError::Truncated {
                offset: self.offset,
                needed: n - self.data.len(),
            });
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        self.offset += n;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32_le(&mut self) -> Result<u32> {
        let mut bytes = self.take(4)?;
        Ok(bytes.get_u32_le())
    }
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8], options: CodecOptions) -> Result<Self> {
        let mut cursor = Cursor { data, offset: 0 };
        let mut fields = Vec::new();

        while !cursor.data.is_empty() {
            let key_len = cursor.u8()? as usize;
            let key_offset = cursor.offset;
            let key = std::str::from_utf8(cursor.take(key_len)?)
                .map_err(|_| CodecError::InvalidKey { offset: key_offset })?;

            let type_offset = cursor.offset;
            let tag = cursor.u8()?;
            let value_type = ValueType::from_u8(tag).ok_or(CodecError::UnknownValueType {
                offset: type_offset,
                tag,
            })?;

            let value = match value_type {
                ValueType::Int32 => Value::Int32(cursor.take(4)?.get_i32_le()),
                ValueType::Int64 => Value::Int64(cursor.take(8)?.get_i64_le()),
                ValueType::String => {
                    let len = cursor.u32_le()? as usize;
                    let raw = cursor.take(len)?;
                    let s = std::str::from_utf8(raw).map_err(|_| CodecError::InvalidString {
                        key: key.to_string(),
                    })?;
                    Value::String(s)
                }
                ValueType::Bytes => {
                    let len = cursor.u32_le()? as usize;
                    Value::Bytes(cursor.take(len)?)
                }
                ValueType::Nil => Value::Nil,
            };
            fields.push((key, value));
        }

        Ok(Decoder { fields, options })
    }

    fn get(&self, key: &str) -> Option<Value<'a>> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// True if the key is present with any value type, including nil.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| *k == key)
    }

    pub fn decode_optional_int32_for_key(&self, key: &str) -> Option<i32> {
        match self.get(key) {
            Some(Value::Int32(v)) => Some(v),
            _ => None,
        }
    }

    pub fn decode_int32_for_key(&self, key: &str, or_else: i32) -> i32 {
        self.decode_optional_int32_for_key(key).unwrap_or(or_else)
    }

    pub fn decode_optional_int64_for_key(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(Value::Int64(v)) => Some(v),
            _ => None,
        }
    }

    pub fn decode_int64_for_key(&self, key: &str, or_else: i64) -> i64 {
        self.decode_optional_int64_for_key(key).unwrap_or(or_else)
    }

    pub fn decode_bool_for_key(&self, key: &str) -> bool {
        self.decode_int32_for_key(key, 0) != 0
    }

    pub fn decode_optional_string_for_key(&self, key: &str) -> Option<&'a str> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn decode_string_for_key(&self, key: &str, or_else: &str) -> String {
        self.decode_optional_string_for_key(key)
            .unwrap_or(or_else)
            .to_string()
    }

    pub fn decode_bytes_for_key(&self, key: &str) -> Option<&'a [u8]> {
        match self.get(key) {
            Some(Value::Bytes(b)) => Some(b),
            _ => None,
        }
    }

    /// Absent key is an empty list; a present but malformed buffer is an error.
    pub fn decode_message_id_array_for_key(&self, key: &str) -> Result<Vec<MessageId>> {
        match self.decode_bytes_for_key(key) {
            None => Ok(Vec::new()),
            Some(bytes) => {
                MessageId::decode_array(bytes).map_err(|source| CodecError::MessageIdArray {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    /// Required id: each missing sub-field defaults to zero.
    pub fn decode_message_id_for_key(&self, key: &str) -> MessageId {
        MessageId::new(
            PeerId::from_i64(self.decode_int64_for_key(&format!("{}.p", key), 0)),
            self.decode_int32_for_key(&format!("{}.n", key), 0),
            self.decode_int32_for_key(&format!("{}.i", key), 0),
        )
    }

    fn split_message_id_parts(&self, key: &str) -> (Option<i64>, Option<i32>, Option<i32>) {
        (
            self.decode_optional_int64_for_key(&format!("{}.p", key)),
            self.decode_optional_int32_for_key(&format!("{}.n", key)),
            self.decode_optional_int32_for_key(&format!("{}.i", key)),
        )
    }

    /// Optional id, interpreted according to [`OptionalIdEncoding`].
    ///
    /// `SplitFields` never fails: any missing sub-field means `None`.
    /// `Tagged` reads the presence-byte field strictly and, when it is
    /// absent, rejects partially present split fields.
    pub fn decode_optional_message_id_for_key(&self, key: &str) -> Result<Option<MessageId>> {
        match self.options.optional_ids {
            OptionalIdEncoding::SplitFields => {
                // Records written in tagged mode stay readable after a downgrade.
                if let Some(bytes) = self.decode_bytes_for_key(key) {
                    return decode_tagged_id(key, bytes);
                }
                match self.split_message_id_parts(key) {
                    (Some(peer), Some(namespace), Some(id)) => Ok(Some(MessageId::new(
                        PeerId::from_i64(peer),
                        namespace,
                        id,
                    ))),
                    _ => Ok(None),
                }
            }
            OptionalIdEncoding::Tagged => {
                if let Some(bytes) = self.decode_bytes_for_key(key) {
                    return decode_tagged_id(key, bytes);
                }
                match self.split_message_id_parts(key) {
                    (Some(peer), Some(namespace), Some(id)) => Ok(Some(MessageId::new(
                        PeerId::from_i64(peer),
                        namespace,
                        id,
                    ))),
                    (None, None, None) => Ok(None),
                    _ => Err(CodecError::PartialOptional {
                        key: key.to_string(),
                    }),
                }
            }
        }
    }
}

fn decode_tagged_id(key: &str, bytes: &[u8]) -> Result<Option<MessageId>> {
    match bytes.first() {
        Some(0) if bytes.len() == 1 => Ok(None),
        Some(1) if bytes.len() == 1 + MESSAGE_ID_RECORD_SIZE => {
            let mut record = [0u8; MESSAGE_ID_RECORD_SIZE];
            record.copy_from_slice(&bytes[1..]);
            Ok(Some(MessageId::from_record(&record)))
        }
        Some(0) | Some(1) => Err(CodecError::InvalidOptionalLength {
            key: key.to_string(),
            len: bytes.len(),
        }),
        Some(&byte) => Err(CodecError::InvalidPresence {
            key: key.to_string(),
            byte,
        }),
        None => Err(CodecError::InvalidOptionalLength {
            key: key.to_string(),
            len: 0,
        }),
    }
}
