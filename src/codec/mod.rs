//! Keyed binary codec for operation payloads and preferences entries.
//!
//! A record is a flat, ordered list of `(short key, typed value)` fields:
//!
//! ```text
//! field := [key_len: u8][key: utf8][value_type: u8][value]
//! value := Int32  -> 4 bytes LE
//!        | Int64  -> 8 bytes LE
//!        | String -> [len: u32 LE][utf8]
//!        | Bytes  -> [len: u32 LE][raw]
//!        | Nil    -> (empty)
//! ```
//!
//! Lookups by key never fail: a missing key (or a key holding a value of a
//! different type) yields the caller's default. Only structural damage to
//! the buffer itself, or a value that has no safe default, is an error.
//!
//! `MessageId` lists are stored as a single `Bytes` field holding the tight
//! array buffer from [`crate::ids::MessageId::encode_array`].

mod decoder;
mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::MessageIdBufferError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("Record truncated at offset {offset} (need {needed} more bytes)")]
    Truncated { offset: usize, needed: usize },

    #[error("Field key at offset {offset} is not valid UTF-8")]
    InvalidKey { offset: usize },

    #[error("String value for key '{key}' is not valid UTF-8")]
    InvalidString { key: String },

    #[error("Unknown value type {tag} at offset {offset}")]
    UnknownValueType { offset: usize, tag: u8 },

    #[error("Malformed MessageId array under key '{key}': {source}")]
    MessageIdArray {
        key: String,
        source: MessageIdBufferError,
    },

    #[error("Unrecognized discriminant {value} under key '{key}'")]
    UnknownDiscriminant { key: String, value: i32 },

    #[error("Optional composite '{key}' is only partially present")]
    PartialOptional { key: String },

    #[error("Optional composite '{key}' has invalid presence byte {byte}")]
    InvalidPresence { key: String, byte: u8 },

    #[error("Optional composite '{key}' has invalid length {len}")]
    InvalidOptionalLength { key: String, len: usize },

    #[error("Unknown payload kind {0}")]
    UnknownPayloadKind(u8),
}

pub type Result<T> = std::result::Result<T, CodecError>;

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum ValueType {
    Int32 = 0,
    Int64 = 1,
    String = 2,
    Bytes = 3,
    Nil = 4,
}

impl ValueType {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Int32),
            1 => Some(Self::Int64),
            2 => Some(Self::String),
            3 => Some(Self::Bytes),
            4 => Some(Self::Nil),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Optional MessageId encoding
// ---------------------------------------------------------------------------

/// How an optional `MessageId` field is written and read.
///
/// `SplitFields` is the historical layout: three independently optional
/// scalars `<key>.p` / `<key>.n` / `<key>.i`, where any missing one means
/// the whole id is absent. `Tagged` writes one `<key>` bytes field with a
/// presence byte and reads the split layout strictly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalIdEncoding {
    #[default]
    SplitFields,
    Tagged,
}

/// Options threaded through an [`Encoder`] / [`Decoder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodecOptions {
    pub optional_ids: OptionalIdEncoding,
}

impl CodecOptions {
    pub fn new(optional_ids: OptionalIdEncoding) -> Self {
        CodecOptions { optional_ids }
    }
}

// ---------------------------------------------------------------------------
// Coding
// ---------------------------------------------------------------------------

/// A record that can be written to and read from the keyed codec.
pub trait Coding: Sized {
    fn encode(&self, encoder: &mut Encoder);
    fn decode(decoder: &Decoder<'_>) -> Result<Self>;

    /// Encode into a fresh buffer.
    fn to_bytes(&self, options: CodecOptions) -> Vec<u8> {
        let mut encoder = Encoder::new(options);
        self.encode(&mut encoder);
        encoder.finish()
    }

    /// Decode from a buffer produced by [`Coding::to_bytes`].
    fn from_bytes(bytes: &[u8], options: CodecOptions) -> Result<Self> {
        let decoder = Decoder::new(bytes, options)?;
        Self::decode(&decoder)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
