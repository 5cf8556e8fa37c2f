/// Generic preferences entry store.
///
/// Maps a [`PreferencesKey`] to one codec-encoded entry. Writes go through
/// [`Preferences::update`], a read-modify-write inside the caller's
/// transaction that skips the write when the new value equals the old one.
/// Conditional updates (replace only if the current value still matches)
/// are expressed in the update closure, never as blind overwrites.
use thiserror::Error;

use crate::codec::{CodecError, CodecOptions, Coding, Decoder, Encoder};
use crate::storage::keys::KeyBuf;
use crate::storage::{Database, Space, StoreError, Transaction};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Preferences entry {key:?} could not be decoded: {source}")]
    Decode {
        key: PreferencesKey,
        source: CodecError,
    },
}

pub type Result<T> = std::result::Result<T, PreferencesError>;

// ---------------------------------------------------------------------------
// Keys & entries
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PreferencesKey {
    SuggestedLocalization = 1,
}

impl PreferencesKey {
    fn to_key(self) -> Vec<u8> {
        KeyBuf::new().u32(self as u32).into_vec()
    }
}

/// A value that can live in the preferences store.
pub trait PreferencesEntry: Coding + Clone + PartialEq {}

impl<T: Coding + Clone + PartialEq> PreferencesEntry for T {}

/// Outcome of [`Preferences::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryUpdate {
    Unchanged,
    Updated,
    Removed,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default)]
pub struct Preferences {
    options: CodecOptions,
}

impl Preferences {
    pub fn new(options: CodecOptions) -> Self {
        Preferences { options }
    }

    pub fn get<E: PreferencesEntry>(
        &self,
        txn: &Transaction<'_>,
        key: PreferencesKey,
    ) -> Result<Option<E>> {
        match txn.get(Space::Preferences, &key.to_key())? {
            Some(raw) => E::from_bytes(&raw, self.options)
                .map(Some)
                .map_err(|source| PreferencesError::Decode { key, source }),
            None => Ok(None),
        }
    }

    /// Read-modify-write of one entry.
    ///
    /// `f` sees the current value and returns the desired one: `None`
    /// removes the entry, a value equal to the current one writes nothing.
    pub fn update<E, F>(&self, txn: &Transaction<'_>, key: PreferencesKey, f: F) -> Result<EntryUpdate>
    where
        E: PreferencesEntry,
        F: FnOnce(Option<&E>) -> Option<E>,
    {
        let current: Option<E> = self.get(txn, key)?;
        let next = f(current.as_ref());
        match (current, next) {
            (None, None) => Ok(EntryUpdate::Unchanged),
            (Some(_), None) => {
                txn.remove(Space::Preferences, &key.to_key())?;
                Ok(EntryUpdate::Removed)
            }
            (Some(current), Some(next)) if current == next => Ok(EntryUpdate::Unchanged),
            (_, Some(next)) => {
                txn.put(
                    Space::Preferences,
                    &key.to_key(),
                    &next.to_bytes(self.options),
                )?;
                Ok(EntryUpdate::Updated)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SuggestedLocalizationEntry
// ---------------------------------------------------------------------------

/// UI language the server suggested, and whether the user has seen the
/// suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestedLocalizationEntry {
    pub language_code: String,
    pub is_seen: bool,
}

impl SuggestedLocalizationEntry {
    pub fn new(language_code: impl Into<String>, is_seen: bool) -> Self {
        SuggestedLocalizationEntry {
            language_code: language_code.into(),
            is_seen,
        }
    }

    /// Whether the suggestion is still worth showing to a user currently on
    /// `current_language_code`.
    pub fn should_prompt(&self, current_language_code: &str) -> bool {
        !self.is_seen
            && self.language_code != "en"
            && self.language_code != current_language_code
    }
}

impl Coding for SuggestedLocalizationEntry {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_string(&self.language_code, "lc");
        encoder.encode_bool(self.is_seen, "s");
    }

    fn decode(decoder: &Decoder<'_>) -> crate::codec::Result<Self> {
        Ok(SuggestedLocalizationEntry {
            language_code: decoder.decode_string_for_key("lc", "en"),
            is_seen: decoder.decode_bool_for_key("s"),
        })
    }
}

/// Mark the suggestion for `language_code` as seen.
///
/// Only an unseen entry for the same language is touched; an entry for a
/// different language was set by someone else and is left alone.
pub fn mark_suggested_localization_seen(
    db: &Database,
    preferences: &Preferences,
    language_code: &str,
) -> Result<EntryUpdate> {
    db.transaction(|txn| {
        preferences.update::<SuggestedLocalizationEntry, _>(
            txn,
            PreferencesKey::SuggestedLocalization,
            |current| match current {
                Some(current) if current.language_code == language_code && !current.is_seen => {
                    Some(SuggestedLocalizationEntry::new(language_code, true))
                }
                other => other.cloned(),
            },
        )
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
