/// Operation log guardrails.
///
/// These constants bound entry size, per-drain work, and in-memory
/// bookkeeping so a single misbehaving scope cannot starve the others.

/// Max encoded payload size per log entry.
pub const MAX_ENTRY_CONTENTS_BYTES: usize = 1024 * 1024; // 1 MB

/// Max codec key length (the length prefix is one byte).
pub const MAX_CODEC_KEY_LEN: usize = u8::MAX as usize;

/// Entries fetched per page while iterating a scope.
pub const ITERATE_PAGE_SIZE: usize = 128;

/// Max entries applied by one `drain_scope` call before yielding.
pub const MAX_ENTRIES_PER_DRAIN: usize = 64;

/// Default capacity of the recently-applied entry cache.
pub const DEFAULT_APPLIED_CACHE_CAPACITY: usize = 1_024;

/// Default first retry delay after a remote failure.
pub const DEFAULT_BACKOFF_INITIAL_MS: u64 = 500;

/// Default retry delay ceiling.
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 5 * 60 * 1000; // 5 min

/// Default pause between background drain passes.
pub const DEFAULT_WORKER_INTERVAL_MS: u64 = 5_000;

/// Size check for an encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentsStatus {
    Ok,
    TooLarge,
}

pub fn check_contents_size(len: usize) -> ContentsStatus {
    if len > MAX_ENTRY_CONTENTS_BYTES {
        ContentsStatus::TooLarge
    } else {
        ContentsStatus::Ok
    }
}
