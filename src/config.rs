/// Runtime configuration for the operation log and its synchronizer.
///
/// Every field has a default, so an empty JSON object is a valid config.
/// Unknown fields are rejected.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::codec::{CodecOptions, OptionalIdEncoding};
use crate::limits;
use crate::oplog::{LogTag, MergeDomain, OperationLog, TagRegistry};
use crate::storage::{Database, StoreError};
use crate::sync::{RemoteApplier, RetryPolicy, Synchronizer};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// One tag's merge-domain assignment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DomainAssignment {
    pub tag: LogTag,
    pub domain: MergeDomain,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OplogConfig {
    /// SQLite file; `None` keeps the store in memory.
    pub database_path: Option<PathBuf>,
    pub optional_ids: OptionalIdEncoding,
    /// Enabled tags and their domains. Empty means every tag in its own
    /// domain.
    pub merge_domains: Vec<DomainAssignment>,
    pub retry: RetryPolicy,
    pub applied_cache_capacity: usize,
    pub worker_interval_ms: u64,
}

impl Default for OplogConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            optional_ids: OptionalIdEncoding::default(),
            merge_domains: Vec::new(),
            retry: RetryPolicy::default(),
            applied_cache_capacity: limits::DEFAULT_APPLIED_CACHE_CAPACITY,
            worker_interval_ms: limits::DEFAULT_WORKER_INTERVAL_MS,
        }
    }
}

impl OplogConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: OplogConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = Vec::new();
        for assignment in &self.merge_domains {
            if seen.contains(&assignment.tag) {
                return Err(ConfigError::Invalid(format!(
                    "tag {} assigned more than once",
                    assignment.tag.as_str()
                )));
            }
            seen.push(assignment.tag);
        }
        if self.retry.backoff_initial_ms > self.retry.backoff_max_ms {
            return Err(ConfigError::Invalid(
                "retry.backoff_initial_ms exceeds retry.backoff_max_ms".to_string(),
            ));
        }
        if self.applied_cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "applied_cache_capacity must be positive".to_string(),
            ));
        }
        if self.worker_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "worker_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn registry(&self) -> TagRegistry {
        if self.merge_domains.is_empty() {
            return TagRegistry::default();
        }
        self.merge_domains
            .iter()
            .fold(TagRegistry::empty(), |registry, a| registry.with(a.tag, a.domain))
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions::new(self.optional_ids)
    }

    pub fn worker_interval(&self) -> Duration {
        Duration::from_millis(self.worker_interval_ms)
    }

    pub fn open_database(&self) -> Result<Database> {
        let db = match &self.database_path {
            Some(path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };
        Ok(db)
    }

    pub fn operation_log(&self) -> OperationLog {
        OperationLog::new(self.registry(), self.codec_options())
    }

    pub fn synchronizer<R: RemoteApplier>(&self, db: Arc<Database>, remote: R) -> Synchronizer<R> {
        Synchronizer::with_policy(
            db,
            self.operation_log(),
            remote,
            self.retry.clone(),
            self.applied_cache_capacity,
        )
    }
}
