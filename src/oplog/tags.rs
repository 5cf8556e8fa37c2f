/// Log tags and merge domains.
///
/// A tag names the logical channel an entry belongs to. Tags are grouped
/// into merge domains; entries in one domain share a single merged sequence
/// so they can be replayed in one global order across peers and tags.
/// The grouping is explicit configuration handed to the log at
/// construction, not a process-wide table.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LogTag {
    /// Message removal, chat removal, and history clearing.
    CloudChatRemoveMessages = 0,
    /// Draft / reply-to state mirrored to the server.
    SynchronizeChatInputStates = 1,
}

impl LogTag {
    pub const ALL: [LogTag; 2] = [
        LogTag::CloudChatRemoveMessages,
        LogTag::SynchronizeChatInputStates,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::CloudChatRemoveMessages),
            1 => Some(Self::SynchronizeChatInputStates),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::CloudChatRemoveMessages => "CloudChatRemoveMessages",
            LogTag::SynchronizeChatInputStates => "SynchronizeChatInputStates",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeDomain(pub u8);

/// Which tags a log accepts, and the merge domain of each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRegistry {
    domains: BTreeMap<LogTag, MergeDomain>,
}

impl Default for TagRegistry {
    /// Every tag enabled, each in its own domain.
    fn default() -> Self {
        let mut registry = TagRegistry::empty();
        for tag in LogTag::ALL {
            registry.register(tag, MergeDomain(tag as u8));
        }
        registry
    }
}

impl TagRegistry {
    pub fn empty() -> Self {
        TagRegistry {
            domains: BTreeMap::new(),
        }
    }

    /// Every tag enabled, all sharing one domain.
    pub fn single_domain(domain: MergeDomain) -> Self {
        let mut registry = TagRegistry::empty();
        for tag in LogTag::ALL {
            registry.register(tag, domain);
        }
        registry
    }

    pub fn register(&mut self, tag: LogTag, domain: MergeDomain) {
        self.domains.insert(tag, domain);
    }

    pub fn with(mut self, tag: LogTag, domain: MergeDomain) -> Self {
        self.register(tag, domain);
        self
    }

    pub fn domain_of(&self, tag: LogTag) -> Option<MergeDomain> {
        self.domains.get(&tag).copied()
    }

    pub fn domains(&self) -> BTreeSet<MergeDomain> {
        self.domains.values().copied().collect()
    }
}
