use std::fmt;

use tl_remote::RemoteError;
use tl_types::ItemList;

/// Coarse lifecycle of a store. There is no error phase: remote failures
/// never leave `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorePhase {
    Uninitialized,
    Loading,
    Ready,
}

/// What subscribers observe on every commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub phase: StorePhase,
    pub list: ItemList,
}

/// A write: either a full replacement list or a function of the current list.
pub enum ListUpdate {
    Replace(ItemList),
    Apply(Box<dyn FnOnce(&ItemList) -> ItemList + Send>),
}

impl ListUpdate {
    pub fn apply<F>(f: F) -> Self
    where
        F: FnOnce(&ItemList) -> ItemList + Send + 'static,
    {
        Self::Apply(Box::new(f))
    }

    pub fn resolve(self, current: &ItemList) -> ItemList {
        match self {
            Self::Replace(next) => next,
            Self::Apply(f) => f(current),
        }
    }
}

impl From<ItemList> for ListUpdate {
    fn from(list: ItemList) -> Self {
        Self::Replace(list)
    }
}

impl fmt::Debug for ListUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(list) => f.debug_tuple("Replace").field(list).finish(),
            Self::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}

/// How the activation load went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Not loaded yet.
    Pending,
    /// Loaded from the ledger; `skipped` counts undecodable or duplicate records.
    Remote { loaded: usize, skipped: usize },
    /// The query failed and the initial list was kept.
    Fallback { reason: String, bootstrapped: bool },
}

/// Result of one background sync round.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub removed: usize,
    pub upserted: usize,
    /// The ledger was missing and has been created.
    pub bootstrapped: bool,
    /// Records the ledger was created with.
    pub seeded: usize,
    pub failures: Vec<RemoteError>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
