use tl_types::{ItemId, ItemList, ListItem};
use tracing::trace;

use crate::config::DispatchPolicy;
use crate::diff::{diff_lists, removed_items};

/// Remote operations one write will issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncPlan {
    /// Subjects to delete; issued first.
    pub remove: Vec<ItemId>,
    /// Items to upsert.
    pub upsert: Vec<ListItem>,
    /// The full list being committed; seeds the ledger if it turns out to be missing.
    pub snapshot: ItemList,
}

impl SyncPlan {
    pub fn compute(current: &ItemList, next: &ItemList, policy: DispatchPolicy) -> Self {
        let (remove, upsert) = match policy {
            DispatchPolicy::Exclusive => {
                let removed: Vec<ItemId> = removed_items(current, next)
                    .into_iter()
                    .map(|item| item.id.clone())
                    .collect();
                if removed.is_empty() {
                    (removed, next.as_slice().to_vec())
                } else {
                    (removed, Vec::new())
                }
            }
            DispatchPolicy::Reconcile => {
                let diff = diff_lists(current, next);
                trace!(
                    removals = diff.removals(),
                    additions = diff.additions(),
                    modifications = diff.modifications(),
                    "list diff"
                );
                // The whole list goes out so records lost to an earlier failed
                // round are written again.
                let upsert = if diff.additions() + diff.modifications() > 0 {
                    next.as_slice().to_vec()
                } else {
                    Vec::new()
                };
                (diff.removed_ids(), upsert)
            }
        };
        Self {
            remove,
            upsert,
            snapshot: next.clone(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.remove.is_empty() && self.upsert.is_empty()
    }
}
