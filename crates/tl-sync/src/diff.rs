//! Identity-based diff between two list states.
//!
//! Items are matched by id only. An item present in both lists is
//! `Modified` when its persisted fields (content, completion flag) differ;
//! edit state is ignored.

use std::collections::HashMap;

use tl_types::{ItemId, ItemList, ListItem};

/// Items of `current` whose id does not occur in `next`, in `current` order.
pub fn removed_items<'a>(current: &'a ItemList, next: &ItemList) -> Vec<&'a ListItem> {
    let keep = next.ids();
    current
        .iter()
        .filter(|item| !keep.contains(&item.id))
        .collect()
}

/// The result of comparing two list states.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListDiff {
    pub changes: Vec<ListChange>,
}

/// A single change between two list states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListChange {
    Added(ListItem),
    Removed(ListItem),
    Modified { old: ListItem, new: ListItem },
}

impl ListDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn additions(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, ListChange::Added(_)))
            .count()
    }

    pub fn removals(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, ListChange::Removed(_)))
            .count()
    }

    pub fn modifications(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, ListChange::Modified { .. }))
            .count()
    }

    /// Ids of removed items.
    pub fn removed_ids(&self) -> Vec<ItemId> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                ListChange::Removed(item) => Some(item.id.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Compute the diff from `current` to `next`.
///
/// Removals come first in `current` order, followed by additions and
/// modifications in `next` order.
pub fn diff_lists(current: &ItemList, next: &ItemList) -> ListDiff {
    let mut changes: Vec<ListChange> = removed_items(current, next)
        .into_iter()
        .cloned()
        .map(ListChange::Removed)
        .collect();

    let before: HashMap<&ItemId, &ListItem> =
        current.iter().map(|item| (&item.id, item)).collect();
    for item in next {
        match before.get(&item.id) {
            None => changes.push(ListChange::Added(item.clone())),
            Some(old) if old.differs_remotely(item) => changes.push(ListChange::Modified {
                old: (*old).clone(),
                new: item.clone(),
            }),
            Some(_) => {}
        }
    }

    ListDiff { changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn item(id: &str, content: &str, checked: bool) -> ListItem {
        ListItem::with_id(ItemId::new(id).unwrap(), content).checked(checked)
    }

    fn list(items: Vec<ListItem>) -> ItemList {
        ItemList::from_items(items).unwrap()
    }

    fn ids(items: &[&ListItem]) -> Vec<String> {
        items.iter().map(|i| i.id.to_string()).collect()
    }

    #[test]
    fn disjoint_lists_remove_everything() {
        let a = list(vec![item("a", "x", false), item("b", "y", false)]);
        let b = list(vec![item("c", "z", false)]);
        assert_eq!(ids(&removed_items(&a, &b)), vec!["a", "b"]);
    }

    #[test]
    fn overlapping_lists_remove_difference() {
        let a = list(vec![item("a", "x", false), item("b", "y", false)]);
        let b = list(vec![item("b", "changed", true), item("c", "z", false)]);
        assert_eq!(ids(&removed_items(&a, &b)), vec!["a"]);
    }

    #[test]
    fn identical_ids_remove_nothing() {
        let a = list(vec![item("a", "x", false)]);
        let b = list(vec![item("a", "other content", true)]);
        assert!(removed_items(&a, &b).is_empty());
    }

    #[test]
    fn mixed_changes() {
        let old = list(vec![
            item("keep", "same", false),
            item("modify", "old", false),
            item("remove", "gone", false),
        ]);
        let new = list(vec![
            item("added", "fresh", false),
            item("keep", "same", false),
            item("modify", "old", true),
        ]);
        let diff = diff_lists(&old, &new);
        assert_eq!(diff.changes.len(), 3);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.removals(), 1);
        assert_eq!(diff.modifications(), 1);
        assert_eq!(diff.removed_ids(), vec![ItemId::new("remove").unwrap()]);

        let changed: Vec<_> = diff
            .changes
            .iter()
            .filter_map(|c| match c {
                ListChange::Added(i) | ListChange::Modified { new: i, .. } => Some(i.id.to_string()),
                ListChange::Removed(_) => None,
            })
            .collect();
        assert_eq!(changed, vec!["added", "modify"]);
    }

    #[test]
    fn edit_mode_change_is_not_a_modification() {
        let old = list(vec![item("a", "x", false)]);
        let new = old.editing(&ItemId::new("a").unwrap());
        assert!(diff_lists(&old, &new).is_empty());
    }

    fn arb_list() -> impl Strategy<Value = ItemList> {
        prop::collection::btree_set("[a-f]", 0..6).prop_map(|ids| {
            let items = ids.into_iter().map(|id| item(&id, "c", false)).collect();
            ItemList::from_items(items).unwrap()
        })
    }

    proptest! {
        #[test]
        fn removed_is_identity_set_difference(a in arb_list(), b in arb_list()) {
            let b_ids: BTreeSet<String> = b.iter().map(|i| i.id.to_string()).collect();
            let expected: Vec<String> = a
                .iter()
                .filter(|i| !b_ids.contains(i.id.as_str()))
                .map(|i| i.id.to_string())
                .collect();
            prop_assert_eq!(ids(&removed_items(&a, &b)), expected);
        }

        #[test]
        fn diff_against_self_is_empty(a in arb_list()) {
            prop_assert!(diff_lists(&a, &a).is_empty());
        }
    }
}
