//! The list aggregate and its pure update operations.
//!
//! Every operation returns a new [`ItemList`] and leaves the receiver
//! untouched, so each one can be handed to a store as an updater function.
//! Operations addressing an id that is not in the list are no-ops.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::item::{ItemId, ListItem};

/// Ordered sequence of items, newest first, with unique ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemList {
    items: Vec<ListItem>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from items, rejecting duplicate ids.
    pub fn from_items(items: Vec<ListItem>) -> Result<Self, TypeError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(TypeError::DuplicateId(item.id.to_string()));
            }
        }
        Ok(Self { items })
    }

    /// Build a list keeping the first occurrence of each id.
    ///
    /// Returns the list and the number of dropped duplicates.
    pub fn collect_unique(items: impl IntoIterator<Item = ListItem>) -> (Self, usize) {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut dropped = 0;
        for item in items {
            if seen.insert(item.id.clone()) {
                kept.push(item);
            } else {
                dropped += 1;
            }
        }
        (Self { items: kept }, dropped)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ListItem] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<ListItem> {
        self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> HashSet<&ItemId> {
        self.items.iter().map(|item| &item.id).collect()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| !item.checked).count()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.checked).count()
    }

    /// Items visible under the given filter, in list order.
    pub fn filtered(&self, filter: StatusFilter) -> Vec<&ListItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    /// Insert `item` at the front.
    pub fn prepended(&self, item: ListItem) -> Result<Self, TypeError> {
        if self.contains(&item.id) {
            return Err(TypeError::DuplicateId(item.id.to_string()));
        }
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(item);
        items.extend(self.items.iter().cloned());
        Ok(Self { items })
    }

    pub fn toggled(&self, id: &ItemId) -> Self {
        self.map_item(id, |item| item.checked = !item.checked)
    }

    /// Put one item into edit mode and take every other item out of it.
    pub fn editing(&self, id: &ItemId) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| ListItem {
                edit_mode: &item.id == id,
                ..item.clone()
            })
            .collect();
        Self { items }
    }

    /// Replace an item's content and leave edit mode.
    pub fn with_content(&self, id: &ItemId, content: &str) -> Self {
        self.map_item(id, |item| {
            item.content = content.to_string();
            item.edit_mode = false;
        })
    }

    pub fn without(&self, id: &ItemId) -> Self {
        let items = self
            .items
            .iter()
            .filter(|item| &item.id != id)
            .cloned()
            .collect();
        Self { items }
    }

    /// Uncheck everything if all items are checked, otherwise check everything.
    pub fn all_toggled(&self) -> Self {
        if self.items.is_empty() {
            return self.clone();
        }
        let all_checked = self.items.iter().all(|item| item.checked);
        let items = self
            .items
            .iter()
            .map(|item| ListItem {
                checked: !all_checked,
                ..item.clone()
            })
            .collect();
        Self { items }
    }

    pub fn without_completed(&self) -> Self {
        let items = self
            .items
            .iter()
            .filter(|item| !item.checked)
            .cloned()
            .collect();
        Self { items }
    }

    fn map_item(&self, id: &ItemId, f: impl FnOnce(&mut ListItem)) -> Self {
        let mut items = self.items.clone();
        if let Some(item) = items.iter_mut().find(|item| &item.id == id) {
            f(item);
        }
        Self { items }
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a ListItem;
    type IntoIter = std::slice::Iter<'a, ListItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'de> Deserialize<'de> for ItemList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<ListItem>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}

/// View selector over a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, item: &ListItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.checked,
            Self::Completed => item.checked,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, content: &str, checked: bool) -> ListItem {
        ListItem::with_id(ItemId::new(id).unwrap(), content).checked(checked)
    }

    fn id(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    fn sample() -> ItemList {
        ItemList::from_items(vec![
            item("c", "third", false),
            item("b", "second", true),
            item("a", "first", false),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = ItemList::from_items(vec![item("a", "x", false), item("a", "y", false)]);
        assert_eq!(err, Err(TypeError::DuplicateId("a".into())));
    }

    #[test]
    fn collect_unique_keeps_first() {
        let (list, dropped) =
            ItemList::collect_unique(vec![item("a", "x", false), item("a", "y", true)]);
        assert_eq!(dropped, 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].content, "x");
    }

    #[test]
    fn prepend_puts_newest_first() {
        let list = sample().prepended(item("d", "fourth", false)).unwrap();
        assert_eq!(list.as_slice()[0].id, id("d"));
        assert_eq!(list.len(), 4);
        assert!(sample().prepended(item("a", "dup", false)).is_err());
    }

    #[test]
    fn toggle_flips_one_item() {
        let list = sample().toggled(&id("a"));
        assert!(list.get(&id("a")).unwrap().checked);
        assert!(list.get(&id("b")).unwrap().checked);
        assert!(!list.get(&id("c")).unwrap().checked);
    }

    #[test]
    fn unknown_id_is_noop() {
        let list = sample();
        assert_eq!(list.toggled(&id("zzz")), list);
        assert_eq!(list.without(&id("zzz")), list);
        assert_eq!(list.with_content(&id("zzz"), "q"), list);
    }

    #[test]
    fn editing_is_exclusive() {
        let list = sample().editing(&id("a")).editing(&id("b"));
        let editing: Vec<_> = list.iter().filter(|i| i.edit_mode).collect();
        assert_eq!(editing.len(), 1);
        assert_eq!(editing[0].id, id("b"));
    }

    #[test]
    fn with_content_leaves_edit_mode() {
        let list = sample().editing(&id("c")).with_content(&id("c"), "renamed");
        let c = list.get(&id("c")).unwrap();
        assert_eq!(c.content, "renamed");
        assert!(!c.edit_mode);
    }

    #[test]
    fn toggle_all_checks_then_unchecks() {
        let checked = sample().all_toggled();
        assert_eq!(checked.completed_count(), 3);
        let unchecked = checked.all_toggled();
        assert_eq!(unchecked.active_count(), 3);
        assert!(ItemList::new().all_toggled().is_empty());
    }

    #[test]
    fn clear_completed_drops_checked() {
        let list = sample().without_completed();
        assert_eq!(list.len(), 2);
        assert!(!list.contains(&id("b")));
    }

    #[test]
    fn filters_select_by_status() {
        let list = sample();
        assert_eq!(list.filtered(StatusFilter::All).len(), 3);
        assert_eq!(list.filtered(StatusFilter::Active).len(), 2);
        let done = list.filtered(StatusFilter::Completed);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, id("b"));
    }

    #[test]
    fn filter_parses() {
        assert_eq!("Active".parse::<StatusFilter>().unwrap(), StatusFilter::Active);
        assert_eq!("done".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
        assert!("bogus".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn deserialize_rejects_duplicates() {
        let json = r#"[{"id":"a","content":"x","checked":false},{"id":"a","content":"y","checked":true}]"#;
        assert!(serde_json::from_str::<ItemList>(json).is_err());
    }
}
