use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identity key of a list item.
///
/// Assigned once by whoever creates the item and never changed afterwards.
/// It is the only field used to match local items against ledger records.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing identifier. Empty identifiers are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Generate a fresh time-ordered identifier (UUID v7).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl TryFrom<String> for ItemId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry of the list.
///
/// `edit_mode` is presentation state for the current session only. It is
/// never encoded for the ledger and is always `false` for loaded items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: ItemId,
    pub content: String,
    pub checked: bool,
    #[serde(default)]
    pub edit_mode: bool,
}

impl ListItem {
    /// Create a new unchecked item with a generated id.
    ///
    /// Content is trimmed; blank content is rejected.
    pub fn new(content: &str) -> Result<Self, TypeError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(TypeError::EmptyContent);
        }
        Ok(Self::with_id(ItemId::generate(), content))
    }

    /// Create an unchecked item with a caller-chosen id.
    pub fn with_id(id: ItemId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            checked: false,
            edit_mode: false,
        }
    }

    /// Builder-style completion flag.
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// True when `other` differs in a field that is persisted to the ledger.
    pub fn differs_remotely(&self, other: &ListItem) -> bool {
        self.content != other.content || self.checked != other.checked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_rejected() {
        assert_eq!(ItemId::new(""), Err(TypeError::EmptyId));
        assert!(ItemId::new("a").is_ok());
    }

    #[test]
    fn generated_ids_are_unique_and_non_empty() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn short_id_truncates() {
        let id = ItemId::new("0123456789abcdef").unwrap();
        assert_eq!(id.short_id(), "01234567");
        let short = ItemId::new("abc").unwrap();
        assert_eq!(short.short_id(), "abc");
    }

    #[test]
    fn new_item_defaults() {
        let item = ListItem::new("  buy milk ").unwrap();
        assert_eq!(item.content, "buy milk");
        assert!(!item.checked);
        assert!(!item.edit_mode);
    }

    #[test]
    fn blank_content_rejected() {
        assert_eq!(ListItem::new("   "), Err(TypeError::EmptyContent));
    }

    #[test]
    fn edit_mode_is_not_a_remote_difference() {
        let a = ListItem::with_id(ItemId::new("a").unwrap(), "x");
        let mut b = a.clone();
        b.edit_mode = true;
        assert!(!a.differs_remotely(&b));
        b.checked = true;
        assert!(a.differs_remotely(&b));
    }

    #[test]
    fn id_deserialization_rejects_empty() {
        let err = serde_json::from_str::<ItemId>("\"\"");
        assert!(err.is_err());
        let ok: ItemId = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(ok.as_str(), "x");
    }
}
