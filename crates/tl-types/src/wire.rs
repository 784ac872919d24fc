//! Ledger wire encoding of list items.
//!
//! The ledger stores every literal as a string in this integration, so the
//! completion flag travels as `"true"` / `"false"`. Edit state has no wire
//! field at all; any `editMode` property found on a ledger record is ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::TypeError;
use crate::item::{ItemId, ListItem};

/// Type marker attached to list item records when none is configured.
pub const DEFAULT_TYPE_TAG: &str = "schema:ListItem";

/// JSON-LD record as sent to and received from the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type", default, deserialize_with = "one_or_many")]
    pub types: Vec<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default = "false_flag", deserialize_with = "flag_text")]
    pub checked: String,
}

impl WireRecord {
    /// Encode an item for the ledger under the given type marker.
    pub fn encode(item: &ListItem, type_tag: &str) -> Self {
        Self {
            id: item.id.to_string(),
            types: vec![type_tag.to_string()],
            content: item.content.clone(),
            checked: encode_flag(item.checked),
        }
    }

    /// Encode a whole slice of items.
    pub fn encode_all<'a>(
        items: impl IntoIterator<Item = &'a ListItem>,
        type_tag: &str,
    ) -> Vec<Self> {
        items
            .into_iter()
            .map(|item| Self::encode(item, type_tag))
            .collect()
    }

    /// Parse a record out of an arbitrary JSON value returned by a query.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        serde_json::from_value(value).map_err(|e| TypeError::MalformedRecord(e.to_string()))
    }

    /// Decode into a list item. Loaded items never start in edit mode.
    pub fn decode(self) -> Result<ListItem, TypeError> {
        let id = ItemId::new(self.id)?;
        Ok(ListItem {
            id,
            content: self.content,
            checked: decode_flag(&self.checked),
            edit_mode: false,
        })
    }

    pub fn has_type(&self, type_tag: &str) -> bool {
        self.types.iter().any(|t| t == type_tag)
    }
}

pub fn encode_flag(flag: bool) -> String {
    flag.to_string()
}

/// Only the exact literal `"true"` decodes to `true`.
pub fn decode_flag(text: &str) -> bool {
    text == "true"
}

fn false_flag() -> String {
    encode_flag(false)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(t) => vec![t],
        OneOrMany::Many(ts) => ts,
    })
}

// Records written by older clients may carry real JSON booleans.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Text(String),
    Bool(bool),
}

fn flag_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Text(s) => s,
        FlagRepr::Bool(b) => encode_flag(b),
    })
}
