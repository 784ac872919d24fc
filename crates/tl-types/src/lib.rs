//! Foundation types for todo-ledger.
//!
//! This crate provides the in-memory list model and its ledger wire encoding.
//! Every other todo-ledger crate depends on `tl-types`.
//!
//! # Key Types
//!
//! - [`ItemId`]: Identity key of a list item (non-empty, immutable)
//! - [`ListItem`]: One entry with content, completion flag and local edit state
//! - [`ItemList`]: Ordered, id-unique aggregate (newest first)
//! - [`StatusFilter`]: All / Active / Completed view selector
//! - [`WireRecord`]: JSON-LD shape exchanged with the remote ledger

pub mod error;
pub mod item;
pub mod list;
pub mod wire;

pub use error::TypeError;
pub use item::{ItemId, ListItem};
pub use list::{ItemList, StatusFilter};
pub use wire::{decode_flag, encode_flag, WireRecord, DEFAULT_TYPE_TAG};
