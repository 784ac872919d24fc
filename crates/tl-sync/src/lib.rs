//! # tl-sync
//!
//! A list store that commits writes locally and immediately, then brings a
//! remote ledger in line on background tasks.
//!
//! - [`SyncedListStore`]: the store itself (load on open, optimistic `set`)
//! - [`SyncPlan`]: which remote operations a write turns into
//! - [`diff_lists`] / [`removed_items`]: identity-based list comparison
//! - [`SyncConfig`] / [`DispatchPolicy`]: tuning
//!
//! The store never reports remote failures to the writer. They are logged
//! through `tracing` and returned from [`SyncedListStore::flush`].

pub mod config;
pub mod diff;
mod dispatch;
pub mod error;
pub mod plan;
pub mod store;
pub mod types;

pub use config::{DispatchPolicy, SyncConfig};
pub use diff::{diff_lists, removed_items, ListChange, ListDiff};
pub use error::{SyncError, SyncResult};
pub use plan::SyncPlan;
pub use store::SyncedListStore;
pub use types::{ListUpdate, LoadOutcome, StorePhase, StoreSnapshot, SyncReport};
