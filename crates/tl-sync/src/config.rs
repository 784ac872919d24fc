use serde::{Deserialize, Serialize};
use tl_types::DEFAULT_TYPE_TAG;

use crate::error::{SyncError, SyncResult};

/// Rule deciding which remote operations a single write issues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchPolicy {
    /// Delete removed items if there are any, otherwise upsert the whole
    /// next list. A write that both adds and removes only deletes remotely.
    Exclusive,
    /// Delete removed items. If anything was added or changed, upsert the
    /// whole next list.
    #[default]
    Reconcile,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Type marker written on every record and used to select list items.
    pub type_tag: String,
    pub policy: DispatchPolicy,
    /// Create the ledger when the initial load finds it missing.
    pub bootstrap_on_load: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            type_tag: DEFAULT_TYPE_TAG.into(),
            policy: DispatchPolicy::default(),
            bootstrap_on_load: true,
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> SyncResult<()> {
        if self.type_tag.trim().is_empty() {
            return Err(SyncError::InvalidConfig("type_tag must not be empty".into()));
        }
        Ok(())
    }
}
