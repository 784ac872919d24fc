use async_trait::async_trait;
use serde_json::Value;
use tl_types::{ItemId, WireRecord};

use crate::error::RemoteResult;
use crate::message::QueryPattern;

/// What a `create_ledger` call found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The ledger was created with the given seed.
    Created,
    /// The ledger was already there; the seed was not applied.
    AlreadyExists,
}

/// The four operations the list synchronizer needs from a remote ledger.
///
/// Implementations do not retry; every failure is returned to the caller,
/// which decides the recovery policy.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Run a read-only pattern query and return the matched records.
    async fn query(&self, pattern: &QueryPattern) -> RemoteResult<Vec<Value>>;

    /// Upsert records keyed by `@id`. The batch applies as a whole or fails.
    async fn transact(&self, records: &[WireRecord]) -> RemoteResult<()>;

    /// Create the ledger, optionally seeded.
    ///
    /// Creating an existing ledger succeeds with [`CreateOutcome::AlreadyExists`]
    /// and leaves its contents untouched.
    async fn create_ledger(&self, seed: Option<&[WireRecord]>) -> RemoteResult<CreateOutcome>;

    /// Delete every record whose subject is one of `ids`.
    async fn remove(&self, ids: &[ItemId]) -> RemoteResult<()>;
}
