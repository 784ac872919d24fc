//! Remote ledger access for todo-ledger.
//!
//! A thin, stateless boundary around the four ledger operations the list
//! synchronizer relies on: query, transact, create, and delete. Transport
//! failures are normalized into [`RemoteError`], and the one condition callers
//! must special-case ("the ledger has no commits yet") is classified here as
//! [`FailureKind::LedgerMissing`].

pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod memory;
pub mod message;
pub mod transport;

pub use config::RemoteConfig;
pub use endpoint::{endpoints, BASE_PATH, DEFAULT_PORT};
pub use error::{FailureKind, RemoteError, RemoteResult};
pub use http::HttpLedgerClient;
pub use memory::{InMemoryRemote, Operation, RemoteCall};
pub use message::{
    CreateRequest, ErrorBody, QueryPattern, QueryRequest, TransactRequest, Txn, SEED_MESSAGE,
};
pub use transport::{CreateOutcome, RemoteStore};
