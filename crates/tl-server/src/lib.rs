//! Development ledger server for todo-ledger.
//!
//! Serves the create/transact/query JSON API under `/fluree` from memory,
//! enough for local runs of the `tl` CLI and for end-to-end tests of the
//! HTTP client. Nothing is persisted.

pub mod config;
pub mod error;
pub mod handler;
pub mod ledger;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use ledger::{LedgerRegistry, TxnSummary};
pub use router::build_router;
pub use server::DevLedgerServer;
