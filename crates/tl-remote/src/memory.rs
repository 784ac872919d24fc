//! In-memory [`RemoteStore`] implementation.
//!
//! Intended for tests and embedding. Behaves like a single remote ledger:
//! until it is created every query and write fails with
//! [`RemoteError::LedgerMissing`]. Every call is recorded, and failures can
//! be scripted per operation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tl_types::{ItemId, WireRecord};

use crate::error::{RemoteError, RemoteResult};
use crate::message::QueryPattern;
use crate::transport::{CreateOutcome, RemoteStore};

/// The remote operation a call or scripted failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Query,
    Transact,
    CreateLedger,
    Remove,
}

/// A recorded call with its arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteCall {
    Query(QueryPattern),
    Transact(Vec<WireRecord>),
    CreateLedger(Option<Vec<WireRecord>>),
    Remove(Vec<ItemId>),
}

impl RemoteCall {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Query(_) => Operation::Query,
            Self::Transact(_) => Operation::Transact,
            Self::CreateLedger(_) => Operation::CreateLedger,
            Self::Remove(_) => Operation::Remove,
        }
    }
}

#[derive(Default)]
struct MemoryState {
    /// `None` until the ledger is created. Newest records first.
    records: Option<Vec<WireRecord>>,
    calls: Vec<RemoteCall>,
    scripted: HashMap<Operation, VecDeque<RemoteError>>,
}

pub struct InMemoryRemote {
    ledger: String,
    state: Mutex<MemoryState>,
}

impl InMemoryRemote {
    /// A remote whose ledger has not been created yet.
    pub fn new(ledger: impl Into<String>) -> Self {
        Self {
            ledger: ledger.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// A remote whose ledger already holds `records`.
    pub fn with_records(ledger: impl Into<String>, records: Vec<WireRecord>) -> Self {
        let remote = Self::new(ledger);
        remote.state().records = Some(records);
        remote
    }

    /// Make the next call of `operation` fail with `error`.
    ///
    /// Scripted failures queue up and are consumed in order.
    pub fn fail_next(&self, operation: Operation, error: RemoteError) {
        self.state()
            .scripted
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Current ledger contents, `None` if the ledger does not exist.
    pub fn records(&self) -> Option<Vec<WireRecord>> {
        self.state().records.clone()
    }

    pub fn ledger_exists(&self) -> bool {
        self.state().records.is_some()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and return a scripted failure, if any is queued.
    fn begin(&self, call: RemoteCall) -> RemoteResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.state();
        let operation = call.operation();
        state.calls.push(call);
        if let Some(error) = state
            .scripted
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        Ok(state)
    }

    fn missing(&self) -> RemoteError {
        RemoteError::LedgerMissing {
            ledger: self.ledger.clone(),
            message: format!("No commit exists for ledger: {}", self.ledger),
        }
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    async fn query(&self, pattern: &QueryPattern) -> RemoteResult<Vec<Value>> {
        let state = self.begin(RemoteCall::Query(pattern.clone()))?;
        let records = state.records.as_ref().ok_or_else(|| self.missing())?;
        let type_tag = pattern.type_filter().ok_or_else(|| RemoteError::Application {
            status: 400,
            message: "unsupported query pattern".into(),
        })?;
        records
            .iter()
            .filter(|r| r.has_type(type_tag))
            .map(|r| serde_json::to_value(r).map_err(|e| RemoteError::Decode(e.to_string())))
            .collect()
    }

    async fn transact(&self, records: &[WireRecord]) -> RemoteResult<()> {
        let mut state = self.begin(RemoteCall::Transact(records.to_vec()))?;
        let missing = self.missing();
        let stored = state.records.as_mut().ok_or(missing)?;
        upsert(stored, records);
        Ok(())
    }

    async fn create_ledger(&self, seed: Option<&[WireRecord]>) -> RemoteResult<CreateOutcome> {
        let mut state = self.begin(RemoteCall::CreateLedger(seed.map(<[WireRecord]>::to_vec)))?;
        if state.records.is_some() {
            return Ok(CreateOutcome::AlreadyExists);
        }
        let mut stored = Vec::new();
        upsert(&mut stored, seed.unwrap_or_default());
        state.records = Some(stored);
        Ok(CreateOutcome::Created)
    }

    async fn remove(&self, ids: &[ItemId]) -> RemoteResult<()> {
        let mut state = self.begin(RemoteCall::Remove(ids.to_vec()))?;
        let missing = self.missing();
        let stored = state.records.as_mut().ok_or(missing)?;
        let doomed: HashSet<&str> = ids.iter().map(ItemId::as_str).collect();
        stored.retain(|r| !doomed.contains(r.id.as_str()));
        Ok(())
    }
}

/// Replace existing records in place; insert new ones, in batch order, at the front.
fn upsert(stored: &mut Vec<WireRecord>, batch: &[WireRecord]) {
    let mut fresh = Vec::new();
    for record in batch {
        match stored.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => fresh.push(record.clone()),
        }
    }
    stored.splice(0..0, fresh);
}

impl std::fmt::Debug for InMemoryRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("InMemoryRemote")
            .field("ledger", &self.ledger)
            .field("records", &state.records.as_ref().map(Vec::len))
            .field("calls", &state.calls.len())
            .finish()
    }
}
