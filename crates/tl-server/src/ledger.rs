//! In-memory ledgers keyed by name.
//!
//! Each ledger is a list of JSON-LD nodes, newest first. Upserts replace a
//! node with the same `@id` in place; deletes drop every node whose subject
//! is listed. There is no history.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::{Map, Value};
use tl_remote::{QueryPattern, Txn};
use tracing::debug;

use crate::error::{ServerError, ServerResult};

/// Effect of one transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TxnSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

#[derive(Debug, Default)]
struct Ledger {
    nodes: Vec<Map<String, Value>>,
    next_blank: u64,
}

impl Ledger {
    fn apply(&mut self, txn: Txn) -> ServerResult<TxnSummary> {
        match txn {
            Txn::Upsert(nodes) => self.upsert(nodes),
            Txn::Delete(ids) => Ok(self.delete(&ids)),
        }
    }

    fn upsert(&mut self, nodes: Vec<Value>) -> ServerResult<TxnSummary> {
        let nodes = nodes
            .into_iter()
            .map(|node| match node {
                Value::Object(map) => Ok(map),
                other => Err(ServerError::BadRequest(format!(
                    "transaction node must be an object, got {other}"
                ))),
            })
            .collect::<ServerResult<Vec<_>>>()?;

        let mut summary = TxnSummary::default();
        let mut fresh = Vec::new();
        for mut node in nodes {
            let id = match node.get("@id").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    let id = self.blank_node();
                    node.insert("@id".into(), Value::String(id.clone()));
                    id
                }
            };
            match self.nodes.iter_mut().find(|n| node_id(n) == Some(id.as_str())) {
                Some(existing) => {
                    *existing = node;
                    summary.updated += 1;
                }
                None => {
                    fresh.push(node);
                    summary.inserted += 1;
                }
            }
        }
        self.nodes.splice(0..0, fresh);
        Ok(summary)
    }

    fn delete(&mut self, ids: &[String]) -> TxnSummary {
        let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.nodes.len();
        self.nodes
            .retain(|n| node_id(n).map_or(true, |id| !doomed.contains(id)));
        TxnSummary {
            deleted: before - self.nodes.len(),
            ..Default::default()
        }
    }

    fn blank_node(&mut self) -> String {
        self.next_blank += 1;
        format!("_:b{}", self.next_blank)
    }

    fn of_type(&self, type_tag: &str) -> Vec<Value> {
        self.nodes
            .iter()
            .filter(|n| has_type(n, type_tag))
            .cloned()
            .map(Value::Object)
            .collect()
    }
}

fn node_id(node: &Map<String, Value>) -> Option<&str> {
    node.get("@id").and_then(Value::as_str)
}

fn has_type(node: &Map<String, Value>, type_tag: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == type_tag,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(type_tag)),
        _ => false,
    }
}

fn parse_txn(txn: &Value) -> ServerResult<Txn> {
    Txn::parse(txn).ok_or_else(|| ServerError::BadRequest("unsupported transaction shape".into()))
}

/// Every ledger served by one dev server.
#[derive(Debug, Default)]
pub struct LedgerRegistry {
    ledgers: RwLock<HashMap<String, Ledger>>,
}

impl LedgerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `name` and apply its initial transaction.
    pub fn create(&self, name: &str, txn: &Value) -> ServerResult<TxnSummary> {
        let txn = parse_txn(txn)?;
        let mut ledgers = self.write();
        if ledgers.contains_key(name) {
            return Err(ServerError::LedgerExists(name.to_string()));
        }
        let mut ledger = Ledger::default();
        let summary = ledger.apply(txn)?;
        ledgers.insert(name.to_string(), ledger);
        debug!(ledger = name, nodes = summary.inserted, "ledger created");
        Ok(summary)
    }

    pub fn transact(&self, name: &str, txn: &Value) -> ServerResult<TxnSummary> {
        let mut ledgers = self.write();
        let ledger = ledgers
            .get_mut(name)
            .ok_or_else(|| ServerError::LedgerMissing(name.to_string()))?;
        let summary = ledger.apply(parse_txn(txn)?)?;
        debug!(
            ledger = name,
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            "transaction applied"
        );
        Ok(summary)
    }

    /// Answer a single `?s rdf:type <tag>` pattern, newest nodes first.
    pub fn query(&self, name: &str, pattern: &QueryPattern) -> ServerResult<Vec<Value>> {
        let ledgers = self.read();
        let ledger = ledgers
            .get(name)
            .ok_or_else(|| ServerError::LedgerMissing(name.to_string()))?;
        let type_tag = pattern
            .type_filter()
            .ok_or_else(|| ServerError::BadRequest("unsupported query pattern".into()))?;
        Ok(ledger.of_type(type_tag))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Ledger>> {
        self.ledgers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Ledger>> {
        self.ledgers.write().unwrap_or_else(PoisonError::into_inner)
    }
}
