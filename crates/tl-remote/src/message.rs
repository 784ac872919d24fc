//! Request and response bodies of the ledger API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tl_types::{ItemId, WireRecord};

/// Marker record a ledger is created with when there is nothing to seed.
pub const SEED_MESSAGE: &str = "creating new ledger";

pub const RDF_TYPE: &str = "rdf:type";

/// Body of `POST {base}/create`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub ledger: String,
    pub txn: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_context: Option<Value>,
}

/// Body of `POST {base}/transact`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactRequest {
    pub ledger: String,
    pub txn: Value,
}

/// Body of `POST {base}/query`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub ledger: String,
    pub query: QueryPattern,
}

/// A where/select pattern query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPattern {
    #[serde(rename = "where")]
    pub where_clause: Vec<[String; 3]>,
    pub select: BTreeMap<String, Vec<String>>,
}

impl QueryPattern {
    /// Select every property of every subject carrying `type_tag`.
    pub fn all_of_type(type_tag: &str) -> Self {
        let subject = "?s".to_string();
        let mut select = BTreeMap::new();
        select.insert(subject.clone(), vec!["*".to_string()]);
        Self {
            where_clause: vec![[subject, RDF_TYPE.to_string(), type_tag.to_string()]],
            select,
        }
    }

    /// The type tag when this is a single `?s rdf:type <tag>` pattern
    /// selecting all properties of `?s`.
    pub fn type_filter(&self) -> Option<&str> {
        let [triple] = self.where_clause.as_slice() else {
            return None;
        };
        let [subject, predicate, object] = triple;
        if predicate != RDF_TYPE || !subject.starts_with('?') {
            return None;
        }
        match self.select.get(subject) {
            Some(props) if props.iter().any(|p| p == "*") => Some(object.as_str()),
            _ => None,
        }
    }
}

/// Error payload the ledger returns with non-success statuses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

/// Upsert transaction: `{"@graph": records}`.
pub fn upsert_txn(records: &[WireRecord]) -> Value {
    json!({ "@graph": records })
}

/// Delete every triple whose subject is one of `ids`.
pub fn delete_txn(ids: &[ItemId]) -> Value {
    let ids: Vec<&str> = ids.iter().map(ItemId::as_str).collect();
    json!({
        "delete": ["?s", "?p", "?o"],
        "where": [["?s", "?p", "?o"]],
        "values": ["?s", ids],
    })
}

/// Initial transaction of a `create` request.
pub fn seed_txn(seed: Option<&[WireRecord]>) -> Value {
    match seed {
        Some(records) => json!(records),
        None => json!([{ "message": SEED_MESSAGE }]),
    }
}

/// A transaction body as understood by the ledger.
#[derive(Clone, Debug, PartialEq)]
pub enum Txn {
    /// Replace-or-insert each node by its `@id`.
    Upsert(Vec<Value>),
    /// Remove every triple of the listed subjects.
    Delete(Vec<String>),
}

impl Txn {
    /// Recognize the transaction shapes produced by [`upsert_txn`],
    /// [`delete_txn`], and [`seed_txn`].
    pub fn parse(txn: &Value) -> Option<Self> {
        match txn {
            Value::Array(nodes) => Some(Self::Upsert(nodes.clone())),
            Value::Object(map) => {
                if let Some(Value::Array(nodes)) = map.get("@graph") {
                    return Some(Self::Upsert(nodes.clone()));
                }
                if map.contains_key("delete") {
                    let values = map.get("values")?.as_array()?;
                    let ids = values.get(1)?.as_array()?;
                    let ids = ids
                        .iter()
                        .filter_map(|id| match id {
                            Value::String(s) => Some(s.clone()),
                            Value::Object(o) => o.get("@id")?.as_str().map(str::to_string),
                            _ => None,
                        })
                        .collect();
                    return Some(Self::Delete(ids));
                }
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_types::{ListItem, DEFAULT_TYPE_TAG};

    fn record(id: &str) -> WireRecord {
        WireRecord::encode(
            &ListItem::with_id(ItemId::new(id).unwrap(), "x"),
            DEFAULT_TYPE_TAG,
        )
    }

    #[test]
    fn query_pattern_shape() {
        let q = QueryPattern::all_of_type("schema:ListItem");
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            json!({
                "where": [["?s", "rdf:type", "schema:ListItem"]],
                "select": {"?s": ["*"]}
            })
        );
        assert_eq!(q.type_filter(), Some("schema:ListItem"));
    }

    #[test]
    fn type_filter_rejects_other_patterns() {
        let mut q = QueryPattern::all_of_type("T");
        q.where_clause.push(["?s".into(), "content".into(), "?c".into()]);
        assert_eq!(q.type_filter(), None);

        let mut q = QueryPattern::all_of_type("T");
        q.select.insert("?s".into(), vec!["content".into()]);
        assert_eq!(q.type_filter(), None);
    }

    #[test]
    fn delete_txn_shape() {
        let ids = vec![ItemId::new("a").unwrap(), ItemId::new("b").unwrap()];
        assert_eq!(
            delete_txn(&ids),
            json!({
                "delete": ["?s", "?p", "?o"],
                "where": [["?s", "?p", "?o"]],
                "values": ["?s", ["a", "b"]]
            })
        );
    }

    #[test]
    fn seed_without_records_is_marker() {
        assert_eq!(seed_txn(None), json!([{"message": "creating new ledger"}]));
        let seeded = seed_txn(Some(&[record("a")]));
        assert_eq!(seeded.as_array().unwrap().len(), 1);
    }

    #[test]
    fn create_request_uses_camel_case() {
        let req = CreateRequest {
            ledger: "l".into(),
            txn: seed_txn(None),
            default_context: Some(json!({"schema": "http://schema.org/"})),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("defaultContext").is_some());
    }

    #[test]
    fn txn_parse_recognizes_built_shapes() {
        let upsert = Txn::parse(&upsert_txn(&[record("a"), record("b")])).unwrap();
        assert!(matches!(upsert, Txn::Upsert(ref nodes) if nodes.len() == 2));

        let delete = Txn::parse(&delete_txn(&[ItemId::new("a").unwrap()])).unwrap();
        assert_eq!(delete, Txn::Delete(vec!["a".into()]));

        assert!(matches!(Txn::parse(&seed_txn(None)), Some(Txn::Upsert(_))));
        assert_eq!(Txn::parse(&json!({"insert": {}})), None);
        assert_eq!(Txn::parse(&json!("nope")), None);
    }
}
