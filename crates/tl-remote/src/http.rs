use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tl_types::{ItemId, WireRecord};
use tracing::debug;

use crate::config::RemoteConfig;
use crate::endpoint::endpoints;
use crate::error::{RemoteError, RemoteResult};
use crate::message::{
    delete_txn, seed_txn, upsert_txn, CreateRequest, ErrorBody, QueryPattern, QueryRequest,
    TransactRequest,
};
use crate::transport::{CreateOutcome, RemoteStore};

/// [`RemoteStore`] speaking the ledger's JSON-over-HTTP API.
#[derive(Clone, Debug)]
pub struct HttpLedgerClient {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl HttpLedgerClient {
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Use a preconfigured `reqwest` client (proxies, TLS roots, ...).
    pub fn with_client(http: reqwest::Client, config: RemoteConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RemoteResult<reqwest::Response> {
        let url = self.config.endpoint_url(path);
        debug!(%url, ledger = %self.config.ledger, "ledger request");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Err(RemoteError::from_response(
            &self.config.ledger,
            status.as_u16(),
            error_message(status, &text),
        ))
    }
}

#[async_trait]
impl RemoteStore for HttpLedgerClient {
    async fn query(&self, pattern: &QueryPattern) -> RemoteResult<Vec<Value>> {
        let request = QueryRequest {
            ledger: self.config.ledger.clone(),
            query: pattern.clone(),
        };
        let body: Value = self
            .post(endpoints::QUERY, &request)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        records_from_body(body)
    }

    async fn transact(&self, records: &[WireRecord]) -> RemoteResult<()> {
        let request = TransactRequest {
            ledger: self.config.ledger.clone(),
            txn: upsert_txn(records),
        };
        self.post(endpoints::TRANSACT, &request).await?;
        debug!(count = records.len(), "records upserted");
        Ok(())
    }

    async fn create_ledger(&self, seed: Option<&[WireRecord]>) -> RemoteResult<CreateOutcome> {
        let request = CreateRequest {
            ledger: self.config.ledger.clone(),
            txn: seed_txn(seed),
            default_context: serde_json::to_value(&self.config.default_context).ok(),
        };
        match self.post(endpoints::CREATE, &request).await {
            Ok(_) => {
                debug!(ledger = %self.config.ledger, "ledger created");
                Ok(CreateOutcome::Created)
            }
            Err(RemoteError::Application { status, .. }) if status == StatusCode::CONFLICT.as_u16() => {
                debug!(ledger = %self.config.ledger, "ledger already exists");
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    async fn remove(&self, ids: &[ItemId]) -> RemoteResult<()> {
        let request = TransactRequest {
            ledger: self.config.ledger.clone(),
            txn: delete_txn(ids),
        };
        self.post(endpoints::TRANSACT, &request).await?;
        debug!(count = ids.len(), "records deleted");
        Ok(())
    }
}

/// Human-readable message of an error response body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    body.to_string()
}

/// Query responses are either a bare array or wrapped as `{"data": [...]}`.
fn records_from_body(body: Value) -> RemoteResult<Vec<Value>> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(RemoteError::Decode(
                "query response has no record array".into(),
            )),
        },
        other => Err(RemoteError::Decode(format!(
            "unexpected query response: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_prefers_json_message() {
        let body = r#"{"error":"db/not-found","message":"No commit exists for ledger: x"}"#;
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, body),
            "No commit exists for ledger: x"
        );
    }

    #[test]
    fn error_message_falls_back_to_text_and_reason() {
        assert_eq!(error_message(StatusCode::BAD_REQUEST, "boom"), "boom");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[test]
    fn records_from_array_or_data() {
        let bare = records_from_body(json!([{"@id": "a"}])).unwrap();
        assert_eq!(bare.len(), 1);
        let wrapped = records_from_body(json!({"data": [{"@id": "a"}, {"@id": "b"}]})).unwrap();
        assert_eq!(wrapped.len(), 2);
    }

    #[test]
    fn records_from_other_shapes_fail() {
        assert!(matches!(
            records_from_body(json!({"status": 200})),
            Err(RemoteError::Decode(_))
        ));
        assert!(matches!(records_from_body(json!(42)), Err(RemoteError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_ledger_is_transport_failure() {
        let client = HttpLedgerClient::new(RemoteConfig::new("http://127.0.0.1:1/fluree", "l"));
        let err = client
            .query(&QueryPattern::all_of_type("T"))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
        assert!(!err.is_ledger_missing());
    }
}
