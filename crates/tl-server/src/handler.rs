use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};
use tl_remote::{CreateRequest, QueryRequest, TransactRequest};
use tracing::info;

use crate::error::ServerResult;
use crate::ledger::{LedgerRegistry, TxnSummary};

pub type AppState = Arc<LedgerRegistry>;

/// `POST /fluree/create`
pub async fn create_handler(
    State(registry): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> ServerResult<(StatusCode, Json<Value>)> {
    let summary = registry.create(&request.ledger, &request.txn)?;
    info!(ledger = %request.ledger, "ledger created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "ledger": request.ledger, "inserted": summary.inserted })),
    ))
}

/// `POST /fluree/transact`
pub async fn transact_handler(
    State(registry): State<AppState>,
    Json(request): Json<TransactRequest>,
) -> ServerResult<Json<TxnSummary>> {
    Ok(Json(registry.transact(&request.ledger, &request.txn)?))
}

/// `POST /fluree/query`
pub async fn query_handler(
    State(registry): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> ServerResult<Json<Vec<Value>>> {
    Ok(Json(registry.query(&request.ledger, &request.query)?))
}

/// `GET /health`
pub async fn health_handler(State(registry): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": "tl-server",
        "version": env!("CARGO_PKG_VERSION"),
        "ledgers": registry.len(),
    }))
}
