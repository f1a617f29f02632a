use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use poolsafe_coordinator::{
    ExecutionResult, MultisigService, ProposeRequest, SignatureStatus,
};
use poolsafe_store::{TransactionPage, TransactionRecord};

use std::sync::Arc;

use crate::{error::ApiError, payload::{AddSignaturePayload, ListQuery}};

pub fn create_router(service: Arc<MultisigService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/transactions", post(propose_transaction).get(list_transactions))
        .route("/api/v1/transactions/{tx_hash}", get(get_transaction))
        .route("/api/v1/transactions/{tx_hash}/signatures", post(add_signature))
        .route("/api/v1/transactions/{tx_hash}/execute", post(execute_transaction))
        .with_state(service)
}

#[tracing::instrument]
async fn health() -> StatusCode {
    StatusCode::OK
}

#[tracing::instrument(skip_all)]
async fn propose_transaction(
    State(service): State<Arc<MultisigService>>,
    Json(payload): Json<ProposeRequest>,
) -> Result<Json<TransactionRecord>, ApiError> {
    let record = service.propose_transaction(payload).await?;

    Ok(Json(record))
}

#[tracing::instrument(skip_all, fields(%tx_hash))]
async fn get_transaction(
    State(service): State<Arc<MultisigService>>,
    Path(tx_hash): Path<String>,
) -> Result<Json<TransactionRecord>, ApiError> {
    service
        .get_transaction_status(&tx_hash)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(&tx_hash))
}

#[tracing::instrument(skip_all, fields(%tx_hash))]
async fn add_signature(
    State(service): State<Arc<MultisigService>>,
    Path(tx_hash): Path<String>,
    Json(payload): Json<AddSignaturePayload>,
) -> Result<Json<SignatureStatus>, ApiError> {
    let status = service
        .add_signature(&tx_hash, payload.signer, payload.signature)
        .await?;

    Ok(Json(status))
}

#[tracing::instrument(skip_all, fields(%tx_hash))]
async fn execute_transaction(
    State(service): State<Arc<MultisigService>>,
    Path(tx_hash): Path<String>,
) -> Result<Json<ExecutionResult>, ApiError> {
    let result = service.execute_transaction(&tx_hash).await?;

    Ok(Json(result))
}

#[tracing::instrument(skip_all)]
async fn list_transactions(
    State(service): State<Arc<MultisigService>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TransactionPage>, ApiError> {
    let page = service
        .list_transactions(&query.filter(), &query.page())
        .await?;

    Ok(Json(page))
}
