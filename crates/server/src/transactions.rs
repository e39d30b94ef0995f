//! Transactions API endpoints

use api_types::transaction::{
    RecentQuery, TransactionKind as ApiKind, TransactionListResponse, TransactionQuery,
    TransactionUpsert, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{Identity, Money, TransactionData, TransactionFilter};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

const DEFAULT_RECENT: u64 = 10;
const MAX_RECENT: u64 = 500;

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        amount: tx.amount.to_string(),
        kind: map_kind(tx.kind),
        date: tx.date,
        description: tx.description,
        category_id: tx.category_id,
        category_name: tx.category_name,
    }
}

fn transaction_data(payload: TransactionUpsert) -> Result<(TransactionData, Option<Uuid>), ServerError> {
    let amount: Money = payload.amount.parse()?;
    Ok((
        TransactionData {
            amount,
            kind: engine_kind(payload.kind),
            date: payload.date,
            description: payload.description,
        },
        payload.category_id,
    ))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let Query(query) = query?;
    let filter = TransactionFilter {
        from: query.from,
        to: query.to,
        category_id: query.category_id,
        kind: query.kind.map(engine_kind),
    };
    let transactions = state
        .engine
        .list_transactions(&identity, &filter)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn recent(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT);
    if limit > MAX_RECENT {
        return Err(ServerError::Generic(format!(
            "limit must be at most {MAX_RECENT}"
        )));
    }
    let transactions = state
        .engine
        .recent_transactions(&identity, limit)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    transaction_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Path(transaction_id) = transaction_id?;
    let tx = state
        .engine
        .get_transaction(&identity, transaction_id)
        .await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionUpsert>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let Json(payload) = payload?;
    let (data, category_id) = transaction_data(payload)?;
    let tx = state
        .engine
        .create_transaction(&identity, data, category_id)
        .await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    transaction_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TransactionUpsert>, JsonRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Path(transaction_id) = transaction_id?;
    let Json(payload) = payload?;
    let (data, category_id) = transaction_data(payload)?;
    let tx = state
        .engine
        .update_transaction(&identity, transaction_id, data, category_id)
        .await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    transaction_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(transaction_id) = transaction_id?;
    state
        .engine
        .delete_transaction(&identity, transaction_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
