//! Budgets API endpoints.

use api_types::budget::{
    BudgetListResponse, BudgetStatusResponse, BudgetStatusView, BudgetUpsert, BudgetView,
    PeriodQuery, SpendingQuery, SpendingResponse,
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{BudgetData, Identity, Money};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category_id: budget.category_id,
        category_name: budget.category_name,
        amount: budget.amount.to_string(),
        month: budget.month,
        year: budget.year,
    }
}

fn budget_data(payload: &BudgetUpsert) -> Result<BudgetData, ServerError> {
    let amount: Money = payload.amount.parse()?;
    Ok(BudgetData {
        amount,
        month: payload.month,
        year: payload.year,
    })
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    period: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let Query(period) = period?;
    let budgets = state
        .engine
        .list_budgets(&identity, period.month, period.year)
        .await?
        .into_iter()
        .map(map_budget)
        .collect();
    Ok(Json(BudgetListResponse { budgets }))
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    payload: Result<Json<BudgetUpsert>, JsonRejection>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let Json(payload) = payload?;
    let data = budget_data(&payload)?;
    let budget = state
        .engine
        .create_budget(&identity, data, payload.category_id)
        .await?;
    Ok((StatusCode::CREATED, Json(map_budget(budget))))
}

pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    budget_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<BudgetUpsert>, JsonRejection>,
) -> Result<Json<BudgetView>, ServerError> {
    let Path(budget_id) = budget_id?;
    let Json(payload) = payload?;
    let data = budget_data(&payload)?;
    let budget = state
        .engine
        .update_budget(&identity, budget_id, data, payload.category_id)
        .await?;
    Ok(Json(map_budget(budget)))
}

pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    budget_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(budget_id) = budget_id?;
    state.engine.delete_budget(&identity, budget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn status(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    period: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<BudgetStatusResponse>, ServerError> {
    let Query(period) = period?;
    let budgets = state
        .engine
        .budget_status(&identity, period.month, period.year)
        .await?
        .into_iter()
        .map(|status| BudgetStatusView {
            budget: map_budget(status.budget),
            spent: status.spent.to_string(),
            remaining: status.remaining.to_string(),
        })
        .collect();
    Ok(Json(BudgetStatusResponse { budgets }))
}

pub async fn spending(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    query: Result<Query<SpendingQuery>, QueryRejection>,
) -> Result<Json<SpendingResponse>, ServerError> {
    let Query(query) = query?;
    let spent = state
        .engine
        .current_spending(&identity, query.category_id, query.month, query.year)
        .await?;
    Ok(Json(SpendingResponse {
        category_id: query.category_id,
        month: query.month,
        year: query.year,
        spent: spent.to_string(),
    }))
}
