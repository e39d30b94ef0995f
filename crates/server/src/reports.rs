//! Report endpoints. Amounts are rendered as decimal strings.

use api_types::report::{
    ReportQuery, SpendingByCategoryResponse, SummaryResponse, TrendBucket, TrendQuery,
    TrendsResponse,
};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use engine::{Identity, PeriodType};

use crate::{ServerError, server::ServerState};

pub async fn summary(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let Query(query) = query?;
    let summary = state
        .engine
        .summary(&identity, query.start, query.end)
        .await?;
    Ok(Json(SummaryResponse {
        total_income: summary.total_income.to_string(),
        total_expenses: summary.total_expenses.to_string(),
        net_balance: summary.net_balance.to_string(),
    }))
}

pub async fn spending_by_category(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<SpendingByCategoryResponse>, ServerError> {
    let Query(query) = query?;
    let categories = state
        .engine
        .spending_by_category(&identity, query.start, query.end)
        .await?
        .into_iter()
        .map(|(name, amount)| (name, amount.to_string()))
        .collect();
    Ok(Json(SpendingByCategoryResponse { categories }))
}

pub async fn trends(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> Result<Json<TrendsResponse>, ServerError> {
    let Query(query) = query?;
    let period = query
        .period
        .as_deref()
        .map(PeriodType::from)
        .unwrap_or_default();
    let periods = state
        .engine
        .income_vs_expense_trends(&identity, query.start, query.end, period)
        .await?
        .into_iter()
        .map(|(key, bucket)| {
            (
                key,
                TrendBucket {
                    income: bucket.income.map(|m| m.to_string()),
                    expense: bucket.expense.map(|m| m.to_string()),
                },
            )
        })
        .collect();
    Ok(Json(TrendsResponse { periods }))
}
