//! Categories API endpoints.

use api_types::category::{CategoryListResponse, CategoryUpsert, CategoryView};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::Identity;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        global: category.is_global(),
        id: category.id,
        name: category.name,
    }
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories(&identity)
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    payload: Result<Json<CategoryUpsert>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;
    let category = state
        .engine
        .create_category(&identity, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    category_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CategoryUpsert>, JsonRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let Path(category_id) = category_id?;
    let Json(payload) = payload?;
    let category = state
        .engine
        .update_category(&identity, category_id, &payload.name)
        .await?;
    Ok(Json(map_category(category)))
}

pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    category_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(category_id) = category_id?;
    state
        .engine
        .delete_category(&identity, category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
