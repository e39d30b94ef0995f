//! Current user endpoints.

use api_types::user::{ProfileUpdate, UserView};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use engine::Identity;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        email: user.email,
        roles: user.roles,
        first_name: user.first_name,
        last_name: user.last_name,
        date_of_birth: user.date_of_birth,
        phone_number: user.phone_number,
        address: user.address,
        profile_picture_url: user.profile_picture_url,
    }
}

pub async fn me(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.current_user(&identity).await?;
    Ok(Json(map_user(user)))
}

pub async fn update_me(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UserView>, ServerError> {
    let Json(payload) = payload?;
    let changes = engine::ProfileUpdate {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        first_name: payload.first_name,
        last_name: payload.last_name,
        date_of_birth: payload.date_of_birth,
        phone_number: payload.phone_number,
        address: payload.address,
        profile_picture_url: payload.profile_picture_url,
    };
    let user = state.engine.update_profile(&identity, changes).await?;
    Ok(Json(map_user(user)))
}
