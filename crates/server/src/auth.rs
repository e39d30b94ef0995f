//! Registration, login and logout.

use api_types::{
    auth::{Login, LoginResponse, Register},
    user::UserView,
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::RegisterCmd;

use crate::{
    ServerError,
    server::{ServerState, SessionToken},
    user::map_user,
};

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<Register>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let Json(payload) = payload?;
    let user = state
        .engine
        .register(RegisterCmd {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_user(user))))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServerError> {
    let Json(payload) = payload?;
    let session = state
        .engine
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: map_user(session.user),
    }))
}

pub async fn logout(
    Extension(token): Extension<SessionToken>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.logout(&token.0).await?;
    Ok(StatusCode::NO_CONTENT)
}
