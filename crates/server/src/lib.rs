use api_types::ErrorBody;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

pub use server::{ServerState, router, run_with_listener};

mod auth;
mod budgets;
mod categories;
mod reports;
mod server;
mod transactions;
mod user;

pub enum ServerError {
    Engine(EngineError),
    /// The request body, query string or path could not be extracted.
    Rejected(StatusCode, String),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthenticated => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::NotFound(_) | EngineError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::DuplicateName(_)
        | EngineError::DuplicateBudget(_)
        | EngineError::DuplicateUser(_) => StatusCode::CONFLICT,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InvariantViolation(_)
        | EngineError::PasswordHash(_)
        | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn code_for_engine_error(err: &EngineError) -> &'static str {
    match err {
        EngineError::Unauthenticated => "unauthenticated",
        EngineError::Forbidden(_) => "forbidden",
        EngineError::NotFound(_) => "not_found",
        EngineError::CategoryNotFound(_) => "category_not_found",
        EngineError::DuplicateName(_) => "duplicate_name",
        EngineError::DuplicateBudget(_) => "duplicate_budget",
        EngineError::DuplicateUser(_) => "duplicate_user",
        EngineError::Validation(_) => "validation",
        EngineError::InvariantViolation(_)
        | EngineError::PasswordHash(_)
        | EngineError::Database(_) => "internal",
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(_) | EngineError::InvariantViolation(_) | EngineError::PasswordHash(_) => {
            tracing::error!("internal error: {err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, error) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                code_for_engine_error(&err),
                message_for_engine_error(err),
            ),
            ServerError::Rejected(status, err) => (status, "invalid_request", err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, "bad_request", err),
        };

        (
            status,
            Json(ErrorBody {
                error,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),+ $(,)?) => {$(
        impl From<$rejection> for ServerError {
            fn from(value: $rejection) -> Self {
                Self::Rejected(value.status(), value.body_text())
            }
        }
    )+};
}

from_rejection!(JsonRejection, PathRejection, QueryRejection);
