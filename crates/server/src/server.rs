use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use std::sync::Arc;

use crate::{ServerError, auth, budgets, categories, reports, transactions, user};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// The bearer token of the current request, kept for logout.
#[derive(Clone, Debug)]
pub(crate) struct SessionToken(pub(crate) String);

/// Resolve the `Authorization: Bearer` token into an `engine::Identity`.
async fn authenticate(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(header) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Err(EngineError::Unauthenticated.into());
    };
    let token = header.token().to_string();

    let identity = state.engine.resolve_identity(&token).await?;

    request.extensions_mut().insert(identity);
    request.extensions_mut().insert(SessionToken(token));
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users/me", get(user::me).put(user::update_me))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/api/transactions/recent", get(transactions::recent))
        .route(
            "/api/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/api/budgets", get(budgets::list).post(budgets::create))
        .route("/api/budgets/status", get(budgets::status))
        .route("/api/budgets/spending", get(budgets::spending))
        .route(
            "/api/budgets/{id}",
            put(budgets::update).delete(budgets::delete),
        )
        .route("/api/reports/summary", get(reports::summary))
        .route(
            "/api/reports/spending-by-category",
            get(reports::spending_by_category),
        )
        .route(
            "/api/reports/income-vs-expense-trends",
            get(reports::trends),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    public.merge(protected).with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
