//! HTTP surface of the donation ledger: auth, wallet setup, the donate
//! endpoint, and donation history.

pub mod auth;
pub mod convert;
pub mod donate;
pub mod donations;
pub mod error;
pub mod middleware;
pub mod wallet;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};

pub use auth::{AppState, AppStateInner};

/// Full route table. Lives here (rather than in the server binary) so
/// integration tests can drive the real surface.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/wallet", post(wallet::create_wallet))
        .route("/donate", post(donate::donate))
        .route("/donation/{donation_id}", get(donations::get_donation))
        .route("/donations", get(donations::list_donations))
        .route("/donations/period", get(donations::list_donations_in_period))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Route not found" })),
    )
}
