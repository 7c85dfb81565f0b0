use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

pub mod accounts;
pub mod admin;
pub mod favorites;

pub use accounts::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: account and favorites endpoints,
/// admin endpoints, and the static frontend as fallback.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: &str) -> Router {
    let static_dir = ServeDir::new(frontend_dir)
        .fallback(ServeFile::new(format!("{frontend_dir}/index.html")));

    let account_routes = Router::new()
        .route("/signup", post(accounts::signup))
        .route("/login", post(accounts::login))
        .route("/get-user-id", get(accounts::get_user_id))
        .route("/api/user-favorites/:user_id", get(accounts::user_favorites_by_id));

    let favorite_routes = Router::new()
        .route("/save-favorites", post(favorites::save_favorite))
        .route("/get-favorites", get(favorites::get_favorites))
        .route("/remove-favorite", post(favorites::remove_favorite));

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users).post(admin::add_user))
        .route("/admin/users/:username", put(admin::edit_user).delete(admin::delete_user));

    Router::new()
        .route("/health", get(health))
        .merge(account_routes)
        .merge(favorite_routes)
        .merge(admin_routes)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
