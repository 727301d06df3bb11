pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::applications::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let import_limit = DefaultBodyLimit::max(state.config.import_max_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/apps",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route("/api/apps/export", get(handlers::handle_export))
        .route(
            "/api/apps/import",
            post(handlers::handle_import).layer(import_limit),
        )
        .route(
            "/api/apps/:id",
            get(handlers::handle_get)
                .put(handlers::handle_update)
                .delete(handlers::handle_delete),
        )
        .with_state(state)
}
