mod handlers;

use axum::routing::{get, post, put};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::send))
        .route("/conversations", get(handlers::conversations))
        .route("/{user_id}", get(handlers::thread))
        .route("/{id}/read", put(handlers::mark_read))
}
