mod handlers;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create))
        .route("/me", get(handlers::me))
        .route("/{id}", get(handlers::show))
}
