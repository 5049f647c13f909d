mod handlers;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(handlers::courses))
        .route("/enroll/{course_id}", post(handlers::enroll))
        .route("/enrollments", get(handlers::enrollments))
}
