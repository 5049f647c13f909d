mod search;
mod show;
mod write;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search::list).post(write::create))
        .route("/search", get(search::search))
        .route("/me", get(show::me))
        .route("/{id}", get(show::show).put(write::update))
}
