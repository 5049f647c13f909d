mod clients;
mod lockin;
mod login;
mod logout;
mod user;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub use clients::Clients;
pub use user::AuthUser;

/// Browser-facing OAuth flow, mounted at the root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login/{provider}", get(login::login))
        .route("/lockin/{provider}", get(lockin::lockin))
        .route("/logout", get(logout::logout))
}

/// JSON endpoints under /api/auth.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/user",
            get(user::current_user).delete(user::delete_account),
        )
        .route("/set-user-type", post(user::set_user_type))
}
