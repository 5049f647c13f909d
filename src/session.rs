use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::models::User;
use crate::{AppError, store};

pub const USER_ID: &str = "user_id";
pub const CSRF_STATE: &str = "csrf_state";
pub const PKCE_VERIFIER: &str = "pkce_verifier";
pub const RETURN_URL: &str = "return_url";

/// The signed-in user, loaded from the session cookie. Endpoints that take
/// this extractor reject unauthenticated requests with 403.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, err)| AppError::Internal(anyhow::Error::msg(err)))?;

        let Some(user_id) = session.get::<String>(USER_ID).await? else {
            return Err(AppError::forbidden("not signed in"));
        };

        let db_pool = SqlitePool::from_ref(state);
        let Some(user) = store::users::find_by_id(&db_pool, &user_id).await? else {
            // stale cookie after account deletion
            return Err(AppError::forbidden("not signed in"));
        };

        Ok(CurrentUser(user))
    }
}
