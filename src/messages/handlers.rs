use axum::debug_handler;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::models::Message;
use crate::session::CurrentUser;
use crate::store::messages::{self, ConversationSummary};
use crate::{AppError, AppResult, store};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessageBody {
    receiver_id: String,
    #[serde(default)]
    subject: Option<String>,
    content: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn send(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<SendMessageBody>,
) -> AppResult<Json<Message>> {
    if body.content.is_empty() {
        return Err(AppError::bad_request("message content is required"));
    }
    if store::users::find_by_id(&db_pool, &body.receiver_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("receiver not found"));
    }

    let message = messages::create(
        &db_pool,
        &user.id,
        &body.receiver_id,
        body.subject.as_deref(),
        &body.content,
    )
    .await?;
    Ok(Json(message))
}

/// Derived conversation list: one `{otherUserId, lastMessage, unreadCount}`
/// entry per counterpart, computed from the flat message table.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn conversations(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    let all = messages::involving(&db_pool, &user.id).await?;
    Ok(Json(messages::conversations_from(&user.id, &all)))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn thread(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(other_user_id): Path<String>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(
        messages::thread(&db_pool, &user.id, &other_user_id).await?,
    ))
}

/// Only the receiver of a message may mark it read.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn mark_read(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let Some(message) = messages::find_by_id(&db_pool, &id).await? else {
        return Err(AppError::not_found("message not found"));
    };
    if message.receiver_id != user.id {
        return Err(AppError::forbidden("not your message"));
    }

    messages::mark_read(&db_pool, &id).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::store::users::{self, UpsertUser};

    async fn seed_user(db_pool: &SqlitePool, subject: &str) -> User {
        users::upsert(
            db_pool,
            UpsertUser {
                provider_subject: subject.to_owned(),
                email: None,
                first_name: None,
                last_name: None,
                profile_image_url: None,
            },
        )
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn only_the_receiver_may_mark_a_message_read(db_pool: SqlitePool) {
        let alice = seed_user(&db_pool, "alice").await;
        let bob = seed_user(&db_pool, "bob").await;
        let carol = seed_user(&db_pool, "carol").await;

        let message = messages::create(&db_pool, &alice.id, &bob.id, None, "hello")
            .await
            .unwrap();

        // neither the sender nor a third party
        for outsider in [alice, carol] {
            let result = mark_read(
                State(db_pool.clone()),
                CurrentUser(outsider),
                Path(message.id.clone()),
            )
            .await;
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }

        let still_unread = messages::find_by_id(&db_pool, &message.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!still_unread.is_read);

        mark_read(
            State(db_pool.clone()),
            CurrentUser(bob),
            Path(message.id.clone()),
        )
        .await
        .unwrap();

        let read = messages::find_by_id(&db_pool, &message.id)
            .await
            .unwrap()
            .unwrap();
        assert!(read.is_read);
    }

    #[sqlx::test]
    async fn marking_a_missing_message_is_not_found(db_pool: SqlitePool) {
        let user = seed_user(&db_pool, "alice").await;

        let result = mark_read(
            State(db_pool.clone()),
            CurrentUser(user),
            Path("no-such-id".to_owned()),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
