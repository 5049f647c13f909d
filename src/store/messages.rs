use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::Message;

use super::{new_id, now};

const MSG_COLS: &str = "id, sender_id, receiver_id, subject, content, is_read, created_at";

/// One derived conversation per distinct counterpart. Not a stored entity;
/// recomputed from the flat message table on every read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub other_user_id: String,
    pub last_message: Message,
    pub unread_count: i64,
}

/// Groups a user's messages by the other participant and summarizes each
/// group. Pure so it is testable without a database.
///
/// Semantics: `last_message` is whichever message in the group carries the
/// greatest timestamp; `unread_count` counts every message the user received
/// and has not read, independent of which one is last. Output order is the
/// encounter order of counterparts in `messages` (callers pass newest-first,
/// so a counterpart's position reflects its first, i.e. newest, message).
pub fn conversations_from(user_id: &str, messages: &[Message]) -> Vec<ConversationSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut by_other: HashMap<String, ConversationSummary> = HashMap::new();

    for msg in messages {
        let other = if msg.sender_id == user_id {
            &msg.receiver_id
        } else {
            &msg.sender_id
        };
        let received_unread = msg.receiver_id == user_id && !msg.is_read;

        match by_other.get_mut(other.as_str()) {
            None => {
                order.push(other.clone());
                by_other.insert(
                    other.clone(),
                    ConversationSummary {
                        other_user_id: other.clone(),
                        last_message: msg.clone(),
                        unread_count: if received_unread { 1 } else { 0 },
                    },
                );
            }
            Some(conversation) => {
                if msg.created_at > conversation.last_message.created_at {
                    conversation.last_message = msg.clone();
                }
                if received_unread {
                    conversation.unread_count += 1;
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|other| by_other.remove(&other))
        .collect()
}

pub async fn create(
    db_pool: &SqlitePool,
    sender_id: &str,
    receiver_id: &str,
    subject: Option<&str>,
    content: &str,
) -> sqlx::Result<Message> {
    let id = new_id();
    sqlx::query(
        "INSERT INTO messages (id, sender_id, receiver_id, subject, content, is_read, \
         created_at) VALUES (?,?,?,?,?,0,?)",
    )
    .bind(&id)
    .bind(sender_id)
    .bind(receiver_id)
    .bind(subject)
    .bind(content)
    .bind(now())
    .execute(db_pool)
    .await?;

    sqlx::query_as::<_, Message>(&format!("SELECT {MSG_COLS} FROM messages WHERE id=?"))
        .bind(&id)
        .fetch_one(db_pool)
        .await
}

/// Everything the user sent or received, newest first. Feed for
/// `conversations_from`.
pub async fn involving(db_pool: &SqlitePool, user_id: &str) -> sqlx::Result<Vec<Message>> {
    sqlx::query_as::<_, Message>(&format!(
        "SELECT {MSG_COLS} FROM messages WHERE sender_id=? OR receiver_id=? \
         ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .bind(user_id)
    .fetch_all(db_pool)
    .await
}

/// Chronological two-party thread.
pub async fn thread(
    db_pool: &SqlitePool,
    user_id: &str,
    other_user_id: &str,
) -> sqlx::Result<Vec<Message>> {
    sqlx::query_as::<_, Message>(&format!(
        "SELECT {MSG_COLS} FROM messages WHERE \
         (sender_id=? AND receiver_id=?) OR (sender_id=? AND receiver_id=?) \
         ORDER BY created_at ASC"
    ))
    .bind(user_id)
    .bind(other_user_id)
    .bind(other_user_id)
    .bind(user_id)
    .fetch_all(db_pool)
    .await
}

pub async fn find_by_id(db_pool: &SqlitePool, id: &str) -> sqlx::Result<Option<Message>> {
    sqlx::query_as::<_, Message>(&format!("SELECT {MSG_COLS} FROM messages WHERE id=?"))
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

/// Flips exactly one message's read flag.
pub async fn mark_read(db_pool: &SqlitePool, id: &str) -> sqlx::Result<()> {
    sqlx::query("UPDATE messages SET is_read=1 WHERE id=?")
        .bind(id)
        .execute(db_pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, from: &str, to: &str, read: bool, at: i64) -> Message {
        Message {
            id: id.to_owned(),
            sender_id: from.to_owned(),
            receiver_id: to.to_owned(),
            subject: None,
            content: format!("message {id}"),
            is_read: read,
            created_at: at,
        }
    }

    #[test]
    fn unread_counting_is_decoupled_from_last_message() {
        // A→B unread, B→A read, A→B unread, in increasing timestamp order.
        // Aggregated for B: last message is the third, unread count is 2.
        let history = vec![
            msg("m3", "A", "B", false, 30),
            msg("m2", "B", "A", true, 20),
            msg("m1", "A", "B", false, 10),
        ];

        let conversations = conversations_from("B", &history);
        assert_eq!(conversations.len(), 1);
        let conv = &conversations[0];
        assert_eq!(conv.other_user_id, "A");
        assert_eq!(conv.last_message.id, "m3");
        assert_eq!(conv.unread_count, 2);
    }

    #[test]
    fn own_sent_messages_never_count_as_unread() {
        let history = vec![
            msg("m2", "B", "A", false, 20),
            msg("m1", "B", "A", false, 10),
        ];

        let conversations = conversations_from("B", &history);
        assert_eq!(conversations[0].unread_count, 0);
        assert_eq!(conversations[0].last_message.id, "m2");
    }

    #[test]
    fn one_entry_per_counterpart_regardless_of_volume() {
        let mut history = Vec::new();
        for i in 0..50 {
            let (from, to) = if i % 2 == 0 { ("A", "B") } else { ("B", "A") };
            history.push(msg(&format!("a{i}"), from, to, false, 100 - i));
        }
        for i in 0..30 {
            let (from, to) = if i % 2 == 0 { ("C", "B") } else { ("B", "C") };
            history.push(msg(&format!("c{i}"), from, to, false, 100 - i));
        }

        let conversations = conversations_from("B", &history);
        assert_eq!(conversations.len(), 2);
    }

    #[test]
    fn counterparts_appear_in_encounter_order() {
        let history = vec![
            msg("m3", "C", "B", false, 30),
            msg("m2", "A", "B", false, 20),
            msg("m1", "C", "B", false, 10),
        ];

        let conversations = conversations_from("B", &history);
        let order: Vec<&str> = conversations
            .iter()
            .map(|c| c.other_user_id.as_str())
            .collect();
        assert_eq!(order, vec!["C", "A"]);
    }

    #[test]
    fn older_message_never_replaces_last() {
        let history = vec![
            msg("m1", "A", "B", false, 10),
            msg("m2", "A", "B", false, 30),
        ];

        // even fed out of order, the greatest timestamp wins
        let conversations = conversations_from("B", &history);
        assert_eq!(conversations[0].last_message.id, "m2");
    }

    async fn seed_user(db_pool: &SqlitePool, subject: &str) -> String {
        crate::store::users::upsert(
            db_pool,
            crate::store::users::UpsertUser {
                provider_subject: subject.to_owned(),
                email: None,
                first_name: None,
                last_name: None,
                profile_image_url: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[sqlx::test]
    async fn mark_read_touches_only_that_message(db_pool: SqlitePool) {
        let alice = seed_user(&db_pool, "alice").await;
        let bob = seed_user(&db_pool, "bob").await;

        let first = create(&db_pool, &alice, &bob, None, "hello").await.unwrap();
        let second = create(&db_pool, &alice, &bob, None, "again").await.unwrap();

        mark_read(&db_pool, &first.id).await.unwrap();

        let thread = thread(&db_pool, &bob, &alice).await.unwrap();
        let by_id: std::collections::HashMap<_, _> =
            thread.iter().map(|m| (m.id.as_str(), m.is_read)).collect();
        assert_eq!(by_id[first.id.as_str()], true);
        assert_eq!(by_id[second.id.as_str()], false);

        let unread = conversations_from(&bob, &involving(&db_pool, &bob).await.unwrap())[0]
            .unread_count;
        assert_eq!(unread, 1);
    }

    #[sqlx::test]
    async fn thread_is_chronological_and_two_party(db_pool: SqlitePool) {
        let alice = seed_user(&db_pool, "alice").await;
        let bob = seed_user(&db_pool, "bob").await;
        let carol = seed_user(&db_pool, "carol").await;

        create(&db_pool, &alice, &bob, None, "one").await.unwrap();
        create(&db_pool, &bob, &alice, None, "two").await.unwrap();
        create(&db_pool, &carol, &bob, None, "noise").await.unwrap();

        let msgs = thread(&db_pool, &bob, &alice).await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert!(msgs[0].created_at <= msgs[1].created_at);
        assert!(msgs.iter().all(|m| m.sender_id != carol));
    }
}
