use sqlx::SqlitePool;

use crate::models::{User, UserType};

use super::{new_id, now};

/// Identity attributes supplied by the identity provider on each login.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub provider_subject: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

const USER_COLS: &str =
    "id, provider_subject, email, first_name, last_name, profile_image_url, user_type, \
     created_at, updated_at";

/// Create-on-first-login, refresh identity attributes on every later login.
/// The role tag survives the refresh.
pub async fn upsert(db_pool: &SqlitePool, u: UpsertUser) -> sqlx::Result<User> {
    let ts = now();
    sqlx::query(
        "INSERT INTO users (id, provider_subject, email, first_name, last_name, \
         profile_image_url, created_at, updated_at) VALUES (?,?,?,?,?,?,?,?) \
         ON CONFLICT(provider_subject) DO UPDATE SET \
         email=excluded.email, first_name=excluded.first_name, \
         last_name=excluded.last_name, profile_image_url=excluded.profile_image_url, \
         updated_at=excluded.updated_at",
    )
    .bind(new_id())
    .bind(&u.provider_subject)
    .bind(&u.email)
    .bind(&u.first_name)
    .bind(&u.last_name)
    .bind(&u.profile_image_url)
    .bind(ts)
    .bind(ts)
    .execute(db_pool)
    .await?;

    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLS} FROM users WHERE provider_subject=?"
    ))
    .bind(&u.provider_subject)
    .fetch_one(db_pool)
    .await
}

pub async fn find_by_id(db_pool: &SqlitePool, id: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE id=?"))
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

/// Sets the role tag. Switching between roles is destructive: the profile
/// row of the abandoned role is deleted so a user never carries both.
pub async fn set_user_type(
    db_pool: &SqlitePool,
    user_id: &str,
    user_type: UserType,
) -> sqlx::Result<User> {
    match user_type {
        UserType::Professional => {
            sqlx::query("DELETE FROM organizations WHERE user_id=?")
                .bind(user_id)
                .execute(db_pool)
                .await?;
        }
        UserType::Organization => {
            sqlx::query(
                "DELETE FROM documents WHERE professional_id IN \
                 (SELECT id FROM professionals WHERE user_id=?)",
            )
            .bind(user_id)
            .execute(db_pool)
            .await?;
            sqlx::query("DELETE FROM professionals WHERE user_id=?")
                .bind(user_id)
                .execute(db_pool)
                .await?;
        }
    }

    sqlx::query("UPDATE users SET user_type=?, updated_at=? WHERE id=?")
        .bind(user_type.as_str())
        .bind(now())
        .bind(user_id)
        .execute(db_pool)
        .await?;

    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE id=?"))
        .bind(user_id)
        .fetch_one(db_pool)
        .await
}

/// Explicit account-deletion request, the only hard-delete path. Removes the
/// user's role profiles, documents, enrollments and messages.
pub async fn delete_account(db_pool: &SqlitePool, user_id: &str) -> sqlx::Result<()> {
    sqlx::query(
        "DELETE FROM documents WHERE professional_id IN \
         (SELECT id FROM professionals WHERE user_id=?)",
    )
    .bind(user_id)
    .execute(db_pool)
    .await?;
    sqlx::query("DELETE FROM professionals WHERE user_id=?")
        .bind(user_id)
        .execute(db_pool)
        .await?;
    sqlx::query("DELETE FROM organizations WHERE user_id=?")
        .bind(user_id)
        .execute(db_pool)
        .await?;
    sqlx::query("DELETE FROM enrollments WHERE user_id=?")
        .bind(user_id)
        .execute(db_pool)
        .await?;
    sqlx::query("DELETE FROM messages WHERE sender_id=? OR receiver_id=?")
        .bind(user_id)
        .bind(user_id)
        .execute(db_pool)
        .await?;
    sqlx::query("DELETE FROM users WHERE id=?")
        .bind(user_id)
        .execute(db_pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(subject: &str) -> UpsertUser {
        UpsertUser {
            provider_subject: subject.to_owned(),
            email: Some(format!("{subject}@example.org")),
            first_name: Some("Amira".to_owned()),
            last_name: Some("Haddad".to_owned()),
            profile_image_url: None,
        }
    }

    #[sqlx::test]
    async fn upsert_is_idempotent_per_subject(db_pool: SqlitePool) -> sqlx::Result<()> {
        let first = upsert(&db_pool, visitor("sub-1")).await?;
        let mut again = visitor("sub-1");
        again.email = Some("new@example.org".to_owned());
        let second = upsert(&db_pool, again).await?;

        assert_eq!(first.id, second.id);
        assert_eq!(second.email.as_deref(), Some("new@example.org"));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&db_pool)
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[sqlx::test]
    async fn profile_submission_tags_the_account(db_pool: SqlitePool) -> sqlx::Result<()> {
        // same sequence the create-professional endpoint runs
        let user = upsert(&db_pool, visitor("sub-3")).await?;
        assert_eq!(user.user_type, None);

        set_user_type(&db_pool, &user.id, UserType::Professional).await?;
        crate::store::professionals::create(
            &db_pool,
            &user.id,
            crate::store::professionals::NewProfessional {
                specialties: vec!["Surgery".to_owned()],
                languages: vec!["English".to_owned()],
                experience_years: 5,
                availability_status: crate::models::AvailabilityStatus::Available,
                ..Default::default()
            },
        )
        .await?;

        let reloaded = find_by_id(&db_pool, &user.id).await?.unwrap();
        assert_eq!(reloaded.user_type, Some(UserType::Professional));

        let profile = crate::store::professionals::find_by_user_id(&db_pool, &user.id)
            .await?
            .unwrap();
        assert_eq!(profile.specialties, vec!["Surgery"]);
        Ok(())
    }

    #[sqlx::test]
    async fn role_switch_resets_old_profile(db_pool: SqlitePool) -> sqlx::Result<()> {
        let user = upsert(&db_pool, visitor("sub-2")).await?;
        set_user_type(&db_pool, &user.id, UserType::Professional).await?;
        crate::store::professionals::create(
            &db_pool,
            &user.id,
            crate::store::professionals::NewProfessional::default(),
        )
        .await?;

        let switched = set_user_type(&db_pool, &user.id, UserType::Organization).await?;
        assert_eq!(switched.user_type, Some(UserType::Organization));

        let gone = crate::store::professionals::find_by_user_id(&db_pool, &user.id).await?;
        assert!(gone.is_none());
        Ok(())
    }
}
