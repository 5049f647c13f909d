use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::Organization;

use super::{new_id, now};

const ORG_COLS: &str =
    "id, user_id, name, org_type, description, website, contact_person, contact_email, \
     country, verified, created_at, updated_at";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub name: String,
    pub org_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

pub async fn create(
    db_pool: &SqlitePool,
    user_id: &str,
    new: NewOrganization,
) -> sqlx::Result<Organization> {
    let id = new_id();
    let ts = now();
    sqlx::query(
        "INSERT INTO organizations (id, user_id, name, org_type, description, website, \
         contact_person, contact_email, country, created_at, updated_at) \
         VALUES (?,?,?,?,?,?,?,?,?,?,?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(&new.name)
    .bind(&new.org_type)
    .bind(&new.description)
    .bind(&new.website)
    .bind(&new.contact_person)
    .bind(&new.contact_email)
    .bind(&new.country)
    .bind(ts)
    .bind(ts)
    .execute(db_pool)
    .await?;

    sqlx::query_as::<_, Organization>(&format!(
        "SELECT {ORG_COLS} FROM organizations WHERE id=?"
    ))
    .bind(&id)
    .fetch_one(db_pool)
    .await
}

pub async fn find_by_id(db_pool: &SqlitePool, id: &str) -> sqlx::Result<Option<Organization>> {
    sqlx::query_as::<_, Organization>(&format!(
        "SELECT {ORG_COLS} FROM organizations WHERE id=?"
    ))
    .bind(id)
    .fetch_optional(db_pool)
    .await
}

pub async fn find_by_user_id(
    db_pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<Organization>> {
    sqlx::query_as::<_, Organization>(&format!(
        "SELECT {ORG_COLS} FROM organizations WHERE user_id=?"
    ))
    .bind(user_id)
    .fetch_optional(db_pool)
    .await
}
