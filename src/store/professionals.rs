use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{AvailabilityStatus, Professional, User};

use super::{decode_list, encode_list, new_id, now};

const PRO_COLS: &str =
    "id, user_id, specialties, languages, certifications, regions, experience_years, \
     availability_status, available_from, preferred_duration, license_verified, bio, \
     created_at, updated_at";

/// Raw row; the set-valued columns are JSON-array TEXT.
#[derive(sqlx::FromRow)]
struct ProfessionalRow {
    id: String,
    user_id: String,
    specialties: String,
    languages: String,
    certifications: String,
    regions: String,
    experience_years: i64,
    availability_status: AvailabilityStatus,
    available_from: Option<String>,
    preferred_duration: Option<String>,
    license_verified: bool,
    bio: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<ProfessionalRow> for Professional {
    fn from(row: ProfessionalRow) -> Self {
        Professional {
            id: row.id,
            user_id: row.user_id,
            specialties: decode_list(&row.specialties),
            languages: decode_list(&row.languages),
            certifications: decode_list(&row.certifications),
            regions: decode_list(&row.regions),
            experience_years: row.experience_years,
            availability_status: row.availability_status,
            available_from: row.available_from,
            preferred_duration: row.preferred_duration,
            license_verified: row.license_verified,
            bio: row.bio,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProfessional {
    pub specialties: Vec<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    pub regions: Vec<String>,
    #[serde(alias = "experience")]
    pub experience_years: i64,
    pub availability_status: AvailabilityStatus,
    pub available_from: Option<String>,
    pub preferred_duration: Option<String>,
    pub bio: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfessional {
    pub specialties: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
    #[serde(alias = "experience")]
    pub experience_years: Option<i64>,
    pub availability_status: Option<AvailabilityStatus>,
    pub available_from: Option<String>,
    pub preferred_duration: Option<String>,
    pub bio: Option<String>,
}

/// Search criteria; every field is optional and absent fields impose no
/// constraint. `specialty`, `language` and `region` are loose,
/// case-insensitive substring matches against the serialized set columns
/// (a filter string may span a delimiter between elements);
/// `availability` is an exact match.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub specialty: Option<String>,
    pub language: Option<String>,
    pub availability: Option<AvailabilityStatus>,
    pub region: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Builds the WHERE clause and its bind list. Kept apart from the fetch so
/// the composition is testable on its own.
fn compose_search(filters: &SearchFilters) -> (String, Vec<String>) {
    let mut sql = format!("SELECT {PRO_COLS} FROM professionals WHERE 1=1");
    let mut binds = Vec::new();

    if let Some(specialty) = non_empty(&filters.specialty) {
        sql.push_str(" AND specialties LIKE ?");
        binds.push(format!("%{specialty}%"));
    }
    if let Some(language) = non_empty(&filters.language) {
        sql.push_str(" AND languages LIKE ?");
        binds.push(format!("%{language}%"));
    }
    if let Some(availability) = filters.availability {
        sql.push_str(" AND availability_status = ?");
        binds.push(availability.as_str().to_owned());
    }
    if let Some(region) = non_empty(&filters.region) {
        sql.push_str(" AND regions LIKE ?");
        binds.push(format!("%{region}%"));
    }

    sql.push_str(" ORDER BY updated_at DESC");
    (sql, binds)
}

/// Filtered directory search, most recently updated first. No pagination;
/// zero filters returns the whole directory.
pub async fn search(
    db_pool: &SqlitePool,
    filters: &SearchFilters,
) -> sqlx::Result<Vec<Professional>> {
    let (sql, binds) = compose_search(filters);

    let mut query = sqlx::query_as::<_, ProfessionalRow>(&sql);
    for bind in &binds {
        query = query.bind(bind);
    }

    Ok(query
        .fetch_all(db_pool)
        .await?
        .into_iter()
        .map(Professional::from)
        .collect())
}

pub async fn create(
    db_pool: &SqlitePool,
    user_id: &str,
    new: NewProfessional,
) -> sqlx::Result<Professional> {
    let id = new_id();
    let ts = now();
    sqlx::query(
        "INSERT INTO professionals (id, user_id, specialties, languages, certifications, \
         regions, experience_years, availability_status, available_from, \
         preferred_duration, bio, created_at, updated_at) \
         VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(encode_list(&new.specialties))
    .bind(encode_list(&new.languages))
    .bind(encode_list(&new.certifications))
    .bind(encode_list(&new.regions))
    .bind(new.experience_years)
    .bind(new.availability_status.as_str())
    .bind(&new.available_from)
    .bind(&new.preferred_duration)
    .bind(&new.bio)
    .bind(ts)
    .bind(ts)
    .execute(db_pool)
    .await?;

    sqlx::query_as::<_, ProfessionalRow>(&format!(
        "SELECT {PRO_COLS} FROM professionals WHERE id=?"
    ))
    .bind(&id)
    .fetch_one(db_pool)
    .await
    .map(Professional::from)
}

pub async fn find_by_id(db_pool: &SqlitePool, id: &str) -> sqlx::Result<Option<Professional>> {
    sqlx::query_as::<_, ProfessionalRow>(&format!(
        "SELECT {PRO_COLS} FROM professionals WHERE id=?"
    ))
    .bind(id)
    .fetch_optional(db_pool)
    .await
    .map(|row| row.map(Professional::from))
}

pub async fn find_by_user_id(
    db_pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<Professional>> {
    sqlx::query_as::<_, ProfessionalRow>(&format!(
        "SELECT {PRO_COLS} FROM professionals WHERE user_id=?"
    ))
    .bind(user_id)
    .fetch_optional(db_pool)
    .await
    .map(|row| row.map(Professional::from))
}

/// The public profile page join: professional plus the user fields worth
/// showing next to it.
pub async fn find_with_user(
    db_pool: &SqlitePool,
    id: &str,
) -> sqlx::Result<Option<(Professional, User)>> {
    let Some(professional) = find_by_id(db_pool, id).await? else {
        return Ok(None);
    };

    let user = crate::store::users::find_by_id(db_pool, &professional.user_id).await?;
    Ok(user.map(|user| (professional, user)))
}

/// Merge-then-write partial update. Bumps `updated_at`, which drives the
/// search ordering.
pub async fn update(
    db_pool: &SqlitePool,
    current: &Professional,
    patch: UpdateProfessional,
) -> sqlx::Result<Professional> {
    let specialties = patch.specialties.unwrap_or_else(|| current.specialties.clone());
    let languages = patch.languages.unwrap_or_else(|| current.languages.clone());
    let certifications = patch
        .certifications
        .unwrap_or_else(|| current.certifications.clone());
    let regions = patch.regions.unwrap_or_else(|| current.regions.clone());

    sqlx::query(
        "UPDATE professionals SET specialties=?, languages=?, certifications=?, regions=?, \
         experience_years=?, availability_status=?, available_from=?, \
         preferred_duration=?, bio=?, updated_at=? WHERE id=?",
    )
    .bind(encode_list(&specialties))
    .bind(encode_list(&languages))
    .bind(encode_list(&certifications))
    .bind(encode_list(&regions))
    .bind(patch.experience_years.unwrap_or(current.experience_years))
    .bind(
        patch
            .availability_status
            .unwrap_or(current.availability_status)
            .as_str(),
    )
    .bind(patch.available_from.or_else(|| current.available_from.clone()))
    .bind(
        patch
            .preferred_duration
            .or_else(|| current.preferred_duration.clone()),
    )
    .bind(patch.bio.or_else(|| current.bio.clone()))
    .bind(now())
    .bind(&current.id)
    .execute(db_pool)
    .await?;

    sqlx::query_as::<_, ProfessionalRow>(&format!(
        "SELECT {PRO_COLS} FROM professionals WHERE id=?"
    ))
    .bind(&current.id)
    .fetch_one(db_pool)
    .await
    .map(Professional::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::users::{self, UpsertUser};

    #[test]
    fn zero_filters_compose_to_bare_ordered_select() {
        let (sql, binds) = compose_search(&SearchFilters::default());
        assert!(!sql.contains("AND"));
        assert!(sql.ends_with("ORDER BY updated_at DESC"));
        assert!(binds.is_empty());
    }

    #[test]
    fn empty_strings_impose_no_constraint() {
        let filters = SearchFilters {
            specialty: Some(String::new()),
            region: Some(String::new()),
            ..Default::default()
        };
        let (_, binds) = compose_search(&filters);
        assert!(binds.is_empty());
    }

    #[test]
    fn all_filters_are_and_combined() {
        let filters = SearchFilters {
            specialty: Some("Surgery".to_owned()),
            language: Some("French".to_owned()),
            availability: Some(AvailabilityStatus::Available),
            region: Some("Sahel".to_owned()),
        };
        let (sql, binds) = compose_search(&filters);
        assert_eq!(sql.matches(" AND ").count(), 4);
        assert_eq!(
            binds,
            vec!["%Surgery%", "%French%", "available", "%Sahel%"]
        );
    }

    async fn seed_user(db_pool: &SqlitePool, subject: &str) -> String {
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
        .id
    }

    async fn seed_professional(
        db_pool: &SqlitePool,
        subject: &str,
        specialties: &[&str],
        languages: &[&str],
        availability: AvailabilityStatus,
    ) -> Professional {
        let user_id = seed_user(db_pool, subject).await;
        create(
            db_pool,
            &user_id,
            NewProfessional {
                specialties: specialties.iter().map(|s| s.to_string()).collect(),
                languages: languages.iter().map(|s| s.to_string()).collect(),
                regions: vec!["East Africa".to_owned(), "Middle East".to_owned()],
                experience_years: 5,
                availability_status: availability,
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn specialty_filter_is_case_insensitive_substring(db_pool: SqlitePool) {
        seed_professional(
            &db_pool,
            "a",
            &["Emergency Surgery"],
            &["English"],
            AvailabilityStatus::Available,
        )
        .await;
        seed_professional(
            &db_pool,
            "b",
            &["Pediatrics"],
            &["English"],
            AvailabilityStatus::Available,
        )
        .await;

        let filters = SearchFilters {
            specialty: Some("surg".to_owned()),
            ..Default::default()
        };
        let hits = search(&db_pool, &filters).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].specialties, vec!["Emergency Surgery"]);
    }

    #[sqlx::test]
    async fn substring_may_span_the_element_delimiter(db_pool: SqlitePool) {
        // Inherited looseness of matching against the serialized column:
        // a filter containing `","` bridges two adjacent elements.
        seed_professional(
            &db_pool,
            "a",
            &["Trauma Care", "Surgery"],
            &["English"],
            AvailabilityStatus::Available,
        )
        .await;

        let filters = SearchFilters {
            specialty: Some("care\",\"surgery".to_owned()),
            ..Default::default()
        };
        let hits = search(&db_pool, &filters).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[sqlx::test]
    async fn availability_is_an_exact_match(db_pool: SqlitePool) {
        seed_professional(
            &db_pool,
            "a",
            &["Surgery"],
            &["English"],
            AvailabilityStatus::Available,
        )
        .await;
        seed_professional(
            &db_pool,
            "b",
            &["Surgery"],
            &["English"],
            AvailabilityStatus::PendingDocumentation,
        )
        .await;

        let filters = SearchFilters {
            availability: Some(AvailabilityStatus::Available),
            ..Default::default()
        };
        let hits = search(&db_pool, &filters).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].availability_status, AvailabilityStatus::Available);
    }

    #[sqlx::test]
    async fn zero_filters_return_everyone_newest_update_first(db_pool: SqlitePool) {
        let older = seed_professional(
            &db_pool,
            "a",
            &["Surgery"],
            &["English"],
            AvailabilityStatus::Available,
        )
        .await;
        let newer = seed_professional(
            &db_pool,
            "b",
            &["Pediatrics"],
            &["French"],
            AvailabilityStatus::Available,
        )
        .await;

        // force a strictly newer updated_at on the second profile
        sqlx::query("UPDATE professionals SET updated_at=updated_at+10 WHERE id=?")
            .bind(&newer.id)
            .execute(&db_pool)
            .await
            .unwrap();

        let hits = search(&db_pool, &SearchFilters::default()).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, newer.id);
        assert_eq!(hits[1].id, older.id);
    }

    #[sqlx::test]
    async fn partial_update_keeps_absent_fields(db_pool: SqlitePool) {
        let professional = seed_professional(
            &db_pool,
            "a",
            &["Surgery"],
            &["English"],
            AvailabilityStatus::Available,
        )
        .await;

        let patch = UpdateProfessional {
            availability_status: Some(AvailabilityStatus::DeploymentInProgress),
            ..Default::default()
        };
        let updated = update(&db_pool, &professional, patch).await.unwrap();

        assert_eq!(
            updated.availability_status,
            AvailabilityStatus::DeploymentInProgress
        );
        assert_eq!(updated.specialties, professional.specialties);
        assert_eq!(updated.experience_years, professional.experience_years);
    }
}
