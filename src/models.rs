use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role tag on a user account. A user carries at most one role profile at a
/// time; switching resets the other side (see `store::users::set_user_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum UserType {
    Professional,
    Organization,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Professional => "professional",
            UserType::Organization => "organization",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    NotAvailable,
    PendingDocumentation,
    DeploymentInProgress,
}

impl Default for AvailabilityStatus {
    fn default() -> Self {
        AvailabilityStatus::NotAvailable
    }
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::NotAvailable => "not_available",
            AvailabilityStatus::PendingDocumentation => "pending_documentation",
            AvailabilityStatus::DeploymentInProgress => "deployment_in_progress",
        }
    }
}

impl FromStr for AvailabilityStatus {
    type Err = UnknownAvailability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(AvailabilityStatus::Available),
            "not_available" => Ok(AvailabilityStatus::NotAvailable),
            "pending_documentation" => Ok(AvailabilityStatus::PendingDocumentation),
            "deployment_in_progress" => Ok(AvailabilityStatus::DeploymentInProgress),
            _ => Err(UnknownAvailability(s.to_owned())),
        }
    }
}

#[derive(Debug)]
pub struct UnknownAvailability(pub String);

impl fmt::Display for UnknownAvailability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown availability status: {}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(skip_serializing)]
    pub provider_subject: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub user_type: Option<UserType>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 1:1 extension of a `professional`-tagged user. The set-valued fields are
/// stored as JSON-array TEXT columns (see `store::professionals`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: String,
    pub user_id: String,
    pub specialties: Vec<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    pub regions: Vec<String>,
    pub experience_years: i64,
    pub availability_status: AvailabilityStatus,
    pub available_from: Option<String>,
    pub preferred_duration: Option<String>,
    pub license_verified: bool,
    pub bio: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub org_type: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub country: Option<String>,
    pub verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Directed edge between two users. Immutable once created except for the
/// read flag; conversations are derived from these rows on every read.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub subject: Option<String>,
    pub content: String,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub professional_id: String,
    pub file_name: String,
    pub file_url: String,
    pub doc_type: Option<String>,
    pub verified: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrainingCourse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub level: Option<String>,
    pub featured: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub completed: bool,
    pub enrolled_at: i64,
}
