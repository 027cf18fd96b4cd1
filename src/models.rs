use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use uuid::Uuid;

/// Status literal for an enrollment the learner is still working through.
pub const STATUS_ACTIVE: &str = "active";
/// Status literal for a finished enrollment.
pub const STATUS_COMPLETED: &str = "completed";

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub topics: Vec<String>,
    pub instructor_name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub thumbnail: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub progress_percent: Option<i32>,
    // free text; only "active" and "completed" carry meaning
    pub status: String,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    /// Case-insensitive comparison against one of the recognized status literals.
    pub fn has_status(&self, literal: &str) -> bool {
        self.status.eq_ignore_ascii_case(literal)
    }
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub title: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// Precomputed time-on-course aggregate. `user_id` is the textual form of the user's UUID.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningHours {
    pub id: i64,
    pub user_id: String,
    pub category: Option<String>,
    pub total_hours: f64,
    pub month_hours: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub completed_count: u64,
    pub enrolled_count: u64,
    pub hours_learned: f64,
}

// --- request shapes ---

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EnrollReq {
    pub user_id: Uuid,
    pub course_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PatchEnrollmentReq {
    pub progress_percent: Option<i32>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[serde_as]
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CourseSearchQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub topic: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub instructor: Option<String>,
}
