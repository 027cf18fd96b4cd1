use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::CourseFilter;
use crate::models::{Certificate, Course, Enrollment, LearningHours};

pub type SharedStore = Arc<dyn Store>;

/// Persistence gateway over the four record kinds the API serves.
///
/// Implementations own their data; services hold a handle and keep no state
/// between calls. List operations return rows in the store's natural order.
#[async_trait]
pub trait Store: Send + Sync {
    /// Courses matching every predicate set on `filter`; all courses when none is set.
    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, sqlx::Error>;

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, sqlx::Error>;

    /// Batch lookup. Ids without a matching course are skipped.
    async fn find_courses_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, sqlx::Error>;

    async fn list_enrollments_by_user(&self, user_id: Uuid) -> Result<Vec<Enrollment>, sqlx::Error>;

    async fn find_enrollment(&self, id: Uuid) -> Result<Option<Enrollment>, sqlx::Error>;

    /// Insert or overwrite by id, returning the stored row.
    async fn save_enrollment(&self, enrollment: &Enrollment) -> Result<Enrollment, sqlx::Error>;

    async fn list_certificates_by_user(&self, user_id: Uuid)
        -> Result<Vec<Certificate>, sqlx::Error>;

    async fn list_learning_hours_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<LearningHours>, sqlx::Error>;
}
