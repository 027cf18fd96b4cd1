use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Enrollment, PatchEnrollmentReq, STATUS_ACTIVE};
use crate::store::Store;

pub async fn by_user(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<Enrollment>> {
    Ok(store.list_enrollments_by_user(user_id).await?)
}

pub async fn get_enrollment(store: &dyn Store, id: Uuid) -> AppResult<Enrollment> {
    store
        .find_enrollment(id)
        .await?
        .ok_or(AppError::NotFound { entity: "Enrollment", id })
}

/// Creates a fresh enrollment at 0% progress. Repeated calls for the same
/// user and course each produce a new record.
pub async fn enroll(store: &dyn Store, user_id: Uuid, course_id: Uuid) -> AppResult<Enrollment> {
    let enrollment = Enrollment {
        id: Uuid::new_v4(),
        user_id,
        course_id,
        progress_percent: Some(0),
        status: STATUS_ACTIVE.to_string(),
        last_accessed_at: Some(Utc::now()),
    };
    let saved = store.save_enrollment(&enrollment).await?;
    tracing::info!(enrollment_id = %saved.id, %user_id, %course_id, "enrollment created");
    Ok(saved)
}

/// Applies the provided fields and always bumps `last_accessed_at`.
///
/// Progress is stored as given; a blank status leaves the current one in place.
pub async fn patch(store: &dyn Store, id: Uuid, req: PatchEnrollmentReq) -> AppResult<Enrollment> {
    let mut enrollment = get_enrollment(store, id).await?;

    if let Some(progress) = req.progress_percent {
        enrollment.progress_percent = Some(progress);
    }
    if let Some(status) = req.status.filter(|s| !s.trim().is_empty()) {
        enrollment.status = status;
    }
    enrollment.last_accessed_at = Some(Utc::now());

    let saved = store.save_enrollment(&enrollment).await?;
    tracing::info!(
        enrollment_id = %saved.id,
        progress = ?saved.progress_percent,
        status = %saved.status,
        "enrollment updated"
    );
    Ok(saved)
}
