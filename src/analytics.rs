use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{AnalyticsSummary, LearningHours, STATUS_COMPLETED};
use crate::store::Store;

/// All-time totals for a user. Hours come from the precomputed learning-hours
/// rows, keyed by the textual form of the user id.
pub async fn summary(store: &dyn Store, user_id: Uuid) -> AppResult<AnalyticsSummary> {
    let enrollments = store.list_enrollments_by_user(user_id).await?;
    let hours = store.list_learning_hours_by_user(&user_id.to_string()).await?;

    let completed_count = enrollments
        .iter()
        .filter(|e| e.has_status(STATUS_COMPLETED))
        .count() as u64;

    Ok(AnalyticsSummary {
        completed_count,
        enrolled_count: enrollments.len() as u64,
        hours_learned: hours.iter().map(|h| h.total_hours).sum(),
    })
}

pub async fn learning_hours(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<LearningHours>> {
    Ok(store.list_learning_hours_by_user(&user_id.to_string()).await?)
}
