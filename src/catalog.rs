use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Course, Enrollment, STATUS_ACTIVE};
use crate::store::Store;

/// Conjunction of optional course predicates.
///
/// Category and instructor are stored lowercased and compared
/// case-insensitively; topic is an exact membership test on the course's
/// topic list. Blank inputs never become predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseFilter {
    pub category: Option<String>,
    pub topic: Option<String>,
    pub instructor: Option<String>,
}

impl CourseFilter {
    pub fn new(category: Option<&str>, topic: Option<&str>, instructor: Option<&str>) -> Self {
        Self {
            category: non_blank(category).map(str::to_lowercase),
            topic: non_blank(topic).map(str::to_owned),
            instructor: non_blank(instructor).map(str::to_lowercase),
        }
    }

    pub fn matches(&self, course: &Course) -> bool {
        if let Some(category) = &self.category {
            if !eq_lowercase(course.category.as_deref(), category) {
                return false;
            }
        }
        if let Some(instructor) = &self.instructor {
            if !eq_lowercase(course.instructor_name.as_deref(), instructor) {
                return false;
            }
        }
        if let Some(topic) = &self.topic {
            if !course.topics.iter().any(|t| t == topic) {
                return false;
            }
        }
        true
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.trim().is_empty())
}

fn eq_lowercase(value: Option<&str>, lowered: &str) -> bool {
    value.map(|v| v.to_lowercase() == lowered).unwrap_or(false)
}

pub async fn search(
    store: &dyn Store,
    category: Option<&str>,
    topic: Option<&str>,
    instructor: Option<&str>,
) -> AppResult<Vec<Course>> {
    let filter = CourseFilter::new(category, topic, instructor);
    tracing::debug!(?filter, "course search");
    Ok(store.list_courses(&filter).await?)
}

pub async fn get_course(store: &dyn Store, id: Uuid) -> AppResult<Course> {
    store
        .find_course(id)
        .await?
        .ok_or(AppError::NotFound { entity: "Course", id })
}

/// Courses the user holds at least one enrollment for. Duplicate enrollments
/// collapse to a single course.
pub async fn enrolled_courses(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<Course>> {
    let enrollments = store.list_enrollments_by_user(user_id).await?;
    let mut seen = HashSet::new();
    let ids: Vec<Uuid> = enrollments
        .iter()
        .map(|e| e.course_id)
        .filter(|id| seen.insert(*id))
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(store.find_courses_by_ids(&ids).await?)
}

/// Picks the enrollment the user most likely wants to resume: active, with a
/// recorded progress below 100, most recently accessed first. A missing
/// access time ranks below any recorded one.
pub fn pick_continue(enrollments: &[Enrollment]) -> Option<&Enrollment> {
    let mut candidates: Vec<&Enrollment> = enrollments
        .iter()
        .filter(|e| e.has_status(STATUS_ACTIVE))
        .filter(|e| matches!(e.progress_percent, Some(p) if p < 100))
        .collect();
    // stable: ties keep store order
    candidates.sort_by(|a, b| b.last_accessed_at.cmp(&a.last_accessed_at));
    candidates.into_iter().next()
}

pub async fn continue_course(store: &dyn Store, user_id: Uuid) -> AppResult<Option<Course>> {
    let enrollments = store.list_enrollments_by_user(user_id).await?;
    let Some(pick) = pick_continue(&enrollments) else {
        return Ok(None);
    };
    Ok(store.find_course(pick.course_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATUS_COMPLETED;
    use crate::store::memory::{course, enrollment, MemoryStore};
    use chrono::{Duration, Utc};

    async fn seeded() -> (MemoryStore, Vec<Course>) {
        let store = MemoryStore::new();
        let courses = vec![
            course("Rust Basics", "Programming", "Ada Lovelace", &["rust", "systems"]),
            course("Watercolor", "Art", "Bob Ross", &["painting"]),
            course("Async Rust", "programming", "Grace Hopper", &["rust", "async"]),
        ];
        for c in &courses {
            store.add_course(c.clone()).await;
        }
        (store, courses)
    }

    #[tokio::test]
    async fn search_without_filters_returns_everything() {
        let (store, courses) = seeded().await;
        let found = search(&store, None, None, None).await.unwrap();
        assert_eq!(found, courses);
    }

    #[tokio::test]
    async fn blank_filters_are_ignored() {
        let (store, courses) = seeded().await;
        let found = search(&store, Some(""), Some("  "), Some("\t")).await.unwrap();
        assert_eq!(found.len(), courses.len());
    }

    #[tokio::test]
    async fn category_filter_ignores_case() {
        let (store, _) = seeded().await;
        let found = search(&store, Some("PROGRAMMING"), None, None).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|c| c.category.as_deref().unwrap().eq_ignore_ascii_case("programming")));
    }

    #[tokio::test]
    async fn filters_combine_as_conjunction() {
        let (store, _) = seeded().await;
        let found = search(&store, Some("programming"), Some("async"), Some("grace hopper"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Async Rust");

        let none = search(&store, Some("art"), Some("rust"), None).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn topic_membership_is_exact() {
        let (store, _) = seeded().await;
        assert_eq!(search(&store, None, Some("rust"), None).await.unwrap().len(), 2);
        assert!(search(&store, None, Some("Rust"), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn enrolled_courses_collapse_duplicates() {
        let (store, courses) = seeded().await;
        let user = Uuid::new_v4();
        store.add_enrollment(enrollment(user, courses[0].id, STATUS_ACTIVE, Some(10))).await;
        store.add_enrollment(enrollment(user, courses[0].id, STATUS_ACTIVE, Some(20))).await;
        store.add_enrollment(enrollment(user, courses[2].id, STATUS_COMPLETED, Some(100))).await;
        store
            .add_enrollment(enrollment(Uuid::new_v4(), courses[1].id, STATUS_ACTIVE, Some(0)))
            .await;

        let found = enrolled_courses(&store, user).await.unwrap();
        let mut ids: Vec<Uuid> = found.iter().map(|c| c.id).collect();
        ids.sort();
        let mut expected = vec![courses[0].id, courses[2].id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn no_enrollments_means_no_courses() {
        let (store, _) = seeded().await;
        let found = enrolled_courses(&store, Uuid::new_v4()).await.unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn continue_prefers_most_recent_active_incomplete() {
        let user = Uuid::new_v4();
        let now = Utc::now();

        let mut older = enrollment(user, Uuid::new_v4(), STATUS_ACTIVE, Some(30));
        older.last_accessed_at = Some(now - Duration::days(2));
        let mut newest = enrollment(user, Uuid::new_v4(), "ACTIVE", Some(60));
        newest.last_accessed_at = Some(now);
        let mut never = enrollment(user, Uuid::new_v4(), STATUS_ACTIVE, Some(5));
        never.last_accessed_at = None;
        let mut finished = enrollment(user, Uuid::new_v4(), STATUS_ACTIVE, Some(100));
        finished.last_accessed_at = Some(now + Duration::hours(1));
        let mut completed = enrollment(user, Uuid::new_v4(), STATUS_COMPLETED, Some(50));
        completed.last_accessed_at = Some(now + Duration::hours(2));
        let mut unstarted = enrollment(user, Uuid::new_v4(), STATUS_ACTIVE, None);
        unstarted.last_accessed_at = Some(now + Duration::hours(3));

        let rows = vec![never, older, finished, completed, unstarted, newest.clone()];
        assert_eq!(pick_continue(&rows).map(|e| e.id), Some(newest.id));
    }

    #[test]
    fn continue_falls_back_to_unaccessed_enrollment() {
        let user = Uuid::new_v4();
        let only = enrollment(user, Uuid::new_v4(), STATUS_ACTIVE, Some(0));
        let rows = vec![only.clone()];
        assert_eq!(pick_continue(&rows).map(|e| e.id), Some(only.id));
    }

    #[tokio::test]
    async fn continue_course_is_empty_when_nothing_qualifies() {
        let (store, courses) = seeded().await;
        let user = Uuid::new_v4();
        store.add_enrollment(enrollment(user, courses[0].id, STATUS_COMPLETED, Some(100))).await;
        store.add_enrollment(enrollment(user, courses[1].id, "paused", Some(40))).await;
        assert!(continue_course(&store, user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn continue_course_is_empty_when_course_is_missing() {
        let (store, _) = seeded().await;
        let user = Uuid::new_v4();
        store.add_enrollment(enrollment(user, Uuid::new_v4(), STATUS_ACTIVE, Some(40))).await;
        assert!(continue_course(&store, user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn continue_course_resolves_course() {
        let (store, courses) = seeded().await;
        let user = Uuid::new_v4();
        store.add_enrollment(enrollment(user, courses[1].id, STATUS_ACTIVE, Some(40))).await;
        let found = continue_course(&store, user).await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(courses[1].id));
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let (store, _) = seeded().await;
        let err = get_course(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Course", .. }));
    }
}
