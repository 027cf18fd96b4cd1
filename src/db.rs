use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::catalog::CourseFilter;
use crate::config::AppConfig;
use crate::models::{Certificate, Course, Enrollment, LearningHours};
use crate::store::Store;

pub type Db = Pool<Postgres>;

const COURSE_COLUMNS: &str = "\
    id, title, category, topics, instructor_name, duration_minutes, \
    thumbnail, created_at, updated_at";

const ENROLLMENT_COLUMNS: &str = "\
    id, user_id, course_id, progress_percent, status, last_accessed_at";

const CERTIFICATE_COLUMNS: &str = "id, user_id, course_id, title, issued_at, url";

const LEARNING_HOURS_COLUMNS: &str = "id, user_id, category, total_hours, month_hours";

pub async fn connect(config: &AppConfig) -> anyhow::Result<Db> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

/// `Store` backed by Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: Db,
}

impl PgStore {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

/// SQL for the course listing; one `AND`-joined condition per predicate set on
/// `filter`, bound in the order category, instructor, topic.
fn course_search_sql(filter: &CourseFilter) -> String {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.category.is_some() {
        conditions.push(format!("lower(category) = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.instructor.is_some() {
        conditions.push(format!("lower(instructor_name) = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.topic.is_some() {
        conditions.push(format!("${bind_idx} = ANY(topics)"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    format!("SELECT {COURSE_COLUMNS} FROM courses{where_clause}")
}

#[async_trait]
impl Store for PgStore {
    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, sqlx::Error> {
        let query = course_search_sql(filter);
        let mut q = sqlx::query_as::<_, Course>(&query);
        if let Some(category) = &filter.category {
            q = q.bind(category);
        }
        if let Some(instructor) = &filter.instructor {
            q = q.bind(instructor);
        }
        if let Some(topic) = &filter.topic {
            q = q.bind(topic);
        }
        q.fetch_all(&self.pool).await
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_courses_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ANY($1)");
        sqlx::query_as::<_, Course>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_enrollments_by_user(&self, user_id: Uuid) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE user_id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_enrollment(&self, id: Uuid) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn save_enrollment(&self, e: &Enrollment) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (id, user_id, course_id, progress_percent, status, last_accessed_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET \
                user_id = EXCLUDED.user_id, \
                course_id = EXCLUDED.course_id, \
                progress_percent = EXCLUDED.progress_percent, \
                status = EXCLUDED.status, \
                last_accessed_at = EXCLUDED.last_accessed_at \
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(e.id)
            .bind(e.user_id)
            .bind(e.course_id)
            .bind(e.progress_percent)
            .bind(&e.status)
            .bind(e.last_accessed_at)
            .fetch_one(&self.pool)
            .await
    }

    async fn list_certificates_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Certificate>, sqlx::Error> {
        let query = format!("SELECT {CERTIFICATE_COLUMNS} FROM certificates WHERE user_id = $1");
        sqlx::query_as::<_, Certificate>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_learning_hours_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<LearningHours>, sqlx::Error> {
        let query =
            format!("SELECT {LEARNING_HOURS_COLUMNS} FROM learning_hours WHERE user_id = $1");
        sqlx::query_as::<_, LearningHours>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }
}
