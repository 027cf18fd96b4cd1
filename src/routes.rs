use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::SharedStore;
use crate::{analytics, catalog, certificate, enrollment};

type JsonBody<T> = WithRejection<Json<T>, AppError>;
type QueryParams<T> = WithRejection<Query<T>, AppError>;
type PathId = WithRejection<Path<Uuid>, AppError>;

pub fn router(store: SharedStore, cors_origins: Option<&[String]>) -> Router {
    let api = Router::new()
        // courses
        .route("/courses", get(list_courses))
        .route("/courses/enrolled", get(enrolled_courses))
        .route("/courses/continue", get(continue_course))
        .route("/courses/:id", get(get_course))
        // enrollments
        .route("/enrollments", get(list_enrollments).post(create_enrollment))
        .route("/enrollments/:id", get(get_enrollment).patch(patch_enrollment))
        // read-only views
        .route("/certificates", get(list_certificates))
        .route("/analytics/summary", get(analytics_summary))
        .route("/analytics/learning-hours", get(learning_hours))
        .layer(cors_layer(cors_origins));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api)
        .with_state(store)
}

/// Credentialed CORS for `/api`. Without an allow-list the request origin and
/// headers are mirrored back, which admits every origin.
pub fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let allow_origin = match origins {
        Some(list) => AllowOrigin::list(
            list.iter().filter_map(|o| HeaderValue::from_str(o).ok()),
        ),
        None => AllowOrigin::mirror_request(),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

// --- courses ---

async fn list_courses(
    State(store): State<SharedStore>,
    WithRejection(Query(q), _): QueryParams<CourseSearchQuery>,
) -> AppResult<Json<Vec<Course>>> {
    let courses = catalog::search(
        store.as_ref(),
        q.category.as_deref(),
        q.topic.as_deref(),
        q.instructor.as_deref(),
    )
    .await?;
    Ok(Json(courses))
}

async fn enrolled_courses(
    State(store): State<SharedStore>,
    WithRejection(Query(q), _): QueryParams<UserQuery>,
) -> AppResult<Json<Vec<Course>>> {
    Ok(Json(catalog::enrolled_courses(store.as_ref(), q.user_id).await?))
}

async fn continue_course(
    State(store): State<SharedStore>,
    WithRejection(Query(q), _): QueryParams<UserQuery>,
) -> AppResult<Json<Option<Course>>> {
    Ok(Json(catalog::continue_course(store.as_ref(), q.user_id).await?))
}

async fn get_course(
    State(store): State<SharedStore>,
    WithRejection(Path(id), _): PathId,
) -> AppResult<Json<Course>> {
    Ok(Json(catalog::get_course(store.as_ref(), id).await?))
}

// --- enrollments ---

async fn list_enrollments(
    State(store): State<SharedStore>,
    WithRejection(Query(q), _): QueryParams<UserQuery>,
) -> AppResult<Json<Vec<Enrollment>>> {
    Ok(Json(enrollment::by_user(store.as_ref(), q.user_id).await?))
}

async fn get_enrollment(
    State(store): State<SharedStore>,
    WithRejection(Path(id), _): PathId,
) -> AppResult<Json<Enrollment>> {
    Ok(Json(enrollment::get_enrollment(store.as_ref(), id).await?))
}

async fn create_enrollment(
    State(store): State<SharedStore>,
    WithRejection(Json(req), _): JsonBody<EnrollReq>,
) -> AppResult<Json<Enrollment>> {
    let created = enrollment::enroll(store.as_ref(), req.user_id, req.course_id).await?;
    Ok(Json(created))
}

async fn patch_enrollment(
    State(store): State<SharedStore>,
    WithRejection(Path(id), _): PathId,
    WithRejection(Json(req), _): JsonBody<PatchEnrollmentReq>,
) -> AppResult<Json<Enrollment>> {
    Ok(Json(enrollment::patch(store.as_ref(), id, req).await?))
}

// --- certificates / analytics ---

async fn list_certificates(
    State(store): State<SharedStore>,
    WithRejection(Query(q), _): QueryParams<UserQuery>,
) -> AppResult<Json<Vec<Certificate>>> {
    Ok(Json(certificate::by_user(store.as_ref(), q.user_id).await?))
}

async fn analytics_summary(
    State(store): State<SharedStore>,
    WithRejection(Query(q), _): QueryParams<UserQuery>,
) -> AppResult<Json<AnalyticsSummary>> {
    Ok(Json(analytics::summary(store.as_ref(), q.user_id).await?))
}

async fn learning_hours(
    State(store): State<SharedStore>,
    WithRejection(Query(q), _): QueryParams<UserQuery>,
) -> AppResult<Json<Vec<LearningHours>>> {
    Ok(Json(analytics::learning_hours(store.as_ref(), q.user_id).await?))
}
