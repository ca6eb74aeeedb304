use axum::{extract::{Query, State}, http::StatusCode, Extension, Json};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{info, error};
use uuid::Uuid;

use service::track_service::{self, CourseTrackUpdate, LessonTrackSubmit};

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize, Serialize)]
pub struct CourseTrackInput {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: Option<String>,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub ended_at: Option<DateTime<FixedOffset>>,
    pub lessons_total: Option<i32>,
    pub lessons_completed: Option<i32>,
    pub certificate_issued: Option<bool>,
    pub certificate_issued_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LessonTrackInput {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub status: Option<String>,
    pub score: Option<i32>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TrackQuery {
    pub user_id: Uuid,
    pub course_id: Uuid,
}

#[utoipa::path(
    put, path = "/tracks/course", tag = "tracks",
    request_body = crate::openapi::CourseTrackRequest,
    responses(
        (status = 200, description = "Upserted"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn put_course_track(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Json(input): Json<CourseTrackInput>,
) -> Result<Json<models::course_track::Model>, JsonApiError> {
    let update = CourseTrackUpdate {
        status: input.status,
        started_at: input.started_at,
        ended_at: input.ended_at,
        lessons_total: input.lessons_total,
        lessons_completed: input.lessons_completed,
        certificate_issued: input.certificate_issued,
        certificate_issued_at: input.certificate_issued_at,
    };
    match track_service::upsert_course_track(&state.db, tenant_id, input.user_id, input.course_id, update).await {
        Ok(t) => Ok(Json(t)),
        Err(e) => { error!(err = %e, "course track upsert failed"); Err(JsonApiError::from(e)) }
    }
}

#[utoipa::path(
    get, path = "/tracks/course", tag = "tracks",
    params(TrackQuery),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_course_track(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Query(q): Query<TrackQuery>,
) -> Result<Json<models::course_track::Model>, StatusCode> {
    match track_service::get_course_track(&state.db, tenant_id, q.user_id, q.course_id).await {
        Ok(Some(t)) => Ok(Json(t)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    put, path = "/tracks/lesson", tag = "tracks",
    request_body = crate::openapi::LessonTrackRequest,
    responses(
        (status = 200, description = "Upserted"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn put_lesson_track(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Json(input): Json<LessonTrackInput>,
) -> Result<Json<models::lesson_track::Model>, JsonApiError> {
    let submit = LessonTrackSubmit { status: input.status, score: input.score };
    match track_service::upsert_lesson_track(&state.db, tenant_id, input.user_id, input.lesson_id, submit).await {
        Ok(t) => { info!(lesson_id = %t.lesson_id, user_id = %t.user_id, attempts = t.attempts, "lesson track upserted"); Ok(Json(t)) }
        Err(e) => Err(JsonApiError::from(e)),
    }
}
