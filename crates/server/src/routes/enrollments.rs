use axum::{extract::{Path, Query, State}, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, error};
use uuid::Uuid;

use common::types::Paged;
use service::enrollment_service::{self, EnrollmentFilter};

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateEnrollmentInput {
    pub user_id: Uuid,
    pub course_id: Uuid,
    #[serde(default)]
    pub cohort: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateEnrollmentInput {
    pub status: Option<String>,
    pub cohort: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub user_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub cohort: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

#[utoipa::path(
    post, path = "/enrollments", tag = "enrollments",
    request_body = crate::openapi::CreateEnrollmentRequest,
    responses(
        (status = 200, description = "Enrolled"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Json(input): Json<CreateEnrollmentInput>,
) -> Result<Json<models::enrollment::Model>, JsonApiError> {
    match enrollment_service::enroll(&state.db, tenant_id, input.user_id, input.course_id, input.cohort).await {
        Ok(e) => { info!(enrollment_id = %e.id, user_id = %e.user_id, course_id = %e.course_id, "enrolled"); Ok(Json(e)) }
        Err(e) => { error!(err = %e, "enroll failed"); Err(JsonApiError::from(e)) }
    }
}

#[utoipa::path(
    get, path = "/enrollments", tag = "enrollments",
    params(ListQuery),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Paged<models::enrollment::Model>>, JsonApiError> {
    let opts = service::pagination::Pagination::from_query(q.page, q.limit, q.offset);
    let (skip, take) = opts.normalize();
    let filter = EnrollmentFilter {
        user_id: q.user_id,
        course_id: q.course_id,
        cohort: q.cohort,
        status: q.status,
    };
    let (rows, total) = enrollment_service::list_enrollments(&state.db, tenant_id, filter, opts).await?;
    Ok(Json(Paged::new(rows, total, skip, take)))
}

#[utoipa::path(
    get, path = "/enrollments/{id}", tag = "enrollments",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::enrollment::Model>, StatusCode> {
    match enrollment_service::get_enrollment(&state.db, tenant_id, id).await {
        Ok(Some(e)) => Ok(Json(e)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    put, path = "/enrollments/{id}", tag = "enrollments",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    request_body = crate::openapi::UpdateEnrollmentRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateEnrollmentInput>,
) -> Result<Json<models::enrollment::Model>, JsonApiError> {
    match enrollment_service::update_enrollment(&state.db, tenant_id, id, input.status.as_deref(), input.cohort).await {
        Ok(e) => { info!(enrollment_id = %e.id, status = %e.status, "updated enrollment"); Ok(Json(e)) }
        Err(e) => Err(JsonApiError::from(e)),
    }
}

#[utoipa::path(
    delete, path = "/enrollments/{id}", tag = "enrollments",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 204, description = "Cancelled"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already Cancelled")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    match enrollment_service::cancel_enrollment(&state.db, tenant_id, id).await {
        Ok(true) => { info!(enrollment_id = %id, "cancelled enrollment"); Ok(StatusCode::NO_CONTENT) }
        Ok(false) => Ok(StatusCode::NOT_FOUND),
        Err(e) => Err(JsonApiError::from(e)),
    }
}
