use axum::{extract::{Path, Query, State}, http::StatusCode, Extension, Json};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{info, error};
use uuid::Uuid;

use common::types::Paged;
use service::course_service;

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;
use crate::routes::PageQuery;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateCourseInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub end_date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

#[utoipa::path(
    post, path = "/courses", tag = "courses",
    request_body = crate::openapi::CreateCourseRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Json(input): Json<CreateCourseInput>,
) -> Result<Json<models::course::Model>, JsonApiError> {
    match course_service::create_course(&state.db, tenant_id, &input.title, input.description, input.start_date, input.end_date).await {
        Ok(c) => { info!(course_id = %c.id, alias = %c.alias, tenant_id = %tenant_id, "created course"); Ok(Json(c)) }
        Err(e) => { error!(err = %e, "create course failed"); Err(JsonApiError::from(e)) }
    }
}

#[utoipa::path(
    get, path = "/courses", tag = "courses",
    params(ListQuery),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Paged<models::course::Model>>, JsonApiError> {
    let opts = service::pagination::Pagination::from_query(q.page, q.limit, q.offset);
    let (skip, take) = opts.normalize();
    let (rows, total) = course_service::list_courses(&state.db, tenant_id, q.status.as_deref(), opts).await?;
    Ok(Json(Paged::new(rows, total, skip, take)))
}

#[utoipa::path(
    get, path = "/courses/{id}", tag = "courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::course::Model>, StatusCode> {
    match course_service::get_course(&state.db, tenant_id, id).await {
        Ok(Some(c)) => Ok(Json(c)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    put, path = "/courses/{id}", tag = "courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = crate::openapi::UpdateCourseRequest,
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
    Json(input): Json<UpdateCourseInput>,
) -> Result<Json<models::course::Model>, JsonApiError> {
    match course_service::update_course(
        &state.db,
        tenant_id,
        id,
        input.title.as_deref(),
        input.description,
        input.status.as_deref(),
        input.start_date,
        input.end_date,
    ).await {
        Ok(c) => { info!(course_id = %c.id, "updated course"); Ok(Json(c)) }
        Err(e) => Err(JsonApiError::from(e)),
    }
}

#[utoipa::path(
    delete, path = "/courses/{id}", tag = "courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    match course_service::delete_course(&state.db, tenant_id, id).await {
        Ok(true) => { info!(course_id = %id, "deleted course"); StatusCode::NO_CONTENT }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => { error!(err = %e, "delete course failed"); StatusCode::INTERNAL_SERVER_ERROR }
    }
}
