use axum::{extract::{Path, State}, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, error};
use uuid::Uuid;

use service::lesson_service;

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateLessonInput {
    pub title: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub pass_score: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateLessonInput {
    pub title: Option<String>,
    pub position: Option<i32>,
    pub content: Option<String>,
    pub pass_score: Option<i32>,
    pub allow_resubmission: Option<bool>,
}

#[utoipa::path(
    post, path = "/modules/{id}/lessons", tag = "lessons",
    params(("id" = Uuid, Path, description = "Module ID")),
    request_body = crate::openapi::CreateLessonRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(module_id): Path<Uuid>,
    Json(input): Json<CreateLessonInput>,
) -> Result<Json<models::lesson::Model>, JsonApiError> {
    match lesson_service::create_lesson(&state.db, tenant_id, module_id, &input.title, input.position, input.content, input.pass_score).await {
        Ok(l) => { info!(lesson_id = %l.id, module_id = %module_id, "created lesson"); Ok(Json(l)) }
        Err(e) => { error!(err = %e, "create lesson failed"); Err(JsonApiError::from(e)) }
    }
}

#[utoipa::path(
    get, path = "/modules/{id}/lessons", tag = "lessons",
    params(("id" = Uuid, Path, description = "Module ID")),
    responses(
        (status = 200, description = "List OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(module_id): Path<Uuid>,
) -> Result<Json<Vec<models::lesson::Model>>, JsonApiError> {
    let rows = lesson_service::list_lessons_by_module(&state.db, tenant_id, module_id).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/lessons/{id}", tag = "lessons",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::lesson::Model>, StatusCode> {
    match lesson_service::get_lesson(&state.db, tenant_id, id).await {
        Ok(Some(l)) => Ok(Json(l)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    put, path = "/lessons/{id}", tag = "lessons",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    request_body = crate::openapi::UpdateLessonRequest,
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
    Json(input): Json<UpdateLessonInput>,
) -> Result<Json<models::lesson::Model>, JsonApiError> {
    match lesson_service::update_lesson(
        &state.db,
        tenant_id,
        id,
        input.title.as_deref(),
        input.position,
        input.content,
        input.pass_score,
        input.allow_resubmission,
    ).await {
        Ok(l) => { info!(lesson_id = %l.id, allow_resubmission = l.allow_resubmission, "updated lesson"); Ok(Json(l)) }
        Err(e) => Err(JsonApiError::from(e)),
    }
}

#[utoipa::path(
    delete, path = "/lessons/{id}", tag = "lessons",
    params(("id" = Uuid, Path, description = "Lesson ID")),
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
    match lesson_service::delete_lesson(&state.db, tenant_id, id).await {
        Ok(true) => { info!(lesson_id = %id, "deleted lesson"); StatusCode::NO_CONTENT }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => { error!(err = %e, "delete lesson failed"); StatusCode::INTERNAL_SERVER_ERROR }
    }
}
