use axum::{extract::{Path, State}, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, error};
use uuid::Uuid;

use service::module_service;

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateModuleInput {
    pub title: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateModuleInput {
    pub title: Option<String>,
    pub position: Option<i32>,
}

#[utoipa::path(
    post, path = "/courses/{id}/modules", tag = "modules",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = crate::openapi::CreateModuleRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(course_id): Path<Uuid>,
    Json(input): Json<CreateModuleInput>,
) -> Result<Json<models::module::Model>, JsonApiError> {
    match module_service::create_module(&state.db, tenant_id, course_id, &input.title, input.position).await {
        Ok(m) => { info!(module_id = %m.id, course_id = %course_id, "created module"); Ok(Json(m)) }
        Err(e) => { error!(err = %e, "create module failed"); Err(JsonApiError::from(e)) }
    }
}

#[utoipa::path(
    get, path = "/courses/{id}/modules", tag = "modules",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "List OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<models::module::Model>>, JsonApiError> {
    let rows = module_service::list_modules_by_course(&state.db, tenant_id, course_id).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    put, path = "/modules/{id}", tag = "modules",
    params(("id" = Uuid, Path, description = "Module ID")),
    request_body = crate::openapi::UpdateModuleRequest,
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
    Json(input): Json<UpdateModuleInput>,
) -> Result<Json<models::module::Model>, JsonApiError> {
    match module_service::update_module(&state.db, tenant_id, id, input.title.as_deref(), input.position).await {
        Ok(m) => { info!(module_id = %m.id, "updated module"); Ok(Json(m)) }
        Err(e) => Err(JsonApiError::from(e)),
    }
}

#[utoipa::path(
    delete, path = "/modules/{id}", tag = "modules",
    params(("id" = Uuid, Path, description = "Module ID")),
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
    match module_service::delete_module(&state.db, tenant_id, id).await {
        Ok(true) => { info!(module_id = %id, "deleted module"); StatusCode::NO_CONTENT }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => { error!(err = %e, "delete module failed"); StatusCode::INTERNAL_SERVER_ERROR }
    }
}
