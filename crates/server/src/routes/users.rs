use axum::{extract::{Path, Query, State}, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, error};
use uuid::Uuid;

use common::types::Paged;
use service::user_service;

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;
use crate::routes::PageQuery;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateUserInput {
    pub name: String,
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::CreateUserRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Json(input): Json<CreateUserInput>,
) -> Result<Json<models::user::Model>, JsonApiError> {
    match user_service::create_user(&state.db, tenant_id, &input.email, &input.name).await {
        Ok(u) => { info!(user_id = %u.id, tenant_id = %tenant_id, "created user"); Ok(Json(u)) }
        Err(e) => { error!(err = %e, "create user failed"); Err(JsonApiError::from(e)) }
    }
}

#[utoipa::path(
    get, path = "/users", tag = "users",
    params(PageQuery),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Paged<models::user::Model>>, JsonApiError> {
    let opts = q.pagination();
    let (skip, take) = opts.normalize();
    let (rows, total) = user_service::list_users(&state.db, tenant_id, opts).await?;
    Ok(Json(Paged::new(rows, total, skip, take)))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::user::Model>, StatusCode> {
    match user_service::get_user(&state.db, id).await {
        Ok(Some(u)) if u.tenant_id == tenant_id && u.deleted_at.is_none() => Ok(Json(u)),
        Ok(_) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    put, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = crate::openapi::UpdateUserRequest,
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
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<models::user::Model>, JsonApiError> {
    // Tenant scope check before touching the row
    match user_service::get_user(&state.db, id).await? {
        Some(u) if u.tenant_id == tenant_id => {}
        _ => return Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("user not found".into()))),
    }
    match user_service::update_user_name(&state.db, id, &input.name).await {
        Ok(u) => { info!(user_id = %u.id, "updated user"); Ok(Json(u)) }
        Err(e) => Err(JsonApiError::from(e)),
    }
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
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
    match user_service::get_user(&state.db, id).await {
        Ok(Some(u)) if u.tenant_id == tenant_id && u.deleted_at.is_none() => {}
        Ok(_) => return StatusCode::NOT_FOUND,
        Err(e) => { error!(err = %e, "delete user lookup failed"); return StatusCode::INTERNAL_SERVER_ERROR }
    }
    match user_service::soft_delete_user(&state.db, id).await {
        Ok(()) => { info!(user_id = %id, "deleted user"); StatusCode::NO_CONTENT }
        Err(e) => { error!(err = %e, "delete user failed"); StatusCode::INTERNAL_SERVER_ERROR }
    }
}
