use axum::{extract::{Path, State}, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use service::tenant_service;

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateTenantInput {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpsertSettingsInput {
    /// Map from upload category to `{ max_size_bytes, allowed_mime_types }`.
    pub upload_policies: serde_json::Value,
    #[serde(default = "default_backend")]
    pub storage_backend: String,
}

fn default_backend() -> String { "local".to_string() }

#[utoipa::path(
    post, path = "/tenants", tag = "tenants",
    request_body = crate::openapi::CreateTenantRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<CreateTenantInput>) -> Result<Json<models::tenant::Model>, JsonApiError> {
    match tenant_service::create_tenant(&state.db, &input.name).await {
        Ok(t) => { info!(tenant_id = %t.id, name = %t.name, "created tenant"); Ok(Json(t)) }
        Err(e) => Err(JsonApiError::from(e)),
    }
}

#[utoipa::path(
    get, path = "/tenants/{id}/settings", tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_settings(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::tenant_settings::Model>, JsonApiError> {
    if id != tenant_id {
        return Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("tenant not found".into())));
    }
    match tenant_service::get_settings(&state.db, tenant_id).await {
        Ok(Some(s)) => Ok(Json(s)),
        Ok(None) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("tenant settings not found".into()))),
        Err(e) => Err(JsonApiError::from(e)),
    }
}

#[utoipa::path(
    put, path = "/tenants/{id}/settings", tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant ID")),
    request_body = crate::openapi::UpsertSettingsRequest,
    responses(
        (status = 200, description = "Saved"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn put_settings(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpsertSettingsInput>,
) -> Result<Json<models::tenant_settings::Model>, JsonApiError> {
    if id != tenant_id {
        return Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("tenant not found".into())));
    }
    match tenant_service::upsert_settings(&state.db, tenant_id, input.upload_policies, &input.storage_backend).await {
        Ok(s) => { info!(tenant_id = %tenant_id, backend = %s.storage_backend, "tenant settings saved"); Ok(Json(s)) }
        Err(e) => Err(JsonApiError::from(e)),
    }
}
