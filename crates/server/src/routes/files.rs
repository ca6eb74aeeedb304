use axum::{extract::{Multipart, Path, State}, http::StatusCode, Extension, Json};
use tracing::{info, error};
use uuid::Uuid;

use service::upload_service::{self, UploadCategory};

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;

fn bad_request(detail: String) -> JsonApiError {
    JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(detail))
}

/// Multipart upload: `category` and `owner_id` text fields plus a `file`
/// part. Policy limits come from the tenant settings.
#[utoipa::path(
    post, path = "/files", tag = "files",
    responses(
        (status = 200, description = "Stored"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Owner Not Found"),
        (status = 501, description = "Backend Not Implemented")
    )
)]
pub async fn upload(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    mut multipart: Multipart,
) -> Result<Json<models::media::Model>, JsonApiError> {
    let mut category: Option<UploadCategory> = None;
    let mut owner_id: Option<Uuid> = None;
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut bytes: Option<axum::body::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("category") => {
                let text = field.text().await.map_err(|e| bad_request(e.to_string()))?;
                category = Some(text.parse().map_err(JsonApiError::from)?);
            }
            Some("owner_id") => {
                let text = field.text().await.map_err(|e| bad_request(e.to_string()))?;
                let id = Uuid::parse_str(&text).map_err(|e| bad_request(format!("owner_id: {}", e)))?;
                owner_id = Some(id);
            }
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                mime_type = field.content_type().map(str::to_string);
                bytes = Some(field.bytes().await.map_err(|e| bad_request(e.to_string()))?);
            }
            _ => {}
        }
    }

    let category = category.ok_or_else(|| bad_request("category field required".into()))?;
    let owner_id = owner_id.ok_or_else(|| bad_request("owner_id field required".into()))?;
    let bytes = bytes.ok_or_else(|| bad_request("file part required".into()))?;
    let file_name = file_name.ok_or_else(|| bad_request("file name required".into()))?;
    let mime_type = mime_type.ok_or_else(|| bad_request("file content type required".into()))?;

    match upload_service::store_upload(
        &state.db,
        &state.uploads_root,
        tenant_id,
        category,
        owner_id,
        &file_name,
        &mime_type,
        &bytes,
    )
    .await
    {
        Ok(m) => { info!(media_id = %m.id, category = %m.category, size = m.size_bytes, "uploaded file"); Ok(Json(m)) }
        Err(e) => { error!(err = %e, "upload failed"); Err(JsonApiError::from(e)) }
    }
}

#[utoipa::path(
    delete, path = "/files/{id}", tag = "files",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 501, description = "Backend Not Implemented")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    match upload_service::delete_upload(&state.db, tenant_id, id).await {
        Ok(true) => { info!(media_id = %id, "deleted file"); Ok(StatusCode::NO_CONTENT) }
        Ok(false) => Ok(StatusCode::NOT_FOUND),
        Err(e) => Err(JsonApiError::from(e)),
    }
}
