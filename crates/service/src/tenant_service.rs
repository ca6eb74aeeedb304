use uuid::Uuid;
use sea_orm::{DatabaseConnection, EntityTrait};

use models::{tenant, tenant_settings};
use crate::errors::ServiceError;

/// Create a new tenant.
pub async fn create_tenant(db: &DatabaseConnection, name: &str) -> Result<tenant::Model, ServiceError> {
    let created = tenant::create(db, name).await?;
    Ok(created)
}

/// Get a tenant by id.
pub async fn get_tenant(db: &DatabaseConnection, id: Uuid) -> Result<Option<tenant::Model>, ServiceError> {
    let found = tenant::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Get the settings row for a tenant, if configured.
pub async fn get_settings(db: &DatabaseConnection, tenant_id: Uuid) -> Result<Option<tenant_settings::Model>, ServiceError> {
    let found = tenant_settings::find_by_tenant(db, tenant_id).await?;
    Ok(found)
}

/// Create or replace the settings row for a tenant.
pub async fn upsert_settings(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    upload_policies: serde_json::Value,
    storage_backend: &str,
) -> Result<tenant_settings::Model, ServiceError> {
    let exists = tenant::Entity::find_by_id(tenant_id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    if exists.is_none() {
        return Err(ServiceError::not_found("tenant"));
    }
    let saved = tenant_settings::upsert(db, tenant_id, upload_policies, storage_backend).await?;
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn tenant_settings_roundtrip() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let t = create_tenant(&db, &format!("svc_tenant_{}", Uuid::new_v4())).await?;
        assert!(get_settings(&db, t.id).await?.is_none());

        let policies = serde_json::json!({
            "lesson": { "max_size_bytes": 1024, "allowed_mime_types": ["application/pdf"] }
        });
        let s = upsert_settings(&db, t.id, policies, "local").await?;
        assert_eq!(s.tenant_id, t.id);

        let found = get_settings(&db, t.id).await?.unwrap();
        assert_eq!(found.id, s.id);

        // Settings for an unknown tenant are rejected
        let err = upsert_settings(&db, Uuid::new_v4(), serde_json::json!({}), "local").await;
        assert!(matches!(err, Err(ServiceError::NotFound(_))));

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }
}
