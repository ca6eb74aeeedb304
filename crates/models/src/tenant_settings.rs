use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::tenant;

/// Per-tenant configuration row. `upload_policies` is a JSON map from upload
/// category to `{ max_size_bytes, allowed_mime_types }`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenant_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub upload_policies: Json,
    pub storage_backend: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Tenant,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Tenant => Entity::belongs_to(tenant::Entity).from(Column::TenantId).to(tenant::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_tenant(db: &DatabaseConnection, tenant_id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    Entity::find()
        .filter(Column::TenantId.eq(tenant_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Insert or replace the settings row for a tenant.
pub async fn upsert(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    upload_policies: Json,
    storage_backend: &str,
) -> Result<Model, errors::ModelError> {
    match storage_backend {
        "local" | "cloud" => {}
        other => return Err(errors::ModelError::Validation(format!("unknown storage backend: {}", other))),
    }
    let now = Utc::now().into();
    match find_by_tenant(db, tenant_id).await? {
        Some(existing) => {
            let mut am: ActiveModel = existing.into();
            am.upload_policies = Set(upload_policies);
            am.storage_backend = Set(storage_backend.to_string());
            am.updated_at = Set(now);
            am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
        }
        None => {
            let am = ActiveModel {
                id: Set(Uuid::new_v4()),
                tenant_id: Set(tenant_id),
                upload_policies: Set(upload_policies),
                storage_backend: Set(storage_backend.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
        }
    }
}
