use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::tenant;

pub const STORAGE_LOCAL: &str = "local";
pub const STORAGE_CLOUD: &str = "cloud";

/// Uploaded file record. `owner_id` points at a course/module/lesson row
/// depending on `category`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub category: String,
    pub owner_id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage: String,
    pub path: String,
    pub created_at: DateTimeWithTimeZone,
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

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    category: &str,
    owner_id: Uuid,
    file_name: &str,
    mime_type: &str,
    size_bytes: i64,
    storage: &str,
    path: &str,
) -> Result<Model, errors::ModelError> {
    if file_name.trim().is_empty() { return Err(errors::ModelError::Validation("file name required".into())); }
    if size_bytes < 0 { return Err(errors::ModelError::Validation("size must be >= 0".into())); }
    match storage {
        STORAGE_LOCAL | STORAGE_CLOUD => {}
        other => return Err(errors::ModelError::Validation(format!("unknown storage: {}", other))),
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        category: Set(category.to_string()),
        owner_id: Set(owner_id),
        file_name: Set(file_name.to_string()),
        mime_type: Set(mime_type.to_string()),
        size_bytes: Set(size_bytes),
        storage: Set(storage.to_string()),
        path: Set(path.to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
