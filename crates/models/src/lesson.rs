use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::module;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub course_id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub alias: String,
    pub position: i32,
    pub content: Option<String>,
    /// Test pass threshold; `None` means the lesson carries no test.
    pub pass_score: Option<i32>,
    pub allow_resubmission: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Module,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Module => Entity::belongs_to(module::Entity).from(Column::ModuleId).to(module::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    course_id: Uuid,
    module_id: Uuid,
    title: &str,
    alias: &str,
    position: i32,
    content: Option<String>,
    pass_score: Option<i32>,
) -> Result<Model, errors::ModelError> {
    if title.trim().is_empty() { return Err(errors::ModelError::Validation("title required".into())); }
    if position < 0 { return Err(errors::ModelError::Validation("position must be >= 0".into())); }
    if let Some(score) = pass_score {
        if !(0..=100).contains(&score) {
            return Err(errors::ModelError::Validation("pass_score must be within 0..=100".into()));
        }
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        course_id: Set(course_id),
        module_id: Set(module_id),
        title: Set(title.to_string()),
        alias: Set(alias.to_string()),
        position: Set(position),
        content: Set(content),
        pass_score: Set(pass_score),
        allow_resubmission: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
