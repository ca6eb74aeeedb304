use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::course;
use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "module")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub alias: String,
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Course,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Course => Entity::belongs_to(course::Entity).from(Column::CourseId).to(course::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    course_id: Uuid,
    title: &str,
    alias: &str,
    position: i32,
) -> Result<Model, errors::ModelError> {
    if title.trim().is_empty() { return Err(errors::ModelError::Validation("title required".into())); }
    if position < 0 { return Err(errors::ModelError::Validation("position must be >= 0".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        course_id: Set(course_id),
        title: Set(title.to_string()),
        alias: Set(alias.to_string()),
        position: Set(position),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
