use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::course;
use crate::errors;
use crate::user;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_CANCELLED: &str = "cancelled";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub cohort: Option<String>,
    pub status: String,
    pub enrolled_at: DateTimeWithTimeZone,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Course,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
            Relation::Course => Entity::belongs_to(course::Entity).from(Column::CourseId).to(course::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_status(status: &str) -> Result<(), errors::ModelError> {
    match status {
        STATUS_ACTIVE | STATUS_CANCELLED => Ok(()),
        other => Err(errors::ModelError::Validation(format!("unknown enrollment status: {}", other))),
    }
}

pub async fn create(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    cohort: Option<String>,
) -> Result<Model, errors::ModelError> {
    if let Some(c) = cohort.as_deref() {
        if c.trim().is_empty() { return Err(errors::ModelError::Validation("cohort must not be blank".into())); }
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        user_id: Set(user_id),
        course_id: Set(course_id),
        cohort: Set(cohort),
        status: Set(STATUS_ACTIVE.into()),
        enrolled_at: Set(now),
        cancelled_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Cancel keeps the row for history and stamps `cancelled_at`.
pub async fn cancel(db: &DatabaseConnection, id: Uuid) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id).one(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?.ok_or_else(|| errors::ModelError::Validation("enrollment not found".into()))?.into();
    let now: DateTimeWithTimeZone = Utc::now().into();
    found.status = Set(STATUS_CANCELLED.into());
    found.cancelled_at = Set(Some(now));
    found.updated_at = Set(now);
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
