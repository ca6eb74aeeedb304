use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::course;
use crate::errors;
use crate::user;

pub const STATUS_NOT_STARTED: &str = "notStarted";
pub const STATUS_IN_PROGRESS: &str = "inProgress";
pub const STATUS_COMPLETED: &str = "completed";

/// Per-user progress record for a course; one row per (user, course).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_track")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: String,
    pub started_at: Option<DateTimeWithTimeZone>,
    pub ended_at: Option<DateTimeWithTimeZone>,
    pub lessons_total: i32,
    pub lessons_completed: i32,
    pub completion_percent: f64,
    pub certificate_issued: bool,
    pub certificate_issued_at: Option<DateTimeWithTimeZone>,
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
        STATUS_NOT_STARTED | STATUS_IN_PROGRESS | STATUS_COMPLETED => Ok(()),
        other => Err(errors::ModelError::Validation(format!("unknown track status: {}", other))),
    }
}

pub async fn find_by_user_course(db: &DatabaseConnection, user_id: Uuid, course_id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::CourseId.eq(course_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Fresh track in `notStarted` state with zeroed counters.
pub async fn create_initial(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    lessons_total: i32,
) -> Result<Model, errors::ModelError> {
    if lessons_total < 0 { return Err(errors::ModelError::Validation("lessons_total must be >= 0".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        user_id: Set(user_id),
        course_id: Set(course_id),
        status: Set(STATUS_NOT_STARTED.into()),
        started_at: Set(None),
        ended_at: Set(None),
        lessons_total: Set(lessons_total),
        lessons_completed: Set(0),
        completion_percent: Set(0.0),
        certificate_issued: Set(false),
        certificate_issued_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
