use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::lesson;
use crate::user;

pub const STATUS_IN_PROGRESS: &str = "inProgress";
pub const STATUS_COMPLETED: &str = "completed";

/// Per-user progress for a lesson; one row per (user, lesson). Test
/// submissions land here as score/passed plus the attempts counter.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson_track")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub lesson_id: Uuid,
    pub status: String,
    pub score: Option<i32>,
    pub passed: Option<bool>,
    pub attempts: i32,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Lesson,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
            Relation::Lesson => Entity::belongs_to(lesson::Entity).from(Column::LessonId).to(lesson::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_status(status: &str) -> Result<(), errors::ModelError> {
    match status {
        STATUS_IN_PROGRESS | STATUS_COMPLETED => Ok(()),
        other => Err(errors::ModelError::Validation(format!("unknown lesson track status: {}", other))),
    }
}

pub async fn find_by_user_lesson(db: &DatabaseConnection, user_id: Uuid, lesson_id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::LessonId.eq(lesson_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// First submission for a (user, lesson) pair; starts with one attempt.
#[allow(clippy::too_many_arguments)]
pub async fn create_first_attempt(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    lesson_id: Uuid,
    status: &str,
    score: Option<i32>,
    passed: Option<bool>,
) -> Result<Model, errors::ModelError> {
    validate_status(status)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let completed_at = (status == STATUS_COMPLETED).then_some(now);
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        user_id: Set(user_id),
        course_id: Set(course_id),
        lesson_id: Set(lesson_id),
        status: Set(status.to_string()),
        score: Set(score),
        passed: Set(passed),
        attempts: Set(1),
        completed_at: Set(completed_at),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
