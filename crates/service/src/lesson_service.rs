use std::collections::HashSet;

use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, Set};

use models::lesson;
use crate::{alias, errors::ServiceError, module_service};

/// Generate an alias unique among the lessons of one module.
async fn next_free_alias(db: &DatabaseConnection, module_id: Uuid, title: &str) -> Result<String, ServiceError> {
    use sea_orm::{QueryFilter, QuerySelect, ColumnTrait};
    let base = alias::slugify(title);
    let taken: Vec<String> = lesson::Entity::find()
        .filter(lesson::Column::ModuleId.eq(module_id))
        .filter(lesson::Column::Alias.starts_with(base.clone()))
        .select_only()
        .column(lesson::Column::Alias)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let taken: HashSet<String> = taken.into_iter().collect();
    Ok(alias::disambiguate(&base, |c| taken.contains(c)))
}

/// Create a lesson under a module; the course id is derived from the module.
pub async fn create_lesson(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    module_id: Uuid,
    title: &str,
    position: i32,
    content: Option<String>,
    pass_score: Option<i32>,
) -> Result<lesson::Model, ServiceError> {
    let parent = module_service::get_module(db, tenant_id, module_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("module"))?;
    let alias = next_free_alias(db, module_id, title).await?;
    let created = lesson::create(db, tenant_id, parent.course_id, module_id, title, &alias, position, content, pass_score).await?;
    Ok(created)
}

/// Get a lesson by id within a tenant.
pub async fn get_lesson(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<Option<lesson::Model>, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    let found = lesson::Entity::find_by_id(id)
        .filter(lesson::Column::TenantId.eq(tenant_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// List a module's lessons ordered by position.
pub async fn list_lessons_by_module(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    module_id: Uuid,
) -> Result<Vec<lesson::Model>, ServiceError> {
    use sea_orm::{QueryFilter, QueryOrder, ColumnTrait};
    module_service::get_module(db, tenant_id, module_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("module"))?;
    let rows = lesson::Entity::find()
        .filter(lesson::Column::ModuleId.eq(module_id))
        .order_by_asc(lesson::Column::Position)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Count the lessons of a course; feeds course-track totals.
pub async fn count_lessons_in_course(db: &DatabaseConnection, course_id: Uuid) -> Result<u64, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait, PaginatorTrait};
    lesson::Entity::find()
        .filter(lesson::Column::CourseId.eq(course_id))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Update lesson fields, including the resubmission flag and pass threshold.
#[allow(clippy::too_many_arguments)]
pub async fn update_lesson(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    id: Uuid,
    title: Option<&str>,
    position: Option<i32>,
    content: Option<String>,
    pass_score: Option<i32>,
    allow_resubmission: Option<bool>,
) -> Result<lesson::Model, ServiceError> {
    let existing = get_lesson(db, tenant_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("lesson"))?;
    if let Some(t) = title {
        if t.trim().is_empty() {
            return Err(ServiceError::Validation("title required".into()));
        }
    }
    if let Some(p) = position {
        if p < 0 {
            return Err(ServiceError::Validation("position must be >= 0".into()));
        }
    }
    if let Some(score) = pass_score {
        if !(0..=100).contains(&score) {
            return Err(ServiceError::Validation("pass_score must be within 0..=100".into()));
        }
    }
    let mut am: lesson::ActiveModel = existing.into();
    if let Some(t) = title { am.title = Set(t.to_string()); }
    if let Some(p) = position { am.position = Set(p); }
    if let Some(c) = content { am.content = Set(Some(c)); }
    if pass_score.is_some() { am.pass_score = Set(pass_score); }
    if let Some(allow) = allow_resubmission { am.allow_resubmission = Set(allow); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a lesson.
pub async fn delete_lesson(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<bool, ServiceError> {
    if get_lesson(db, tenant_id, id).await?.is_none() {
        return Ok(false);
    }
    lesson::hard_delete(db, id).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::tenant;
    use crate::{course_service, module_service, test_support::get_db};

    #[tokio::test]
    async fn lesson_crud_within_module() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let t = tenant::create(&db, &format!("svc_lesson_tenant_{}", Uuid::new_v4())).await?;
        let c = course_service::create_course(&db, t.id, "Lesson Host", None, None, None).await?;
        let m = module_service::create_module(&db, t.id, c.id, "Unit", 0).await?;

        let l = create_lesson(&db, t.id, m.id, "Variables", 0, Some("body".into()), Some(70)).await?;
        assert_eq!(l.course_id, c.id);
        assert_eq!(l.alias, "variables");
        assert!(!l.allow_resubmission);

        // Same title within the module gets a suffixed alias
        let l2 = create_lesson(&db, t.id, m.id, "Variables", 1, None, None).await?;
        assert_eq!(l2.alias, "variables-2");

        assert_eq!(count_lessons_in_course(&db, c.id).await?, 2);

        let updated = update_lesson(&db, t.id, l.id, None, None, None, None, Some(true)).await?;
        assert!(updated.allow_resubmission);

        let bad_score = update_lesson(&db, t.id, l.id, None, None, None, Some(150), None).await;
        assert!(matches!(bad_score, Err(ServiceError::Validation(_))));

        assert!(delete_lesson(&db, t.id, l2.id).await?);
        let listed = list_lessons_by_module(&db, t.id, m.id).await?;
        assert_eq!(listed.len(), 1);

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }
}
