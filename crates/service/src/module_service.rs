use std::collections::HashSet;

use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, Set};

use models::module;
use crate::{alias, course_service, errors::ServiceError};

/// Generate an alias unique among the modules of one course.
async fn next_free_alias(db: &DatabaseConnection, course_id: Uuid, title: &str) -> Result<String, ServiceError> {
    use sea_orm::{QueryFilter, QuerySelect, ColumnTrait};
    let base = alias::slugify(title);
    let taken: Vec<String> = module::Entity::find()
        .filter(module::Column::CourseId.eq(course_id))
        .filter(module::Column::Alias.starts_with(base.clone()))
        .select_only()
        .column(module::Column::Alias)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let taken: HashSet<String> = taken.into_iter().collect();
    Ok(alias::disambiguate(&base, |c| taken.contains(c)))
}

/// Create a module under a course.
pub async fn create_module(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    course_id: Uuid,
    title: &str,
    position: i32,
) -> Result<module::Model, ServiceError> {
    course_service::get_course(db, tenant_id, course_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("course"))?;
    let alias = next_free_alias(db, course_id, title).await?;
    let created = module::create(db, tenant_id, course_id, title, &alias, position).await?;
    Ok(created)
}

/// Get a module by id within a tenant.
pub async fn get_module(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<Option<module::Model>, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    let found = module::Entity::find_by_id(id)
        .filter(module::Column::TenantId.eq(tenant_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// List a course's modules ordered by position.
pub async fn list_modules_by_course(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    course_id: Uuid,
) -> Result<Vec<module::Model>, ServiceError> {
    use sea_orm::{QueryFilter, QueryOrder, ColumnTrait};
    course_service::get_course(db, tenant_id, course_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("course"))?;
    let rows = module::Entity::find()
        .filter(module::Column::CourseId.eq(course_id))
        .order_by_asc(module::Column::Position)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Update a module's title and/or position. The alias is stable.
pub async fn update_module(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    id: Uuid,
    title: Option<&str>,
    position: Option<i32>,
) -> Result<module::Model, ServiceError> {
    let existing = get_module(db, tenant_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("module"))?;
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
    let mut am: module::ActiveModel = existing.into();
    if let Some(t) = title { am.title = Set(t.to_string()); }
    if let Some(p) = position { am.position = Set(p); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a module (and, via FK cascade, its lessons).
pub async fn delete_module(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<bool, ServiceError> {
    if get_module(db, tenant_id, id).await?.is_none() {
        return Ok(false);
    }
    module::hard_delete(db, id).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::tenant;
    use crate::{course_service, test_support::get_db};

    #[tokio::test]
    async fn module_crud_and_ordering() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let t = tenant::create(&db, &format!("svc_module_tenant_{}", Uuid::new_v4())).await?;
        let c = course_service::create_course(&db, t.id, "Module Host", None, None, None).await?;

        let m2 = create_module(&db, t.id, c.id, "Second", 1).await?;
        let m1 = create_module(&db, t.id, c.id, "First", 0).await?;

        let listed = list_modules_by_course(&db, t.id, c.id).await?;
        assert_eq!(listed.iter().map(|m| m.id).collect::<Vec<_>>(), vec![m1.id, m2.id]);

        let moved = update_module(&db, t.id, m1.id, None, Some(5)).await?;
        assert_eq!(moved.position, 5);

        // Unknown course rejected
        let err = create_module(&db, t.id, Uuid::new_v4(), "Orphan", 0).await;
        assert!(matches!(err, Err(ServiceError::NotFound(_))));

        assert!(delete_module(&db, t.id, m2.id).await?);
        assert!(!delete_module(&db, t.id, m2.id).await?);

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }
}
