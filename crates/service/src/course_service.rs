use std::collections::HashSet;

use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, Set};

use models::course;
use crate::{alias, errors::ServiceError, pagination::Pagination, validate};

/// Generate the tenant-unique alias for a course title.
async fn next_free_alias(db: &DatabaseConnection, tenant_id: Uuid, title: &str) -> Result<String, ServiceError> {
    use sea_orm::{QueryFilter, QuerySelect, ColumnTrait};
    let base = alias::slugify(title);
    let taken: Vec<String> = course::Entity::find()
        .filter(course::Column::TenantId.eq(tenant_id))
        .filter(course::Column::Alias.starts_with(base.clone()))
        .select_only()
        .column(course::Column::Alias)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let taken: HashSet<String> = taken.into_iter().collect();
    Ok(alias::disambiguate(&base, |c| taken.contains(c)))
}

/// Create a course; the alias is derived from the title and disambiguated
/// within the tenant.
pub async fn create_course(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    title: &str,
    description: Option<String>,
    start_date: Option<chrono::DateTime<chrono::FixedOffset>>,
    end_date: Option<chrono::DateTime<chrono::FixedOffset>>,
) -> Result<course::Model, ServiceError> {
    course::validate_title(title)?;
    validate::validate_datetime_range(start_date, end_date)?;
    let alias = next_free_alias(db, tenant_id, title).await?;
    let created = course::create(db, tenant_id, title, &alias, description, start_date, end_date).await?;
    Ok(created)
}

/// Get a course by id within a tenant; soft-deleted rows are invisible.
pub async fn get_course(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<Option<course::Model>, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    let found = course::Entity::find_by_id(id)
        .filter(course::Column::TenantId.eq(tenant_id))
        .filter(course::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// List courses under a tenant with an optional status filter.
pub async fn list_courses(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    status: Option<&str>,
    opts: Pagination,
) -> Result<(Vec<course::Model>, u64), ServiceError> {
    use sea_orm::{QueryFilter, QueryOrder, QuerySelect, ColumnTrait, PaginatorTrait};
    if let Some(s) = status {
        course::validate_status(s)?;
    }
    let (skip, take) = opts.normalize();
    let mut scope = course::Entity::find()
        .filter(course::Column::TenantId.eq(tenant_id))
        .filter(course::Column::DeletedAt.is_null());
    if let Some(s) = status {
        scope = scope.filter(course::Column::Status.eq(s));
    }
    let total = scope.clone().count(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = scope
        .order_by_asc(course::Column::CreatedAt)
        .offset(skip)
        .limit(take)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((rows, total))
}

/// Update a course. The alias is stable: retitling does not regenerate it.
#[allow(clippy::too_many_arguments)]
pub async fn update_course(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    id: Uuid,
    title: Option<&str>,
    description: Option<String>,
    status: Option<&str>,
    start_date: Option<chrono::DateTime<chrono::FixedOffset>>,
    end_date: Option<chrono::DateTime<chrono::FixedOffset>>,
) -> Result<course::Model, ServiceError> {
    let existing = get_course(db, tenant_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("course"))?;

    if let Some(t) = title {
        course::validate_title(t)?;
    }
    if let Some(s) = status {
        course::validate_status(s)?;
    }
    // Validate the range as it will be after the merge
    let merged_start = start_date.or(existing.start_date);
    let merged_end = end_date.or(existing.end_date);
    validate::validate_datetime_range(merged_start, merged_end)?;

    let mut am: course::ActiveModel = existing.into();
    if let Some(t) = title { am.title = Set(t.to_string()); }
    if let Some(d) = description { am.description = Set(Some(d)); }
    if let Some(s) = status { am.status = Set(s.to_string()); }
    if start_date.is_some() { am.start_date = Set(start_date); }
    if end_date.is_some() { am.end_date = Set(end_date); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Soft-delete a course; returns false when it does not exist in the tenant.
pub async fn delete_course(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<bool, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    let existing = course::Entity::find_by_id(id)
        .filter(course::Column::TenantId.eq(tenant_id))
        .filter(course::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(found) = existing else { return Ok(false) };
    let mut am: course::ActiveModel = found.into();
    let now = Utc::now().into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::tenant;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn course_alias_disambiguation() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let t = tenant::create(&db, &format!("svc_course_tenant_{}", Uuid::new_v4())).await?;

        let c1 = create_course(&db, t.id, "Intro to Rust", None, None, None).await?;
        let c2 = create_course(&db, t.id, "Intro to Rust", None, None, None).await?;
        let c3 = create_course(&db, t.id, "Intro to Rust", None, None, None).await?;
        assert_eq!(c1.alias, "intro-to-rust");
        assert_eq!(c2.alias, "intro-to-rust-2");
        assert_eq!(c3.alias, "intro-to-rust-3");

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn course_crud_and_date_validation() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let t = tenant::create(&db, &format!("svc_course_tenant_{}", Uuid::new_v4())).await?;

        let start = chrono::DateTime::parse_from_rfc3339("2024-09-01T00:00:00Z").unwrap();
        let end = chrono::DateTime::parse_from_rfc3339("2024-08-01T00:00:00Z").unwrap();
        let bad = create_course(&db, t.id, "Backwards", None, Some(start), Some(end)).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));

        let c = create_course(&db, t.id, "Ok Course", None, Some(end), Some(start)).await?;
        assert_eq!(c.status, course::STATUS_DRAFT);

        let updated = update_course(&db, t.id, c.id, None, None, Some(course::STATUS_PUBLISHED), None, None).await?;
        assert_eq!(updated.status, course::STATUS_PUBLISHED);
        // Alias untouched by updates
        assert_eq!(updated.alias, c.alias);

        assert!(delete_course(&db, t.id, c.id).await?);
        assert!(get_course(&db, t.id, c.id).await?.is_none());
        // Second delete sees nothing
        assert!(!delete_course(&db, t.id, c.id).await?);

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }
}
