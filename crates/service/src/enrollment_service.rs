use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, Set};

use models::{enrollment, user};
use crate::{course_service, errors::ServiceError, lesson_service, pagination::Pagination};

/// Optional filters for enrollment listings.
#[derive(Clone, Debug, Default)]
pub struct EnrollmentFilter {
    pub user_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub cohort: Option<String>,
    pub status: Option<String>,
}

/// Enroll a user into a course. Rejects unknown users/courses and duplicate
/// active enrollments; seeds the course-track record.
pub async fn enroll(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    cohort: Option<String>,
) -> Result<enrollment::Model, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};

    let learner = user::Entity::find_by_id(user_id)
        .filter(user::Column::TenantId.eq(tenant_id))
        .filter(user::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if learner.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    course_service::get_course(db, tenant_id, course_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("course"))?;

    let duplicate = enrollment::Entity::find()
        .filter(enrollment::Column::UserId.eq(user_id))
        .filter(enrollment::Column::CourseId.eq(course_id))
        .filter(enrollment::Column::Status.eq(enrollment::STATUS_ACTIVE))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if duplicate.is_some() {
        return Err(ServiceError::Conflict("user already has an active enrollment for this course".into()));
    }

    let created = enrollment::create(db, tenant_id, user_id, course_id, cohort).await?;

    // Seed the progress record so tracking and reports see the learner
    if models::course_track::find_by_user_course(db, user_id, course_id).await?.is_none() {
        let lessons_total = lesson_service::count_lessons_in_course(db, course_id).await? as i32;
        models::course_track::create_initial(db, tenant_id, user_id, course_id, lessons_total).await?;
    }

    Ok(created)
}

/// Get an enrollment by id within a tenant.
pub async fn get_enrollment(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<Option<enrollment::Model>, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    let found = enrollment::Entity::find_by_id(id)
        .filter(enrollment::Column::TenantId.eq(tenant_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// List enrollments with filters and pagination.
pub async fn list_enrollments(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    filter: EnrollmentFilter,
    opts: Pagination,
) -> Result<(Vec<enrollment::Model>, u64), ServiceError> {
    use sea_orm::{QueryFilter, QueryOrder, QuerySelect, ColumnTrait, PaginatorTrait};
    if let Some(s) = filter.status.as_deref() {
        enrollment::validate_status(s)?;
    }
    let (skip, take) = opts.normalize();
    let mut scope = enrollment::Entity::find().filter(enrollment::Column::TenantId.eq(tenant_id));
    if let Some(uid) = filter.user_id {
        scope = scope.filter(enrollment::Column::UserId.eq(uid));
    }
    if let Some(cid) = filter.course_id {
        scope = scope.filter(enrollment::Column::CourseId.eq(cid));
    }
    if let Some(cohort) = filter.cohort.as_deref() {
        scope = scope.filter(enrollment::Column::Cohort.eq(cohort));
    }
    if let Some(s) = filter.status.as_deref() {
        scope = scope.filter(enrollment::Column::Status.eq(s));
    }
    let total = scope.clone().count(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = scope
        .order_by_asc(enrollment::Column::EnrolledAt)
        .offset(skip)
        .limit(take)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((rows, total))
}

/// Update enrollment status and/or cohort. Moving to `cancelled` stamps
/// `cancelled_at`; moving back to `active` clears it.
pub async fn update_enrollment(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    id: Uuid,
    status: Option<&str>,
    cohort: Option<String>,
) -> Result<enrollment::Model, ServiceError> {
    let existing = get_enrollment(db, tenant_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("enrollment"))?;
    if let Some(s) = status {
        enrollment::validate_status(s)?;
    }
    let now = Utc::now().into();
    let mut am: enrollment::ActiveModel = existing.into();
    if let Some(s) = status {
        am.status = Set(s.to_string());
        match s {
            enrollment::STATUS_CANCELLED => am.cancelled_at = Set(Some(now)),
            _ => am.cancelled_at = Set(None),
        }
    }
    if let Some(c) = cohort {
        if c.trim().is_empty() {
            return Err(ServiceError::Validation("cohort must not be blank".into()));
        }
        am.cohort = Set(Some(c));
    }
    am.updated_at = Set(now);
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Cancel an enrollment; keeps the row for history. Returns false when the
/// enrollment does not exist in the tenant.
pub async fn cancel_enrollment(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<bool, ServiceError> {
    let Some(existing) = get_enrollment(db, tenant_id, id).await? else {
        return Ok(false);
    };
    if existing.status == enrollment::STATUS_CANCELLED {
        return Err(ServiceError::Conflict("enrollment already cancelled".into()));
    }
    enrollment::cancel(db, id).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::tenant;
    use crate::{course_service, test_support::get_db, user_service};

    #[tokio::test]
    async fn enroll_checks_and_duplicate_conflict() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let t = tenant::create(&db, &format!("svc_enroll_tenant_{}", Uuid::new_v4())).await?;
        let u = user_service::create_user(&db, t.id, &format!("enroll_{}@example.com", Uuid::new_v4()), "Learner").await?;
        let c = course_service::create_course(&db, t.id, "Enrollable", None, None, None).await?;

        // Unknown user / course rejected
        assert!(matches!(enroll(&db, t.id, Uuid::new_v4(), c.id, None).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(enroll(&db, t.id, u.id, Uuid::new_v4(), None).await, Err(ServiceError::NotFound(_))));

        let e = enroll(&db, t.id, u.id, c.id, Some("spring".into())).await?;
        assert_eq!(e.status, enrollment::STATUS_ACTIVE);

        // Progress record seeded alongside
        assert!(models::course_track::find_by_user_course(&db, u.id, c.id).await?.is_some());

        // Second active enrollment conflicts
        let dup = enroll(&db, t.id, u.id, c.id, None).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        // Cancel, then re-enrolling is allowed again
        assert!(cancel_enrollment(&db, t.id, e.id).await?);
        let again = cancel_enrollment(&db, t.id, e.id).await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));
        let e2 = enroll(&db, t.id, u.id, c.id, None).await?;
        assert_ne!(e2.id, e.id);

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_enrollments_filters_and_pagination() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let t = tenant::create(&db, &format!("svc_enroll_list_{}", Uuid::new_v4())).await?;
        let c = course_service::create_course(&db, t.id, "Cohorted", None, None, None).await?;
        for i in 0..3 {
            let u = user_service::create_user(&db, t.id, &format!("cohort_{}_{}@example.com", i, Uuid::new_v4()), "L").await?;
            let cohort = if i < 2 { "spring" } else { "fall" };
            enroll(&db, t.id, u.id, c.id, Some(cohort.into())).await?;
        }

        let filter = EnrollmentFilter { course_id: Some(c.id), cohort: Some("spring".into()), ..Default::default() };
        let (rows, total) = list_enrollments(&db, t.id, filter, Pagination::default()).await?;
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 2);

        let filter = EnrollmentFilter { course_id: Some(c.id), ..Default::default() };
        let (rows, total) = list_enrollments(&db, t.id, filter, Pagination { page: 2, limit: 2, offset: None }).await?;
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 1);

        // Bad status filter is a validation error
        let filter = EnrollmentFilter { status: Some("paused".into()), ..Default::default() };
        let err = list_enrollments(&db, t.id, filter, Pagination::default()).await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }
}
