use std::collections::HashSet;

use uuid::Uuid;
use serde::Serialize;
use sea_orm::DatabaseConnection;

use models::{course, course_track, enrollment, lesson, lesson_track};
use crate::{errors::ServiceError, pagination::Pagination};

/// One report row per course.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReportRow {
    pub course_id: Uuid,
    pub title: String,
    pub enrolled: u64,
    pub active: u64,
    pub completed: u64,
    pub avg_completion_percent: f64,
}

/// One report row per lesson.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonReportRow {
    pub lesson_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub learners: u64,
    pub attempts: u64,
    pub completed: u64,
    pub passed: u64,
    pub avg_score: f64,
}

/// Filters shared by both report endpoints.
#[derive(Clone, Debug, Default)]
pub struct ReportFilter {
    pub course_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub cohort: Option<String>,
}

/// User ids enrolled in a course under a cohort; used to narrow track rows
/// when a cohort filter is present.
async fn cohort_user_ids(
    db: &DatabaseConnection,
    course_id: Uuid,
    cohort: &str,
) -> Result<HashSet<Uuid>, ServiceError> {
    use sea_orm::{QueryFilter, QuerySelect, ColumnTrait};
    let ids: Vec<Uuid> = enrollment::Entity::find()
        .filter(enrollment::Column::CourseId.eq(course_id))
        .filter(enrollment::Column::Cohort.eq(cohort))
        .select_only()
        .column(enrollment::Column::UserId)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(ids.into_iter().collect())
}

/// Course-level aggregation: enrollment counts and completion statistics,
/// one row per course page entry.
pub async fn course_report(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    filter: ReportFilter,
    opts: Pagination,
) -> Result<(Vec<CourseReportRow>, u64), ServiceError> {
    use sea_orm::{QueryFilter, QueryOrder, QuerySelect, ColumnTrait, PaginatorTrait};

    let (skip, take) = opts.normalize();
    let mut scope = course::Entity::find()
        .filter(course::Column::TenantId.eq(tenant_id))
        .filter(course::Column::DeletedAt.is_null());
    if let Some(cid) = filter.course_id {
        scope = scope.filter(course::Column::Id.eq(cid));
    }
    let total = scope.clone().count(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let courses = scope
        .order_by_asc(course::Column::Title)
        .offset(skip)
        .limit(take)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut rows = Vec::with_capacity(courses.len());
    for c in courses {
        let cohort_users = match filter.cohort.as_deref() {
            Some(cohort) => Some(cohort_user_ids(db, c.id, cohort).await?),
            None => None,
        };

        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(c.id))
            .all(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let in_cohort = |user_id: Uuid| cohort_users.as_ref().map_or(true, |s| s.contains(&user_id));

        let enrolled = enrollments.iter().filter(|e| in_cohort(e.user_id)).count() as u64;
        let active = enrollments
            .iter()
            .filter(|e| in_cohort(e.user_id) && e.status == enrollment::STATUS_ACTIVE)
            .count() as u64;

        let tracks = course_track::Entity::find()
            .filter(course_track::Column::CourseId.eq(c.id))
            .all(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let tracks: Vec<_> = tracks.into_iter().filter(|t| in_cohort(t.user_id)).collect();

        let completed = tracks.iter().filter(|t| t.status == course_track::STATUS_COMPLETED).count() as u64;
        let avg_completion_percent = if tracks.is_empty() {
            0.0
        } else {
            tracks.iter().map(|t| t.completion_percent).sum::<f64>() / tracks.len() as f64
        };

        rows.push(CourseReportRow {
            course_id: c.id,
            title: c.title,
            enrolled,
            active,
            completed,
            avg_completion_percent,
        });
    }
    Ok((rows, total))
}

/// Lesson-level aggregation: attempts, completion and pass counts, and the
/// average score over submissions that carried one.
pub async fn lesson_report(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    filter: ReportFilter,
    opts: Pagination,
) -> Result<(Vec<LessonReportRow>, u64), ServiceError> {
    use sea_orm::{QueryFilter, QueryOrder, QuerySelect, ColumnTrait, PaginatorTrait};

    let (skip, take) = opts.normalize();
    let mut scope = lesson::Entity::find().filter(lesson::Column::TenantId.eq(tenant_id));
    if let Some(cid) = filter.course_id {
        scope = scope.filter(lesson::Column::CourseId.eq(cid));
    }
    if let Some(lid) = filter.lesson_id {
        scope = scope.filter(lesson::Column::Id.eq(lid));
    }
    let total = scope.clone().count(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let lessons = scope
        .order_by_asc(lesson::Column::Position)
        .offset(skip)
        .limit(take)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut rows = Vec::with_capacity(lessons.len());
    for l in lessons {
        let cohort_users = match filter.cohort.as_deref() {
            Some(cohort) => Some(cohort_user_ids(db, l.course_id, cohort).await?),
            None => None,
        };
        let in_cohort = |user_id: Uuid| cohort_users.as_ref().map_or(true, |s| s.contains(&user_id));

        let tracks = lesson_track::Entity::find()
            .filter(lesson_track::Column::LessonId.eq(l.id))
            .all(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let tracks: Vec<_> = tracks.into_iter().filter(|t| in_cohort(t.user_id)).collect();

        let learners = tracks.len() as u64;
        let attempts = tracks.iter().map(|t| t.attempts.max(0) as u64).sum();
        let completed = tracks.iter().filter(|t| t.status == lesson_track::STATUS_COMPLETED).count() as u64;
        let passed = tracks.iter().filter(|t| t.passed == Some(true)).count() as u64;
        let scores: Vec<i32> = tracks.iter().filter_map(|t| t.score).collect();
        let avg_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(|s| f64::from(*s)).sum::<f64>() / scores.len() as f64
        };

        rows.push(LessonReportRow {
            lesson_id: l.id,
            course_id: l.course_id,
            title: l.title,
            learners,
            attempts,
            completed,
            passed,
            avg_score,
        });
    }
    Ok((rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::tenant;
    use sea_orm::EntityTrait;
    use crate::{course_service, enrollment_service, lesson_service, module_service, test_support::get_db, track_service, user_service};
    use crate::track_service::LessonTrackSubmit;

    #[tokio::test]
    async fn course_and_lesson_reports_aggregate() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let t = tenant::create(&db, &format!("svc_report_tenant_{}", Uuid::new_v4())).await?;
        let c = course_service::create_course(&db, t.id, "Reported Course", None, None, None).await?;
        let m = module_service::create_module(&db, t.id, c.id, "Unit", 0).await?;
        let l = lesson_service::create_lesson(&db, t.id, m.id, "Quiz", 0, None, Some(60)).await?;

        let u1 = user_service::create_user(&db, t.id, &format!("rep1_{}@example.com", Uuid::new_v4()), "A").await?;
        let u2 = user_service::create_user(&db, t.id, &format!("rep2_{}@example.com", Uuid::new_v4()), "B").await?;
        enrollment_service::enroll(&db, t.id, u1.id, c.id, Some("spring".into())).await?;
        enrollment_service::enroll(&db, t.id, u2.id, c.id, Some("fall".into())).await?;

        track_service::upsert_lesson_track(&db, t.id, u1.id, l.id, LessonTrackSubmit { status: None, score: Some(80) }).await?;
        track_service::upsert_lesson_track(&db, t.id, u2.id, l.id, LessonTrackSubmit { status: None, score: Some(40) }).await?;

        // Course report, unfiltered: both learners visible
        let filter = ReportFilter { course_id: Some(c.id), ..Default::default() };
        let (rows, total) = course_report(&db, t.id, filter, Pagination::default()).await?;
        assert_eq!(total, 1);
        let row = &rows[0];
        assert_eq!(row.enrolled, 2);
        assert_eq!(row.active, 2);
        assert_eq!(row.completed, 2);
        assert!((row.avg_completion_percent - 100.0).abs() < f64::EPSILON);

        // Cohort filter narrows to one learner
        let filter = ReportFilter { course_id: Some(c.id), cohort: Some("spring".into()), ..Default::default() };
        let (rows, _) = course_report(&db, t.id, filter, Pagination::default()).await?;
        assert_eq!(rows[0].enrolled, 1);

        // Lesson report: one pass, one fail, both completed
        let filter = ReportFilter { course_id: Some(c.id), ..Default::default() };
        let (rows, total) = lesson_report(&db, t.id, filter, Pagination::default()).await?;
        assert_eq!(total, 1);
        let row = &rows[0];
        assert_eq!(row.learners, 2);
        assert_eq!(row.attempts, 2);
        assert_eq!(row.completed, 2);
        assert_eq!(row.passed, 1);
        assert!((row.avg_score - 60.0).abs() < f64::EPSILON);

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }
}
