use uuid::Uuid;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, Set};
use tracing::info;

use models::{course_track, lesson_track, user};
use crate::{course_service, errors::ServiceError, lesson_service, validate};

/// Incoming course-track update; unset fields keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct CourseTrackUpdate {
    pub status: Option<String>,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub ended_at: Option<DateTime<FixedOffset>>,
    pub lessons_total: Option<i32>,
    pub lessons_completed: Option<i32>,
    pub certificate_issued: Option<bool>,
    pub certificate_issued_at: Option<DateTime<FixedOffset>>,
}

/// Incoming lesson-track submission.
#[derive(Clone, Debug, Default)]
pub struct LessonTrackSubmit {
    /// Defaults to `completed` when not provided.
    pub status: Option<String>,
    pub score: Option<i32>,
}

fn completion_percent(completed: i32, total: i32) -> f64 {
    if total > 0 {
        f64::from(completed) / f64::from(total) * 100.0
    } else {
        0.0
    }
}

async fn require_user(db: &DatabaseConnection, tenant_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    let found = user::Entity::find_by_id(user_id)
        .filter(user::Column::TenantId.eq(tenant_id))
        .filter(user::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if found.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    Ok(())
}

/// Get the progress record for a (user, course) pair.
pub async fn get_course_track(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<Option<course_track::Model>, ServiceError> {
    let found = course_track::find_by_user_course(db, user_id, course_id).await?;
    Ok(found.filter(|m| m.tenant_id == tenant_id))
}

/// Upsert the progress record for a (user, course) pair.
///
/// Validates the status enum, the started/ended range, the lesson counters,
/// and the certificate date (strictly after now and after the course end
/// date); recomputes the completion percentage from the merged counters.
pub async fn upsert_course_track(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    update: CourseTrackUpdate,
) -> Result<course_track::Model, ServiceError> {
    require_user(db, tenant_id, user_id).await?;
    let course = course_service::get_course(db, tenant_id, course_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("course"))?;

    if let Some(s) = update.status.as_deref() {
        course_track::validate_status(s)?;
    }

    let existing = match course_track::find_by_user_course(db, user_id, course_id).await? {
        Some(m) => m,
        None => {
            let lessons_total = lesson_service::count_lessons_in_course(db, course_id).await? as i32;
            course_track::create_initial(db, tenant_id, user_id, course_id, lessons_total).await?
        }
    };

    // Validate against the state as it will be after the merge
    let merged_started = update.started_at.or(existing.started_at);
    let merged_ended = update.ended_at.or(existing.ended_at);
    validate::validate_datetime_range(merged_started, merged_ended)?;

    let total = update.lessons_total.unwrap_or(existing.lessons_total);
    let completed = update.lessons_completed.unwrap_or(existing.lessons_completed);
    if total < 0 || completed < 0 {
        return Err(ServiceError::Validation("lesson counts must be >= 0".into()));
    }
    if completed > total {
        return Err(ServiceError::Validation("lessons_completed must not exceed lessons_total".into()));
    }

    let issuing = update.certificate_issued.unwrap_or(existing.certificate_issued);
    let merged_cert_date = update.certificate_issued_at.or(existing.certificate_issued_at);
    if let Some(cert_at) = update.certificate_issued_at {
        validate::validate_certificate_date(cert_at, Utc::now(), course.end_date)?;
    }
    if issuing && merged_cert_date.is_none() {
        return Err(ServiceError::Validation("certificate date required when issuing a certificate".into()));
    }

    let percent = completion_percent(completed, total);
    let status = match update.status {
        Some(s) => s,
        None if total > 0 && completed >= total => course_track::STATUS_COMPLETED.to_string(),
        None => existing.status.clone(),
    };

    let mut am: course_track::ActiveModel = existing.into();
    am.status = Set(status);
    am.started_at = Set(merged_started);
    am.ended_at = Set(merged_ended);
    am.lessons_total = Set(total);
    am.lessons_completed = Set(completed);
    am.completion_percent = Set(percent);
    if let Some(flag) = update.certificate_issued { am.certificate_issued = Set(flag); }
    if update.certificate_issued_at.is_some() { am.certificate_issued_at = Set(update.certificate_issued_at); }
    am.updated_at = Set(Utc::now().into());
    let saved = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(user_id = %user_id, course_id = %course_id, percent = saved.completion_percent, "course track updated");
    Ok(saved)
}

/// Record a lesson submission for a user. Completed lessons reject repeat
/// submissions unless the lesson allows resubmission; accepted repeats
/// increment the attempts counter. The course track counters are refreshed
/// afterwards.
pub async fn upsert_lesson_track(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    user_id: Uuid,
    lesson_id: Uuid,
    submit: LessonTrackSubmit,
) -> Result<lesson_track::Model, ServiceError> {
    require_user(db, tenant_id, user_id).await?;
    let lesson = lesson_service::get_lesson(db, tenant_id, lesson_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("lesson"))?;

    let status = submit.status.unwrap_or_else(|| lesson_track::STATUS_COMPLETED.to_string());
    lesson_track::validate_status(&status)?;
    if let Some(score) = submit.score {
        if !(0..=100).contains(&score) {
            return Err(ServiceError::Validation("score must be within 0..=100".into()));
        }
    }
    let passed = match (submit.score, lesson.pass_score) {
        (Some(score), Some(threshold)) => Some(score >= threshold),
        _ => None,
    };

    let saved = match lesson_track::find_by_user_lesson(db, user_id, lesson_id).await? {
        Some(existing) => {
            if existing.status == lesson_track::STATUS_COMPLETED && !lesson.allow_resubmission {
                return Err(ServiceError::Validation("lesson does not allow resubmission".into()));
            }
            let attempts = existing.attempts + 1;
            let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
            let completed_at = if status == lesson_track::STATUS_COMPLETED { Some(now) } else { existing.completed_at };
            let mut am: lesson_track::ActiveModel = existing.into();
            am.status = Set(status);
            am.score = Set(submit.score);
            am.passed = Set(passed);
            am.attempts = Set(attempts);
            am.completed_at = Set(completed_at);
            am.updated_at = Set(now);
            am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        }
        None => {
            lesson_track::create_first_attempt(
                db,
                tenant_id,
                user_id,
                lesson.course_id,
                lesson_id,
                &status,
                submit.score,
                passed,
            )
            .await?
        }
    };

    refresh_course_progress(db, tenant_id, user_id, lesson.course_id).await?;
    info!(user_id = %user_id, lesson_id = %lesson_id, attempts = saved.attempts, "lesson track updated");
    Ok(saved)
}

/// Recompute a course track's counters from the lesson-track rows.
pub async fn refresh_course_progress(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<course_track::Model, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait, PaginatorTrait};

    let total = lesson_service::count_lessons_in_course(db, course_id).await? as i32;
    let completed = lesson_track::Entity::find()
        .filter(lesson_track::Column::UserId.eq(user_id))
        .filter(lesson_track::Column::CourseId.eq(course_id))
        .filter(lesson_track::Column::Status.eq(lesson_track::STATUS_COMPLETED))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))? as i32;

    let existing = match course_track::find_by_user_course(db, user_id, course_id).await? {
        Some(m) => m,
        None => course_track::create_initial(db, tenant_id, user_id, course_id, total).await?,
    };

    let status = if total > 0 && completed >= total {
        course_track::STATUS_COMPLETED.to_string()
    } else if completed > 0 {
        course_track::STATUS_IN_PROGRESS.to_string()
    } else {
        existing.status.clone()
    };
    let started_at = existing.started_at.or_else(|| (completed > 0).then(|| Utc::now().into()));

    let mut am: course_track::ActiveModel = existing.into();
    am.lessons_total = Set(total);
    am.lessons_completed = Set(completed.min(total));
    am.completion_percent = Set(completion_percent(completed.min(total), total));
    am.status = Set(status);
    am.started_at = Set(started_at);
    am.updated_at = Set(Utc::now().into());
    let saved = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(saved)
}
