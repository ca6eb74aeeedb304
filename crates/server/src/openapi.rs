use chrono::{DateTime, FixedOffset};
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct CreateTenantRequest { pub name: String }

#[derive(utoipa::ToSchema)]
pub struct UpsertSettingsRequest {
    /// Map from upload category to `{ max_size_bytes, allowed_mime_types }`
    pub upload_policies: serde_json::Value,
    pub storage_backend: String,
}

#[derive(utoipa::ToSchema)]
pub struct CreateUserRequest { pub email: String, pub name: String }

#[derive(utoipa::ToSchema)]
pub struct UpdateUserRequest { pub name: String }

#[derive(utoipa::ToSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
}

#[derive(utoipa::ToSchema)]
pub struct CreateModuleRequest { pub title: String, pub position: i32 }

#[derive(utoipa::ToSchema)]
pub struct UpdateModuleRequest { pub title: Option<String>, pub position: Option<i32> }

#[derive(utoipa::ToSchema)]
pub struct CreateLessonRequest {
    pub title: String,
    pub position: i32,
    pub content: Option<String>,
    pub pass_score: Option<i32>,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub position: Option<i32>,
    pub content: Option<String>,
    pub pass_score: Option<i32>,
    pub allow_resubmission: Option<bool>,
}

#[derive(utoipa::ToSchema)]
pub struct CreateEnrollmentRequest {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub cohort: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateEnrollmentRequest { pub status: Option<String>, pub cohort: Option<String> }

#[derive(utoipa::ToSchema)]
pub struct CourseTrackRequest {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: Option<String>,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub ended_at: Option<DateTime<FixedOffset>>,
    pub lessons_total: Option<i32>,
    pub lessons_completed: Option<i32>,
    pub certificate_issued: Option<bool>,
    pub certificate_issued_at: Option<DateTime<FixedOffset>>,
}

#[derive(utoipa::ToSchema)]
pub struct LessonTrackRequest {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub status: Option<String>,
    pub score: Option<i32>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::tenants::create,
        crate::routes::tenants::get_settings,
        crate::routes::tenants::put_settings,
        crate::routes::users::create,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::courses::create,
        crate::routes::courses::list,
        crate::routes::courses::get,
        crate::routes::courses::update,
        crate::routes::courses::delete,
        crate::routes::modules::create,
        crate::routes::modules::list,
        crate::routes::modules::update,
        crate::routes::modules::delete,
        crate::routes::lessons::create,
        crate::routes::lessons::list,
        crate::routes::lessons::get,
        crate::routes::lessons::update,
        crate::routes::lessons::delete,
        crate::routes::enrollments::create,
        crate::routes::enrollments::list,
        crate::routes::enrollments::get,
        crate::routes::enrollments::update,
        crate::routes::enrollments::delete,
        crate::routes::tracks::put_course_track,
        crate::routes::tracks::get_course_track,
        crate::routes::tracks::put_lesson_track,
        crate::routes::reports::courses,
        crate::routes::reports::lessons,
        crate::routes::files::upload,
        crate::routes::files::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CreateTenantRequest,
            UpsertSettingsRequest,
            CreateUserRequest,
            UpdateUserRequest,
            CreateCourseRequest,
            UpdateCourseRequest,
            CreateModuleRequest,
            UpdateModuleRequest,
            CreateLessonRequest,
            UpdateLessonRequest,
            CreateEnrollmentRequest,
            UpdateEnrollmentRequest,
            CourseTrackRequest,
            LessonTrackRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "tenants"),
        (name = "users"),
        (name = "courses"),
        (name = "modules"),
        (name = "lessons"),
        (name = "enrollments"),
        (name = "tracks"),
        (name = "reports"),
        (name = "files")
    )
)]
pub struct ApiDoc;
