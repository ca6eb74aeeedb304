use axum::{
    routing::{get, post, put},
    Json, Router,
};
use axum::middleware;
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::pagination::Pagination;

use crate::context::{self, ServerState};
use crate::openapi;

pub mod tenants;
pub mod users;
pub mod courses;
pub mod modules;
pub mod lessons;
pub mod enrollments;
pub mod tracks;
pub mod reports;
pub mod files;

/// Common pagination query parameters. `offset` overrides the page index.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page, self.limit, self.offset)
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public health/docs plus the
/// tenant-scoped API, wrapped in the tenant-context middleware.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let api = Router::new()
        .route("/tenants", post(tenants::create))
        .route("/tenants/:id/settings", get(tenants::get_settings).put(tenants::put_settings))
        .route("/users", post(users::create).get(users::list))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/courses", post(courses::create).get(courses::list))
        .route("/courses/:id", get(courses::get).put(courses::update).delete(courses::delete))
        .route("/courses/:id/modules", get(modules::list).post(modules::create))
        .route("/modules/:id", put(modules::update).delete(modules::delete))
        .route("/modules/:id/lessons", get(lessons::list).post(lessons::create))
        .route("/lessons/:id", get(lessons::get).put(lessons::update).delete(lessons::delete))
        .route("/enrollments", post(enrollments::create).get(enrollments::list))
        .route("/enrollments/:id", get(enrollments::get).put(enrollments::update).delete(enrollments::delete))
        .route("/tracks/course", put(tracks::put_course_track).get(tracks::get_course_track))
        .route("/tracks/lesson", put(tracks::put_lesson_track))
        .route("/reports/courses", get(reports::courses))
        .route("/reports/lessons", get(reports::lessons))
        .route("/files", post(files::upload))
        .route("/files/:id", axum::routing::delete(files::delete));

    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .merge(api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            context::require_tenant_header,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
