use axum::{extract::{Query, State}, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use common::types::Paged;
use service::report_service::{self, CourseReportRow, LessonReportRow, ReportFilter};

use crate::context::{ServerState, TenantCtx};
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ReportQuery {
    pub course_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub cohort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

impl ReportQuery {
    fn split(self) -> (ReportFilter, service::pagination::Pagination) {
        let opts = service::pagination::Pagination::from_query(self.page, self.limit, self.offset);
        let filter = ReportFilter {
            course_id: self.course_id,
            lesson_id: self.lesson_id,
            cohort: self.cohort,
        };
        (filter, opts)
    }
}

#[utoipa::path(
    get, path = "/reports/courses", tag = "reports",
    params(ReportQuery),
    responses((status = 200, description = "Report OK"))
)]
pub async fn courses(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Paged<CourseReportRow>>, JsonApiError> {
    let (filter, opts) = q.split();
    let (skip, take) = opts.normalize();
    let (rows, total) = report_service::course_report(&state.db, tenant_id, filter, opts).await?;
    Ok(Json(Paged::new(rows, total, skip, take)))
}

#[utoipa::path(
    get, path = "/reports/lessons", tag = "reports",
    params(ReportQuery),
    responses((status = 200, description = "Report OK"))
)]
pub async fn lessons(
    State(state): State<ServerState>,
    Extension(TenantCtx(tenant_id)): Extension<TenantCtx>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Paged<LessonReportRow>>, JsonApiError> {
    let (filter, opts) = q.split();
    let (skip, take) = opts.normalize();
    let (rows, total) = report_service::lesson_report(&state.db, tenant_id, filter, opts).await?;
    Ok(Json(Paged::new(rows, total, skip, take)))
}
