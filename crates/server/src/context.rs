use axum::{extract::{Request, State}, http::StatusCode, middleware::Next, response::Response};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub const TENANT_HEADER: &str = "x-tenant-id";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub uploads_root: String,
}

/// Tenant id resolved from the request; injected as an extension by
/// `require_tenant_header`.
#[derive(Clone, Copy, Debug)]
pub struct TenantCtx(pub Uuid);

/// 全局中间件：除健康检查、文档与预检外，校验 X-Tenant-Id 请求头
/// 缺失或非法的租户头一律返回 400；通过后以扩展注入租户上下文
pub async fn require_tenant_header(
    State(_state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path();
    let method = req.method().clone();

    // 白名单：健康检查、租户自助创建、Swagger 文档、CORS 预检
    if path == "/health"
        || (path == "/tenants" && method == axum::http::Method::POST)
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let raw = req
        .headers()
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok());

    let Some(raw) = raw else {
        tracing::warn!(path = %path, "missing {} header", TENANT_HEADER);
        return Err(StatusCode::BAD_REQUEST);
    };

    match Uuid::parse_str(raw) {
        Ok(tenant_id) => {
            req.extensions_mut().insert(TenantCtx(tenant_id));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "malformed tenant id header");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
