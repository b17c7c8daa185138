use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use axum::Router;
use serde_json::json;

use union_portal::auth::{auth_router, AuthState, SmsSender};
use union_portal::extraction::DocumentExtractor;
use union_portal::unions::{union_router, PortalState, UnionRegistry};

use crate::infra::AppState;

pub(crate) fn portal_routes<S, R, X>(
    auth: AuthState<S, R>,
    portal: PortalState<R, X>,
) -> Router
where
    S: SmsSender + 'static,
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    auth_router(auth)
        .merge(union_router(portal))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
