use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::session::{AccessError, ActorRole, SessionGate};
use crate::extraction::{DocumentExtractor, ExtractionError, FinancialDraft};

use super::domain::{
    DocumentDescriptor, FinancialSnapshot, OwnerId, UnionId, UnionRecord, UnionSubmission,
};
use super::lifecycle::{self, PortalView, TransitionError, UnionAction};
use super::report;
use super::repository::{RegistryError, UnionRegistry, UnionSummaryView};
use super::service::{RegistrationDecision, UnionRegistryService, UnionServiceError};

/// State shared by the union and document endpoints.
pub struct PortalState<R, X> {
    pub service: Arc<UnionRegistryService<R>>,
    pub gate: Arc<SessionGate>,
    pub extractor: Arc<X>,
}

impl<R, X> Clone for PortalState<R, X> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            gate: self.gate.clone(),
            extractor: self.extractor.clone(),
        }
    }
}

/// Router builder exposing registration, review, and assessment endpoints.
pub fn union_router<R, X>(state: PortalState<R, X>) -> Router
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    Router::new()
        .route(
            "/api/v1/unions",
            post(register_handler::<R, X>).get(list_handler::<R, X>),
        )
        .route("/api/v1/unions/my-union", get(my_union_handler::<R, X>))
        .route("/api/v1/unions/stats", get(stats_handler::<R, X>))
        .route("/api/v1/unions/export", get(export_handler::<R, X>))
        .route(
            "/api/v1/unions/:union_id/decision",
            post(decision_handler::<R, X>),
        )
        .route(
            "/api/v1/unions/financial-data",
            post(financial_data_handler::<R, X>),
        )
        .route(
            "/api/v1/unions/my-audit-result",
            get(audit_result_handler::<R, X>),
        )
        .route(
            "/api/v1/unions/my-eligibility",
            get(eligibility_handler::<R, X>),
        )
        .route(
            "/api/v1/documents/extract",
            post(extract_handler::<R, X>),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub(crate) struct MyUnionResponse {
    pub(crate) union: UnionRecord,
    pub(crate) views: Vec<PortalView>,
    pub(crate) actions: Vec<UnionAction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FinancialDataRequest {
    pub(crate) financial_data: FinancialSnapshot,
    #[serde(default)]
    pub(crate) documents: Vec<DocumentDescriptor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtractRequest {
    pub(crate) documents: Vec<DocumentDescriptor>,
}

pub(crate) async fn register_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
    axum::Json(submission): axum::Json<UnionSubmission>,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    let session = match state.gate.authorize_role(&headers, ActorRole::Union) {
        Ok(session) => session,
        Err(error) => return access_error_response(error),
    };

    let owner = OwnerId(session.subject.national_id.clone());
    match state
        .service
        .register(owner, &session.subject.phone_number, submission, Utc::now())
    {
        Ok(record) => {
            state.gate.attach_union(&session.access_token, record.id);
            (StatusCode::CREATED, axum::Json(record)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn my_union_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    let session = match state.gate.authorize_role(&headers, ActorRole::Union) {
        Ok(session) => session,
        Err(error) => return access_error_response(error),
    };

    let owner = OwnerId(session.subject.national_id.clone());
    match state.service.my_union(&owner) {
        Ok(Some(record)) => {
            let views = lifecycle::reachable_views(ActorRole::Union, Some(&record));
            let actions = lifecycle::enabled_actions(ActorRole::Union, Some(&record));
            (
                StatusCode::OK,
                axum::Json(MyUnionResponse {
                    union: record,
                    views,
                    actions,
                }),
            )
                .into_response()
        }
        // not-found is the routing signal towards registration
        Ok(None) => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "message": "no union registered for this user",
                "views": lifecycle::reachable_views(ActorRole::Union, None),
            })),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    if let Err(error) = state.gate.authorize_role(&headers, ActorRole::Admin) {
        return access_error_response(error);
    }

    match state.service.list_unions() {
        Ok(records) => {
            let rows: Vec<UnionSummaryView> = records.iter().map(UnionSummaryView::from).collect();
            (StatusCode::OK, axum::Json(rows)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn stats_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    if let Err(error) = state.gate.authorize_role(&headers, ActorRole::Admin) {
        return access_error_response(error);
    }

    match state.service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn export_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    if let Err(error) = state.gate.authorize_role(&headers, ActorRole::Admin) {
        return access_error_response(error);
    }

    let records = match state.service.list_unions() {
        Ok(records) => records,
        Err(error) => return service_error_response(error),
    };

    let mut body = Vec::new();
    if let Err(error) = report::write_roster_csv(&records, &mut body) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": error.to_string() })),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv")],
        body,
    )
        .into_response()
}

pub(crate) async fn decision_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
    Path(union_id): Path<u64>,
    axum::Json(decision): axum::Json<RegistrationDecision>,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    if let Err(error) = state.gate.authorize_role(&headers, ActorRole::Admin) {
        return access_error_response(error);
    }

    match state
        .service
        .decide(UnionId(union_id), decision, Utc::now())
    {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn financial_data_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<FinancialDataRequest>,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    let session = match state.gate.authorize_role(&headers, ActorRole::Union) {
        Ok(session) => session,
        Err(error) => return access_error_response(error),
    };

    let owner = OwnerId(session.subject.national_id.clone());
    match state
        .service
        .submit_financial_data(&owner, request.financial_data, request.documents)
    {
        Ok(record) => {
            state.gate.attach_union(&session.access_token, record.id);
            (StatusCode::OK, axum::Json(record)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn audit_result_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    let session = match state.gate.authorize_role(&headers, ActorRole::Union) {
        Ok(session) => session,
        Err(error) => return access_error_response(error),
    };

    let owner = OwnerId(session.subject.national_id.clone());
    match state.service.audit_result(&owner) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn eligibility_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    let session = match state.gate.authorize_role(&headers, ActorRole::Union) {
        Ok(session) => session,
        Err(error) => return access_error_response(error),
    };

    let owner = OwnerId(session.subject.national_id.clone());
    match state.service.eligibility_report(&owner) {
        Ok(Some(report)) => (StatusCode::OK, axum::Json(report)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "message": "financial data not available" })),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn extract_handler<R, X>(
    State(state): State<PortalState<R, X>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ExtractRequest>,
) -> Response
where
    R: UnionRegistry + 'static,
    X: DocumentExtractor + 'static,
{
    if let Err(error) = state.gate.authorize_role(&headers, ActorRole::Union) {
        return access_error_response(error);
    }

    let draft = state
        .extractor
        .extract(&request.documents)
        .and_then(FinancialDraft::from_extraction);

    match draft {
        Ok(draft) => (StatusCode::OK, axum::Json(draft)).into_response(),
        Err(error) => {
            let status = match &error {
                ExtractionError::NoUsableData => StatusCode::UNPROCESSABLE_ENTITY,
                ExtractionError::Transport(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                axum::Json(json!({
                    "error": error.to_string(),
                    "fallback": "enter the figures manually",
                })),
            )
                .into_response()
        }
    }
}

fn access_error_response(error: AccessError) -> Response {
    let status = match error {
        AccessError::MissingToken | AccessError::UnknownToken => StatusCode::UNAUTHORIZED,
        AccessError::Forbidden => StatusCode::FORBIDDEN,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

fn service_error_response(error: UnionServiceError) -> Response {
    let status = match &error {
        UnionServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        UnionServiceError::Transition(TransitionError::EmptyRejectionReason) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        UnionServiceError::Transition(TransitionError::AlreadyDecided { .. }) => {
            StatusCode::CONFLICT
        }
        UnionServiceError::Registry(RegistryError::DuplicateCode)
        | UnionServiceError::Registry(RegistryError::DuplicateOwner) => StatusCode::CONFLICT,
        UnionServiceError::Registry(RegistryError::NotFound)
        | UnionServiceError::NoFinancialData => StatusCode::NOT_FOUND,
        UnionServiceError::Registry(RegistryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        UnionServiceError::RegistrationNotApproved => StatusCode::FORBIDDEN,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}
