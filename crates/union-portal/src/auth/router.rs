use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::unions::domain::OwnerId;
use crate::unions::lifecycle::PortalView;
use crate::unions::repository::UnionRegistry;

use super::identity::Credentials;
use super::otp::{OtpError, OtpService, SmsSender};
use super::session::{ActorRole, SessionGate};

/// State shared by the authentication endpoints.
pub struct AuthState<S, R> {
    pub otp: Arc<OtpService<S>>,
    pub gate: Arc<SessionGate>,
    pub registry: Arc<R>,
}

impl<S, R> Clone for AuthState<S, R> {
    fn clone(&self) -> Self {
        Self {
            otp: self.otp.clone(),
            gate: self.gate.clone(),
            registry: self.registry.clone(),
        }
    }
}

/// Router builder exposing the login and logout endpoints.
pub fn auth_router<S, R>(state: AuthState<S, R>) -> Router
where
    S: SmsSender + 'static,
    R: UnionRegistry + 'static,
{
    Router::new()
        .route("/api/v1/auth/send-code", post(send_code_handler::<S, R>))
        .route(
            "/api/v1/auth/verify-code",
            post(verify_code_handler::<S, R>),
        )
        .route("/api/v1/auth/logout", post(logout_handler::<S, R>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyRequest {
    #[serde(flatten)]
    pub(crate) credentials: Credentials,
    pub(crate) code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyResponse {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
    pub(crate) role: ActorRole,
    pub(crate) route: PortalView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) registry_warning: Option<String>,
}

pub(crate) async fn send_code_handler<S, R>(
    State(state): State<AuthState<S, R>>,
    axum::Json(credentials): axum::Json<Credentials>,
) -> Response
where
    S: SmsSender + 'static,
    R: UnionRegistry + 'static,
{
    match state.otp.send_code(&credentials, Utc::now()) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "message": "code sent" })),
        )
            .into_response(),
        Err(error) => otp_error_response(error),
    }
}

pub(crate) async fn verify_code_handler<S, R>(
    State(state): State<AuthState<S, R>>,
    axum::Json(request): axum::Json<VerifyRequest>,
) -> Response
where
    S: SmsSender + 'static,
    R: UnionRegistry + 'static,
{
    if let Err(error) = state
        .otp
        .verify_code(&request.credentials, &request.code, Utc::now())
    {
        return otp_error_response(error);
    }

    let session = state.gate.establish(&request.credentials, Utc::now());

    let (route, registry_warning) = match session.subject.role {
        ActorRole::Admin => (PortalView::AdminPanel, None),
        ActorRole::Union => {
            let owner = OwnerId(session.subject.national_id.clone());
            match state.registry.find_by_owner(&owner) {
                Ok(Some(record)) => {
                    state.gate.attach_union(&session.access_token, record.id);
                    (PortalView::Dashboard, None)
                }
                Ok(None) => (PortalView::Registration, None),
                // fail open: registration is always safe to offer
                Err(error) => (PortalView::Registration, Some(error.to_string())),
            }
        }
    };

    let response = VerifyResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        role: session.subject.role,
        route,
        registry_warning,
    };
    (StatusCode::OK, axum::Json(response)).into_response()
}

pub(crate) async fn logout_handler<S, R>(
    State(state): State<AuthState<S, R>>,
    headers: HeaderMap,
) -> Response
where
    S: SmsSender + 'static,
    R: UnionRegistry + 'static,
{
    match state.gate.authorize(&headers) {
        Ok(session) => {
            state.gate.terminate(&session.access_token);
            (
                StatusCode::OK,
                axum::Json(json!({ "message": "logged out" })),
            )
                .into_response()
        }
        Err(error) => (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

fn otp_error_response(error: OtpError) -> Response {
    let status = match &error {
        OtpError::Credential(_) => StatusCode::UNPROCESSABLE_ENTITY,
        OtpError::ResendCooldown { .. } => StatusCode::TOO_MANY_REQUESTS,
        OtpError::InvalidCode => StatusCode::BAD_REQUEST,
        OtpError::Delivery(_) => StatusCode::BAD_GATEWAY,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}
