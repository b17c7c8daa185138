use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::extraction::ExtractedFinancials;
use crate::unions::domain::OwnerId;
use crate::unions::repository::UnionRegistry;
use crate::unions::router::{
    decision_handler, export_handler, extract_handler, financial_data_handler, list_handler,
    my_union_handler, register_handler, ExtractRequest, FinancialDataRequest,
};
use crate::unions::service::RegistrationDecision;

#[tokio::test]
async fn register_requires_a_session() {
    let (state, _) = build_state(None);

    let response = register_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        HeaderMap::new(),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_admin_sessions() {
    let (state, _) = build_state(None);
    let admin = admin_session(&state);

    let response = register_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&admin.access_token),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn register_creates_the_record_and_links_the_session() {
    let (state, _) = build_state(None);
    let session = union_session(&state);

    let response = register_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&session.access_token),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("headOfUnion"), Some(&json!("R. Ahmadi")));
    assert_eq!(payload.get("registration_status"), Some(&json!("pending")));

    let refreshed = state
        .gate
        .resolve(&session.access_token)
        .expect("session survives");
    assert!(refreshed.union.is_some());
}

#[tokio::test]
async fn my_union_routes_to_registration_when_absent() {
    let (state, _) = build_state(None);
    let session = union_session(&state);

    let response = my_union_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&session.access_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("views"), Some(&json!(["registration"])));
}

#[tokio::test]
async fn my_union_reports_views_and_actions() {
    let (state, _) = build_state(None);
    let session = union_session(&state);

    register_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&session.access_token),
        axum::Json(submission()),
    )
    .await;

    let response = my_union_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&session.access_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("views"), Some(&json!(["dashboard"])));
    assert_eq!(payload.get("actions"), Some(&json!([])));
}

#[tokio::test]
async fn decision_flow_is_admin_only_and_follows_the_lifecycle() {
    let (state, _) = build_state(None);
    let union = union_session(&state);
    let admin = admin_session(&state);

    let created = register_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&union.access_token),
        axum::Json(submission()),
    )
    .await;
    let created = read_json_body(created).await;
    let union_id = created
        .get("id")
        .and_then(serde_json::Value::as_u64)
        .expect("id assigned");

    // a union session cannot decide
    let forbidden = decision_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&union.access_token),
        Path(union_id),
        axum::Json(RegistrationDecision::Approve),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // a blank rejection comment is refused
    let blank = decision_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&admin.access_token),
        Path(union_id),
        axum::Json(RegistrationDecision::Reject {
            comment: "  ".to_string(),
        }),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let approved = decision_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&admin.access_token),
        Path(union_id),
        axum::Json(RegistrationDecision::Approve),
    )
    .await;
    assert_eq!(approved.status(), StatusCode::OK);
    let payload = read_json_body(approved).await;
    assert_eq!(payload.get("registration_status"), Some(&json!("approved")));

    // terminal once decided
    let again = decision_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&admin.access_token),
        Path(union_id),
        axum::Json(RegistrationDecision::Approve),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn financial_data_is_gated_on_approval() {
    let (state, _) = build_state(None);
    let union = union_session(&state);
    let admin = admin_session(&state);

    let created = register_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&union.access_token),
        axum::Json(submission()),
    )
    .await;
    let created = read_json_body(created).await;
    let union_id = created
        .get("id")
        .and_then(serde_json::Value::as_u64)
        .expect("id assigned");

    let early = financial_data_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&union.access_token),
        axum::Json(FinancialDataRequest {
            financial_data: financial(6_000_000_000, 1_000_000_000, 10, false),
            documents: documents(),
        }),
    )
    .await;
    assert_eq!(early.status(), StatusCode::FORBIDDEN);

    decision_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&admin.access_token),
        Path(union_id),
        axum::Json(RegistrationDecision::Approve),
    )
    .await;

    let submitted = financial_data_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&union.access_token),
        axum::Json(FinancialDataRequest {
            financial_data: financial(6_000_000_000, 1_000_000_000, 10, false),
            documents: documents(),
        }),
    )
    .await;
    assert_eq!(submitted.status(), StatusCode::OK);
    let payload = read_json_body(submitted).await;
    assert_eq!(payload.get("audit_status"), Some(&json!("required")));
}

#[tokio::test]
async fn roster_and_export_are_admin_surfaces() {
    let (state, _) = build_state(None);
    let union = union_session(&state);
    let admin = admin_session(&state);

    register_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&union.access_token),
        axum::Json(submission()),
    )
    .await;

    let forbidden = list_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&union.access_token),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let listed = list_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&admin.access_token),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let payload = read_json_body(listed).await;
    let rows = payload.as_array().expect("array of rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("awaiting_decision"), Some(&json!(true)));

    let exported = export_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&admin.access_token),
    )
    .await;
    assert_eq!(exported.status(), StatusCode::OK);
    assert_eq!(
        exported
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/csv")
    );
    let body = axum::body::to_bytes(exported.into_body(), 64 * 1024)
        .await
        .expect("csv body");
    let text = String::from_utf8(body.to_vec()).expect("utf8 csv");
    assert!(text.starts_with("name,code,headOfUnion"));
    assert!(text.contains("UN-1024"));
}

#[tokio::test]
async fn eligibility_endpoint_surfaces_divergence() {
    let (state, registry) = build_state(None);
    let union = union_session(&state);
    let admin = admin_session(&state);

    let created = register_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&union.access_token),
        axum::Json(submission()),
    )
    .await;
    let created = read_json_body(created).await;
    let union_id = created
        .get("id")
        .and_then(serde_json::Value::as_u64)
        .expect("id assigned");

    decision_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&admin.access_token),
        Path(union_id),
        axum::Json(RegistrationDecision::Approve),
    )
    .await;
    financial_data_handler::<MemoryRegistry, StaticExtractor>(
        State(state.clone()),
        bearer_headers(&union.access_token),
        axum::Json(FinancialDataRequest {
            financial_data: financial(6_000_000_000, 1_000_000_000, 10, false),
            documents: Vec::new(),
        }),
    )
    .await;

    // knock the stored status out of line with the figures
    let mut tampered = registry
        .find_by_owner(&OwnerId("0084575948".to_string()))
        .expect("find")
        .expect("stored");
    tampered.audit_status = crate::unions::domain::AuditStatus::NotRequired;
    registry.update(tampered).expect("update");

    let response = crate::unions::router::eligibility_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&union.access_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("audit_required"), Some(&json!(false)));
    assert_eq!(payload.get("diverges"), Some(&json!(true)));
    assert_eq!(
        payload.get("local_determination"),
        Some(&json!("required"))
    );
}

#[tokio::test]
async fn extraction_errors_direct_the_caller_to_manual_entry() {
    let (state, _) = build_state(None);
    let union = union_session(&state);

    let response = extract_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&union.access_token),
        axum::Json(ExtractRequest {
            documents: documents(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert!(payload.get("fallback").is_some());
}

#[tokio::test]
async fn extraction_output_is_tagged_unverified() {
    let (state, _) = build_state(Some(ExtractedFinancials {
        annual_revenue: Some(6_000_000_000),
        total_revenue: Some(1_000_000_000),
        member_count: Some(10),
    }));
    let union = union_session(&state);

    let response = extract_handler::<MemoryRegistry, StaticExtractor>(
        State(state),
        bearer_headers(&union.access_token),
        axum::Json(ExtractRequest {
            documents: documents(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload
            .get("annualRevenue")
            .and_then(|field| field.get("provenance")),
        Some(&json!("extracted"))
    );
    assert_eq!(
        payload
            .get("totalAssets")
            .and_then(|field| field.get("value"))
            .and_then(serde_json::Value::as_u64),
        Some(1_000_000_000)
    );
    assert!(payload
        .get("governmentSupport")
        .map(serde_json::Value::is_null)
        .unwrap_or(true));
}

#[tokio::test]
async fn routes_compose_into_a_router() {
    let (state, _) = build_state(None);
    let session = union_session(&state);
    let router = routed(state);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/unions")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .header(
                    axum::http::header::AUTHORIZATION,
                    format!("Bearer {}", session.access_token),
                )
                .body(axum::body::Body::from(
                    serde_json::to_vec(&submission()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
}
