use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::auth::session::{ActorRole, AdminCredentials, SessionContext, SessionGate};
use crate::auth::Credentials;
use crate::extraction::{DocumentExtractor, ExtractedFinancials, ExtractionError};
use crate::unions::domain::{
    AuditStatus, DocumentCategory, DocumentDescriptor, FinancialSnapshot, OwnerId,
    RegistrationStatus, UnionId, UnionRecord, UnionSubmission,
};
use crate::unions::eligibility::EligibilityConfig;
use crate::unions::repository::{RegistryError, UnionRegistry};
use crate::unions::router::{union_router, PortalState};
use crate::unions::service::UnionRegistryService;

pub(super) fn submission() -> UnionSubmission {
    UnionSubmission {
        name: "Bakers Guild of the Northern District".to_string(),
        head_of_union: "R. Ahmadi".to_string(),
        region: "Tehran".to_string(),
        economic_code: "1234567890".to_string(),
        fiscal_year: "1404".to_string(),
        code: "UN-1024".to_string(),
    }
}

pub(super) fn owner() -> OwnerId {
    OwnerId("0084575948".to_string())
}

pub(super) fn financial(
    annual_revenue: u64,
    total_assets: u64,
    member_count: u32,
    government_support: bool,
) -> FinancialSnapshot {
    FinancialSnapshot {
        annual_revenue,
        total_assets,
        member_count,
        government_support,
    }
}

pub(super) fn documents() -> Vec<DocumentDescriptor> {
    vec![DocumentDescriptor {
        name: "balance-1404.pdf".to_string(),
        category: DocumentCategory::BalanceSheet,
        storage_key: "uploads/un-1024/balance-1404.pdf".to_string(),
    }]
}

pub(super) fn record_with_status(
    registration_status: RegistrationStatus,
    audit_status: AuditStatus,
) -> UnionRecord {
    UnionRecord {
        id: UnionId(1),
        owner: owner(),
        name: "Bakers Guild of the Northern District".to_string(),
        head_of_union: "R. Ahmadi".to_string(),
        region: "Tehran".to_string(),
        economic_code: "1234567890".to_string(),
        fiscal_year: "1404".to_string(),
        phone_number: "09123456789".to_string(),
        code: "UN-1024".to_string(),
        registration_status,
        audit_status,
        submitted_at: Utc::now(),
        approved_at: None,
        rejected_at: None,
        rejection_reason: None,
        financial_data: None,
        documents: Vec::new(),
    }
}

pub(super) fn pending_record() -> UnionRecord {
    record_with_status(RegistrationStatus::Pending, AuditStatus::Pending)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRegistry {
    pub(super) records: Arc<Mutex<HashMap<UnionId, UnionRecord>>>,
}

impl UnionRegistry for MemoryRegistry {
    fn insert(&self, record: UnionRecord) -> Result<UnionRecord, RegistryError> {
        let mut guard = self.records.lock().expect("registry mutex poisoned");
        if guard.values().any(|existing| existing.code == record.code) {
            return Err(RegistryError::DuplicateCode);
        }
        if guard.values().any(|existing| existing.owner == record.owner) {
            return Err(RegistryError::DuplicateOwner);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: UnionRecord) -> Result<(), RegistryError> {
        let mut guard = self.records.lock().expect("registry mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RegistryError::NotFound);
        }
        guard.insert(record.id, record);
        Ok(())
    }

    fn fetch(&self, id: UnionId) -> Result<Option<UnionRecord>, RegistryError> {
        let guard = self.records.lock().expect("registry mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<UnionRecord>, RegistryError> {
        let guard = self.records.lock().expect("registry mutex poisoned");
        Ok(guard
            .values()
            .find(|record| &record.owner == owner)
            .cloned())
    }

    fn list(&self) -> Result<Vec<UnionRecord>, RegistryError> {
        let guard = self.records.lock().expect("registry mutex poisoned");
        let mut records: Vec<UnionRecord> = guard.values().cloned().collect();
        records.sort_by_key(|record| record.id.0);
        Ok(records)
    }
}

pub(super) struct UnavailableRegistry;

impl UnionRegistry for UnavailableRegistry {
    fn insert(&self, _record: UnionRecord) -> Result<UnionRecord, RegistryError> {
        Err(RegistryError::Unavailable("registry offline".to_string()))
    }

    fn update(&self, _record: UnionRecord) -> Result<(), RegistryError> {
        Err(RegistryError::Unavailable("registry offline".to_string()))
    }

    fn fetch(&self, _id: UnionId) -> Result<Option<UnionRecord>, RegistryError> {
        Err(RegistryError::Unavailable("registry offline".to_string()))
    }

    fn find_by_owner(&self, _owner: &OwnerId) -> Result<Option<UnionRecord>, RegistryError> {
        Err(RegistryError::Unavailable("registry offline".to_string()))
    }

    fn list(&self) -> Result<Vec<UnionRecord>, RegistryError> {
        Err(RegistryError::Unavailable("registry offline".to_string()))
    }
}

pub(super) struct StaticExtractor {
    pub(super) figures: Option<ExtractedFinancials>,
}

impl DocumentExtractor for StaticExtractor {
    fn extract(
        &self,
        _documents: &[DocumentDescriptor],
    ) -> Result<ExtractedFinancials, ExtractionError> {
        match self.figures {
            Some(figures) => Ok(figures),
            None => Err(ExtractionError::Transport(
                "extraction collaborator offline".to_string(),
            )),
        }
    }
}

pub(super) fn build_service() -> (
    Arc<UnionRegistryService<MemoryRegistry>>,
    Arc<MemoryRegistry>,
) {
    let registry = Arc::new(MemoryRegistry::default());
    let service = Arc::new(UnionRegistryService::new(
        registry.clone(),
        EligibilityConfig::default(),
    ));
    (service, registry)
}

pub(super) fn build_state(
    figures: Option<ExtractedFinancials>,
) -> (
    PortalState<MemoryRegistry, StaticExtractor>,
    Arc<MemoryRegistry>,
) {
    let (service, registry) = build_service();
    let state = PortalState {
        service,
        gate: Arc::new(SessionGate::new(AdminCredentials::default())),
        extractor: Arc::new(StaticExtractor { figures }),
    };
    (state, registry)
}

pub(super) fn union_session(
    state: &PortalState<MemoryRegistry, StaticExtractor>,
) -> SessionContext {
    let session = state.gate.establish(
        &Credentials {
            phone_number: "09123456789".to_string(),
            national_id: "0084575948".to_string(),
        },
        Utc::now(),
    );
    assert_eq!(session.subject.role, ActorRole::Union);
    session
}

pub(super) fn admin_session(
    state: &PortalState<MemoryRegistry, StaticExtractor>,
) -> SessionContext {
    let session = state.gate.establish(
        &Credentials {
            phone_number: "09000000000".to_string(),
            national_id: "0000000000".to_string(),
        },
        Utc::now(),
    );
    assert_eq!(session.subject.role, ActorRole::Admin);
    session
}

pub(super) fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
    );
    headers
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn routed(state: PortalState<MemoryRegistry, StaticExtractor>) -> axum::Router {
    union_router(state)
}
