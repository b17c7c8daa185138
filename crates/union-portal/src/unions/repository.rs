use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{AuditStatus, FinancialSnapshot, OwnerId, UnionId, UnionRecord};
use super::lifecycle;

/// Registry abstraction so the service module can be exercised in isolation.
/// Uniqueness of `code` and one-union-per-owner are enforced behind this
/// boundary.
pub trait UnionRegistry: Send + Sync {
    fn insert(&self, record: UnionRecord) -> Result<UnionRecord, RegistryError>;
    fn update(&self, record: UnionRecord) -> Result<(), RegistryError>;
    fn fetch(&self, id: UnionId) -> Result<Option<UnionRecord>, RegistryError>;
    fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<UnionRecord>, RegistryError>;
    fn list(&self) -> Result<Vec<UnionRecord>, RegistryError>;
}

/// Error enumeration for registry failures.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("union code already registered")]
    DuplicateCode,
    #[error("a union is already registered for this user")]
    DuplicateOwner,
    #[error("union not found")]
    NotFound,
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Roster row exposed to the admin panel.
#[derive(Debug, Clone, Serialize)]
pub struct UnionSummaryView {
    pub id: UnionId,
    pub name: String,
    pub code: String,
    #[serde(rename = "headOfUnion")]
    pub head_of_union: String,
    pub region: String,
    pub registration_status: &'static str,
    pub audit_status: &'static str,
    pub submitted_at: DateTime<Utc>,
    pub awaiting_decision: bool,
}

impl From<&UnionRecord> for UnionSummaryView {
    fn from(record: &UnionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            code: record.code.clone(),
            head_of_union: record.head_of_union.clone(),
            region: record.region.clone(),
            registration_status: record.registration_status.label(),
            audit_status: record.audit_status.label(),
            submitted_at: record.submitted_at,
            awaiting_decision: lifecycle::decision_open(record),
        }
    }
}

/// Payload of the registrant-facing audit result endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AuditResultView {
    pub name: String,
    pub code: String,
    #[serde(rename = "headOfUnion")]
    pub head_of_union: String,
    pub audit_status: AuditStatus,
    pub financial_data: Option<FinancialSnapshot>,
}

impl From<&UnionRecord> for AuditResultView {
    fn from(record: &UnionRecord) -> Self {
        Self {
            name: record.name.clone(),
            code: record.code.clone(),
            head_of_union: record.head_of_union.clone(),
            audit_status: record.audit_status,
            financial_data: record.financial_data,
        }
    }
}
