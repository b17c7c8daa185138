use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the registry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnionId(pub u64);

/// National id of the registering actor; the registry keeps one union per owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

/// Lifecycle gate set by the admin decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }
}

/// Audit lifecycle, meaningful only once the registration is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pending,
    Required,
    NotRequired,
    Completed,
}

impl AuditStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AuditStatus::Pending => "pending",
            AuditStatus::Required => "required",
            AuditStatus::NotRequired => "not_required",
            AuditStatus::Completed => "completed",
        }
    }
}

/// Financial figures attached after approval; replaced wholesale on re-submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub annual_revenue: u64,
    pub total_assets: u64,
    pub member_count: u32,
    pub government_support: bool,
}

/// Categories accepted for supporting financial documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    BalanceSheet,
    ProfitLoss,
    CashFlow,
    Other,
}

/// Metadata for an uploaded document; the file body lives with the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub name: String,
    pub category: DocumentCategory,
    pub storage_key: String,
}

/// Registration form payload as submitted by the registrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionSubmission {
    pub name: String,
    pub head_of_union: String,
    pub region: String,
    pub economic_code: String,
    pub fiscal_year: String,
    pub code: String,
}

/// A registered union as held by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionRecord {
    pub id: UnionId,
    pub owner: OwnerId,
    pub name: String,
    #[serde(rename = "headOfUnion")]
    pub head_of_union: String,
    pub region: String,
    #[serde(rename = "economicCode")]
    pub economic_code: String,
    #[serde(rename = "fiscalYear")]
    pub fiscal_year: String,
    pub phone_number: String,
    pub code: String,
    pub registration_status: RegistrationStatus,
    pub audit_status: AuditStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_data: Option<FinancialSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentDescriptor>,
}
