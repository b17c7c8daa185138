mod config;
mod criteria;
mod determination;

pub use config::EligibilityConfig;
pub use determination::AuditDetermination;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{AuditStatus, FinancialSnapshot, UnionRecord};

/// Stateless evaluator applying the statutory thresholds to a snapshot.
///
/// The stored `audit_status` on a record remains the authoritative
/// determination; the criterion table produced here is a transparency
/// artifact recomputed from the same thresholds. When the two disagree the
/// report says so instead of reconciling them.
pub struct EligibilityEvaluator {
    config: EligibilityConfig,
}

impl EligibilityEvaluator {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    /// Ordered criterion table: revenue, assets, members, government support.
    pub fn breakdown(&self, snapshot: &FinancialSnapshot) -> Vec<CriterionAssessment> {
        criteria::assess_snapshot(snapshot, &self.config)
    }

    pub fn determine(&self, snapshot: &FinancialSnapshot) -> AuditDetermination {
        determination::determine(&self.breakdown(snapshot))
    }

    /// Record-level report; `None` while no financial data is on file, which
    /// callers render as "financial data not available".
    pub fn report(&self, record: &UnionRecord) -> Option<EligibilityReport> {
        let snapshot = record.financial_data.as_ref()?;
        let criteria = self.breakdown(snapshot);
        let local_determination = determination::determine(&criteria);
        let audit_required = record.audit_status == AuditStatus::Required;

        Some(EligibilityReport {
            audit_required,
            audit_status: record.audit_status,
            local_determination,
            diverges: local_determination.is_required() != audit_required,
            criteria,
        })
    }
}

/// The four statutory criteria, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    AnnualRevenue,
    TotalAssets,
    MemberCount,
    GovernmentSupport,
}

impl CriterionKind {
    pub const fn label(self) -> &'static str {
        match self {
            CriterionKind::AnnualRevenue => "Annual revenue",
            CriterionKind::TotalAssets => "Total assets",
            CriterionKind::MemberCount => "Member count",
            CriterionKind::GovernmentSupport => "Government support",
        }
    }
}

/// Value representation so assessments can carry amounts, counts, and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriterionValue {
    Amount(u64),
    Count(u32),
    Flag(bool),
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionValue::Amount(value) => write!(f, "{value}"),
            CriterionValue::Count(value) => write!(f, "{value}"),
            CriterionValue::Flag(true) => f.write_str("yes"),
            CriterionValue::Flag(false) => f.write_str("no"),
        }
    }
}

/// One row of the criterion table shown to the registrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionAssessment {
    pub criterion: CriterionKind,
    pub current: CriterionValue,
    pub threshold: CriterionValue,
    pub met: bool,
}

/// Assessment output combining the authoritative flag with the recomputed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub audit_required: bool,
    pub audit_status: AuditStatus,
    pub local_determination: AuditDetermination,
    pub diverges: bool,
    pub criteria: Vec<CriterionAssessment>,
}
