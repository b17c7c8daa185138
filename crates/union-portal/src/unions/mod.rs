//! Union registration intake, admin review, and the audit-requirement
//! assessment shown back to the registrant.

pub mod domain;
pub mod eligibility;
pub mod lifecycle;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AuditStatus, DocumentCategory, DocumentDescriptor, FinancialSnapshot, OwnerId,
    RegistrationStatus, UnionId, UnionRecord, UnionSubmission,
};
pub use eligibility::{
    AuditDetermination, CriterionAssessment, CriterionKind, CriterionValue, EligibilityConfig,
    EligibilityEvaluator, EligibilityReport,
};
pub use lifecycle::{PortalView, TransitionError, UnionAction};
pub use report::RegistryStats;
pub use repository::{AuditResultView, RegistryError, UnionRegistry, UnionSummaryView};
pub use router::{union_router, PortalState};
pub use service::{RegistrationDecision, UnionRegistryService, UnionServiceError};
pub use validation::ValidationViolation;
