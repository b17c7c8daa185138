use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use super::domain::{
    AuditStatus, DocumentDescriptor, FinancialSnapshot, OwnerId, UnionId, UnionRecord,
    UnionSubmission,
};
use super::eligibility::{
    AuditDetermination, EligibilityConfig, EligibilityEvaluator, EligibilityReport,
};
use super::lifecycle::{self, TransitionError};
use super::report::RegistryStats;
use super::repository::{AuditResultView, RegistryError, UnionRegistry};
use super::validation::{RegistrationGuard, ValidationViolation};

/// Admin decision against a pending registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RegistrationDecision {
    Approve,
    Reject {
        #[serde(default)]
        comment: String,
    },
}

/// Service composing the validation guard, registry boundary, and evaluator.
pub struct UnionRegistryService<R> {
    guard: RegistrationGuard,
    registry: Arc<R>,
    evaluator: EligibilityEvaluator,
    sequence: AtomicU64,
}

impl<R> UnionRegistryService<R>
where
    R: UnionRegistry + 'static,
{
    pub fn new(registry: Arc<R>, config: EligibilityConfig) -> Self {
        Self {
            guard: RegistrationGuard::default(),
            registry,
            evaluator: EligibilityEvaluator::new(config),
            sequence: AtomicU64::new(1),
        }
    }

    /// Submit a registration; the record enters the lifecycle as pending.
    pub fn register(
        &self,
        owner: OwnerId,
        phone_number: &str,
        submission: UnionSubmission,
        now: DateTime<Utc>,
    ) -> Result<UnionRecord, UnionServiceError> {
        let mut record = self
            .guard
            .record_from_submission(submission, owner, phone_number, now)?;
        record.id = UnionId(self.sequence.fetch_add(1, Ordering::Relaxed));
        let stored = self.registry.insert(record)?;
        Ok(stored)
    }

    /// Absence of a record is a normal outcome routing to registration.
    pub fn my_union(&self, owner: &OwnerId) -> Result<Option<UnionRecord>, UnionServiceError> {
        Ok(self.registry.find_by_owner(owner)?)
    }

    pub fn list_unions(&self) -> Result<Vec<UnionRecord>, UnionServiceError> {
        Ok(self.registry.list()?)
    }

    pub fn stats(&self) -> Result<RegistryStats, UnionServiceError> {
        Ok(RegistryStats::collect(&self.registry.list()?))
    }

    /// Apply an admin decision and return the record as re-read from the
    /// registry, so the response observes its own write.
    pub fn decide(
        &self,
        id: UnionId,
        decision: RegistrationDecision,
        now: DateTime<Utc>,
    ) -> Result<UnionRecord, UnionServiceError> {
        let record = self.registry.fetch(id)?.ok_or(RegistryError::NotFound)?;

        let updated = match decision {
            RegistrationDecision::Approve => lifecycle::approve(&record, now)?,
            RegistrationDecision::Reject { comment } => lifecycle::reject(&record, &comment, now)?,
        };

        self.registry.update(updated)?;
        self.read_back(id)
    }

    /// Attach a financial snapshot to an approved union. The snapshot
    /// replaces any earlier one wholesale, and the audit status is
    /// recomputed and stored alongside it.
    pub fn submit_financial_data(
        &self,
        owner: &OwnerId,
        snapshot: FinancialSnapshot,
        documents: Vec<DocumentDescriptor>,
    ) -> Result<UnionRecord, UnionServiceError> {
        let mut record = self
            .registry
            .find_by_owner(owner)?
            .ok_or(RegistryError::NotFound)?;

        if !lifecycle::can_upload_documents(&record) {
            return Err(UnionServiceError::RegistrationNotApproved);
        }

        record.financial_data = Some(snapshot);
        record.documents = documents;
        record.audit_status = match self.evaluator.determine(&snapshot) {
            AuditDetermination::Required => AuditStatus::Required,
            AuditDetermination::NotRequired => AuditStatus::NotRequired,
        };

        let id = record.id;
        self.registry.update(record)?;
        self.read_back(id)
    }

    pub fn audit_result(&self, owner: &OwnerId) -> Result<AuditResultView, UnionServiceError> {
        let record = self
            .registry
            .find_by_owner(owner)?
            .ok_or(RegistryError::NotFound)?;
        if record.financial_data.is_none() {
            return Err(UnionServiceError::NoFinancialData);
        }
        Ok(AuditResultView::from(&record))
    }

    /// Criterion table plus the authoritative flag; `Ok(None)` while no
    /// financial data is on file. Divergence between the stored status and
    /// the recomputed determination is logged, never reconciled.
    pub fn eligibility_report(
        &self,
        owner: &OwnerId,
    ) -> Result<Option<EligibilityReport>, UnionServiceError> {
        let record = self
            .registry
            .find_by_owner(owner)?
            .ok_or(RegistryError::NotFound)?;

        let report = self.evaluator.report(&record);
        if let Some(report) = &report {
            if report.diverges {
                warn!(
                    union_code = %record.code,
                    stored = record.audit_status.label(),
                    recomputed = report.local_determination.label(),
                    "audit status on file disagrees with recomputed determination"
                );
            }
        }
        Ok(report)
    }

    fn read_back(&self, id: UnionId) -> Result<UnionRecord, UnionServiceError> {
        Ok(self.registry.fetch(id)?.ok_or(RegistryError::NotFound)?)
    }
}

/// Error raised by the union registry service.
#[derive(Debug, thiserror::Error)]
pub enum UnionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationViolation),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("registration is not approved yet")]
    RegistrationNotApproved,
    #[error("no financial data has been submitted")]
    NoFinancialData,
}
