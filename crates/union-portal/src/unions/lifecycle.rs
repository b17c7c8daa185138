use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::session::ActorRole;

use super::domain::{AuditStatus, RegistrationStatus, UnionRecord};

/// Views reachable from the navigation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalView {
    Registration,
    Dashboard,
    DocumentUpload,
    AuditResults,
    AdminPanel,
}

/// Actions that may be offered for a record in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionAction {
    SubmitRegistration,
    UploadDocuments,
    ViewResults,
    Approve,
    Reject,
}

/// Errors raised by registration-status transitions.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("registration already decided as {status}")]
    AlreadyDecided { status: &'static str },
    #[error("a rejection requires a non-empty reason")]
    EmptyRejectionReason,
}

pub fn can_upload_documents(record: &UnionRecord) -> bool {
    record.registration_status == RegistrationStatus::Approved
}

pub fn can_view_results(record: &UnionRecord) -> bool {
    record.registration_status == RegistrationStatus::Approved
        && record.audit_status != AuditStatus::Pending
}

/// Admin approve/reject is only offered while the registration is pending.
pub fn decision_open(record: &UnionRecord) -> bool {
    record.registration_status == RegistrationStatus::Pending
}

pub fn reachable_views(role: ActorRole, record: Option<&UnionRecord>) -> Vec<PortalView> {
    match role {
        ActorRole::Admin => vec![PortalView::AdminPanel],
        ActorRole::Union => match record {
            None => vec![PortalView::Registration],
            Some(record) => {
                let mut views = vec![PortalView::Dashboard];
                if can_upload_documents(record) {
                    views.push(PortalView::DocumentUpload);
                }
                if can_view_results(record) {
                    views.push(PortalView::AuditResults);
                }
                views
            }
        },
    }
}

pub fn enabled_actions(role: ActorRole, record: Option<&UnionRecord>) -> Vec<UnionAction> {
    match role {
        ActorRole::Admin => match record {
            Some(record) if decision_open(record) => {
                vec![UnionAction::Approve, UnionAction::Reject]
            }
            _ => Vec::new(),
        },
        ActorRole::Union => match record {
            None => vec![UnionAction::SubmitRegistration],
            Some(record) => {
                let mut actions = Vec::new();
                if can_upload_documents(record) {
                    actions.push(UnionAction::UploadDocuments);
                }
                if can_view_results(record) {
                    actions.push(UnionAction::ViewResults);
                }
                actions
            }
        },
    }
}

/// `pending -> approved`; clears any rejection trace.
pub fn approve(record: &UnionRecord, now: DateTime<Utc>) -> Result<UnionRecord, TransitionError> {
    ensure_pending(record)?;
    let mut updated = record.clone();
    updated.registration_status = RegistrationStatus::Approved;
    updated.approved_at = Some(now);
    updated.rejected_at = None;
    updated.rejection_reason = None;
    Ok(updated)
}

/// `pending -> rejected`; the reason is mandatory after trimming.
pub fn reject(
    record: &UnionRecord,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<UnionRecord, TransitionError> {
    ensure_pending(record)?;
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(TransitionError::EmptyRejectionReason);
    }
    let mut updated = record.clone();
    updated.registration_status = RegistrationStatus::Rejected;
    updated.rejected_at = Some(now);
    updated.approved_at = None;
    updated.rejection_reason = Some(reason.to_string());
    Ok(updated)
}

fn ensure_pending(record: &UnionRecord) -> Result<(), TransitionError> {
    match record.registration_status {
        RegistrationStatus::Pending => Ok(()),
        status => Err(TransitionError::AlreadyDecided {
            status: status.label(),
        }),
    }
}
