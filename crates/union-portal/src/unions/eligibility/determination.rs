use serde::{Deserialize, Serialize};

use super::CriterionAssessment;

/// Determination recomputed from the criterion table alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditDetermination {
    Required,
    NotRequired,
}

impl AuditDetermination {
    pub const fn label(self) -> &'static str {
        match self {
            AuditDetermination::Required => "required",
            AuditDetermination::NotRequired => "not_required",
        }
    }

    pub const fn is_required(self) -> bool {
        matches!(self, AuditDetermination::Required)
    }
}

/// A single met criterion is enough to require an official audit.
pub(crate) fn determine(criteria: &[CriterionAssessment]) -> AuditDetermination {
    if criteria.iter().any(|assessment| assessment.met) {
        AuditDetermination::Required
    } else {
        AuditDetermination::NotRequired
    }
}
