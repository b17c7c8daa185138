use chrono::{DateTime, Utc};

use super::domain::{
    AuditStatus, OwnerId, RegistrationStatus, UnionId, UnionRecord, UnionSubmission,
};

/// Validation errors raised before any registry call.
#[derive(Debug, thiserror::Error)]
pub enum ValidationViolation {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("economic code must be exactly 10 digits (found {found:?})")]
    EconomicCodeFormat { found: String },
    #[error("fiscal year must be a 4 digit year (found {found:?})")]
    FiscalYearFormat { found: String },
}

/// Guard turning inbound submissions into pending registry records.
#[derive(Debug, Default, Clone)]
pub struct RegistrationGuard;

impl RegistrationGuard {
    /// Produce a pending `UnionRecord` from a submission. The id is a
    /// placeholder until the service assigns one from its sequence.
    pub fn record_from_submission(
        &self,
        submission: UnionSubmission,
        owner: OwnerId,
        phone_number: &str,
        now: DateTime<Utc>,
    ) -> Result<UnionRecord, ValidationViolation> {
        let required = [
            ("name", &submission.name),
            ("headOfUnion", &submission.head_of_union),
            ("region", &submission.region),
            ("code", &submission.code),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationViolation::EmptyField { field });
            }
        }

        if !digits_of_length(&submission.economic_code, 10) {
            return Err(ValidationViolation::EconomicCodeFormat {
                found: submission.economic_code,
            });
        }

        if !digits_of_length(&submission.fiscal_year, 4) {
            return Err(ValidationViolation::FiscalYearFormat {
                found: submission.fiscal_year,
            });
        }

        Ok(UnionRecord {
            id: UnionId(0),
            owner,
            name: submission.name,
            head_of_union: submission.head_of_union,
            region: submission.region,
            economic_code: submission.economic_code,
            fiscal_year: submission.fiscal_year,
            phone_number: phone_number.to_string(),
            code: submission.code,
            registration_status: RegistrationStatus::Pending,
            audit_status: AuditStatus::Pending,
            submitted_at: now,
            approved_at: None,
            rejected_at: None,
            rejection_reason: None,
            financial_data: None,
            documents: Vec::new(),
        })
    }
}

fn digits_of_length(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}
