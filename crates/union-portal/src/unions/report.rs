use std::io;

use serde::Serialize;

use super::domain::{AuditStatus, RegistrationStatus, UnionRecord};
use super::eligibility::EligibilityReport;

/// Counters backing the admin dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total: usize,
    pub pending_approval: usize,
    pub approved: usize,
    pub rejected: usize,
    pub audit_required: usize,
    pub audit_not_required: usize,
    pub audit_pending: usize,
}

impl RegistryStats {
    pub fn collect(records: &[UnionRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.registration_status {
                RegistrationStatus::Pending => stats.pending_approval += 1,
                RegistrationStatus::Approved => stats.approved += 1,
                RegistrationStatus::Rejected => stats.rejected += 1,
            }
            match record.audit_status {
                AuditStatus::Required => stats.audit_required += 1,
                AuditStatus::NotRequired => stats.audit_not_required += 1,
                AuditStatus::Pending => stats.audit_pending += 1,
                AuditStatus::Completed => {}
            }
        }
        stats
    }
}

/// Write the union roster as CSV, one row per record.
pub fn write_roster_csv<W: io::Write>(
    records: &[UnionRecord],
    writer: W,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "name",
        "code",
        "headOfUnion",
        "region",
        "economicCode",
        "fiscalYear",
        "registration_status",
        "audit_status",
        "submitted_at",
    ])?;

    for record in records {
        writer.write_record([
            record.name.as_str(),
            record.code.as_str(),
            record.head_of_union.as_str(),
            record.region.as_str(),
            record.economic_code.as_str(),
            record.fiscal_year.as_str(),
            record.registration_status.label(),
            record.audit_status.label(),
            record.submitted_at.to_rfc3339().as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Plain-text assessment report offered for download on the results page.
pub fn render_audit_report(record: &UnionRecord, report: &EligibilityReport) -> String {
    let mut lines = Vec::new();
    lines.push("Official audit requirement assessment".to_string());
    lines.push(format!("Union: {}", record.name));
    lines.push(format!("Union code: {}", record.code));
    lines.push(format!("Head of union: {}", record.head_of_union));
    lines.push(String::new());

    let verdict = if report.audit_required {
        "an official audit is required"
    } else {
        "no official audit is required"
    };
    lines.push(format!("Determination: {verdict}"));
    lines.push(String::new());
    lines.push("Criteria:".to_string());

    for assessment in &report.criteria {
        let met = if assessment.met { "met" } else { "not met" };
        lines.push(format!(
            "- {}: {} (threshold {}) -> {met}",
            assessment.criterion.label(),
            assessment.current,
            assessment.threshold,
        ));
    }

    if report.diverges {
        lines.push(String::new());
        lines.push(format!(
            "Note: the status on file ({}) disagrees with the recomputed determination ({}).",
            report.audit_status.label(),
            report.local_determination.label(),
        ));
    }

    lines.join("\n")
}
