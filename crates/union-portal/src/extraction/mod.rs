//! Document-extraction collaborator boundary.
//!
//! Extraction output is advisory: every figure it produces stays tagged as
//! unverified until the registrant confirms it, and a response with no
//! usable figure is an error directing the registrant to manual entry.

use serde::{Deserialize, Serialize};

use crate::unions::domain::{DocumentDescriptor, FinancialSnapshot};

/// Best-effort figures returned by the extraction collaborator. The upstream
/// reports revenue totals, so `total_revenue` maps onto the asset figure of
/// the draft; member head-count comes through as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFinancials {
    pub annual_revenue: Option<u64>,
    pub total_revenue: Option<u64>,
    pub member_count: Option<u32>,
}

/// Collaborator accepting uploaded documents and returning extracted figures.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, documents: &[DocumentDescriptor])
        -> Result<ExtractedFinancials, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction returned no usable figures")]
    NoUsableData,
    #[error("extraction service unavailable: {0}")]
    Transport(String),
}

/// Provenance of a draft figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Extracted,
    Confirmed,
}

/// A single draft figure with its provenance tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftField<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> DraftField<T> {
    pub fn extracted(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Extracted,
        }
    }

    pub fn confirmed(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Confirmed,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.provenance == Provenance::Confirmed
    }
}

/// Error raised when a draft is used before every figure is confirmed.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("{field} has no value yet")]
    Missing { field: &'static str },
    #[error("{field} is still unverified extraction output")]
    Unconfirmed { field: &'static str },
}

/// Pre-submission financial figures with per-field provenance. Only a fully
/// confirmed draft converts into a `FinancialSnapshot`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDraft {
    pub annual_revenue: Option<DraftField<u64>>,
    pub total_assets: Option<DraftField<u64>>,
    pub member_count: Option<DraftField<u32>>,
    pub government_support: Option<DraftField<bool>>,
}

impl FinancialDraft {
    /// Seed a draft from extraction output. Missing figures stay empty for
    /// manual entry; government support is never extracted.
    pub fn from_extraction(extracted: ExtractedFinancials) -> Result<Self, ExtractionError> {
        if extracted.annual_revenue.is_none()
            && extracted.total_revenue.is_none()
            && extracted.member_count.is_none()
        {
            return Err(ExtractionError::NoUsableData);
        }

        Ok(Self {
            annual_revenue: extracted.annual_revenue.map(DraftField::extracted),
            total_assets: extracted.total_revenue.map(DraftField::extracted),
            member_count: extracted.member_count.map(DraftField::extracted),
            government_support: None,
        })
    }

    pub fn set_annual_revenue(&mut self, value: u64) {
        self.annual_revenue = Some(DraftField::confirmed(value));
    }

    pub fn set_total_assets(&mut self, value: u64) {
        self.total_assets = Some(DraftField::confirmed(value));
    }

    pub fn set_member_count(&mut self, value: u32) {
        self.member_count = Some(DraftField::confirmed(value));
    }

    pub fn set_government_support(&mut self, value: bool) {
        self.government_support = Some(DraftField::confirmed(value));
    }

    /// Convert into a snapshot; refuses while any figure is missing or
    /// still unverified.
    pub fn snapshot(&self) -> Result<FinancialSnapshot, DraftError> {
        let annual_revenue = confirmed_value(&self.annual_revenue, "annualRevenue")?;
        let total_assets = confirmed_value(&self.total_assets, "totalAssets")?;
        let member_count = confirmed_value(&self.member_count, "memberCount")?;
        let government_support = confirmed_value(&self.government_support, "governmentSupport")?;

        Ok(FinancialSnapshot {
            annual_revenue,
            total_assets,
            member_count,
            government_support,
        })
    }

    /// Accept every extracted figure as reviewed. This is the single
    /// explicit step standing between collaborator output and submission.
    pub fn confirm_all(&mut self) {
        if let Some(field) = self.annual_revenue.as_mut() {
            field.provenance = Provenance::Confirmed;
        }
        if let Some(field) = self.total_assets.as_mut() {
            field.provenance = Provenance::Confirmed;
        }
        if let Some(field) = self.member_count.as_mut() {
            field.provenance = Provenance::Confirmed;
        }
        if let Some(field) = self.government_support.as_mut() {
            field.provenance = Provenance::Confirmed;
        }
    }
}

fn confirmed_value<T: Copy>(
    field: &Option<DraftField<T>>,
    name: &'static str,
) -> Result<T, DraftError> {
    match field {
        None => Err(DraftError::Missing { field: name }),
        Some(field) if !field.is_confirmed() => Err(DraftError::Unconfirmed { field: name }),
        Some(field) => Ok(field.value),
    }
}
