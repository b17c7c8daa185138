use serde::{Deserialize, Serialize};

/// Statutory thresholds backing the audit-requirement assessment.
///
/// A criterion is met only by strictly exceeding its threshold; a figure
/// equal to the threshold does not trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub revenue_threshold: u64,
    pub asset_threshold: u64,
    pub member_threshold: u32,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            revenue_threshold: 5_000_000_000,
            asset_threshold: 3_000_000_000,
            member_threshold: 500,
        }
    }
}
