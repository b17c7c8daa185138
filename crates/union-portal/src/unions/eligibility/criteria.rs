use super::super::domain::FinancialSnapshot;
use super::config::EligibilityConfig;
use super::{CriterionAssessment, CriterionKind, CriterionValue};

pub(crate) fn assess_snapshot(
    snapshot: &FinancialSnapshot,
    config: &EligibilityConfig,
) -> Vec<CriterionAssessment> {
    vec![
        CriterionAssessment {
            criterion: CriterionKind::AnnualRevenue,
            current: CriterionValue::Amount(snapshot.annual_revenue),
            threshold: CriterionValue::Amount(config.revenue_threshold),
            met: snapshot.annual_revenue > config.revenue_threshold,
        },
        CriterionAssessment {
            criterion: CriterionKind::TotalAssets,
            current: CriterionValue::Amount(snapshot.total_assets),
            threshold: CriterionValue::Amount(config.asset_threshold),
            met: snapshot.total_assets > config.asset_threshold,
        },
        CriterionAssessment {
            criterion: CriterionKind::MemberCount,
            current: CriterionValue::Count(snapshot.member_count),
            threshold: CriterionValue::Count(config.member_threshold),
            met: snapshot.member_count > config.member_threshold,
        },
        CriterionAssessment {
            criterion: CriterionKind::GovernmentSupport,
            current: CriterionValue::Flag(snapshot.government_support),
            threshold: CriterionValue::Flag(true),
            met: snapshot.government_support,
        },
    ]
}
