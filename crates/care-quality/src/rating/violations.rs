use crate::facility::{CategoryBreakdown, FacilityProfile, Severity, SeverityCounts};
use serde::{Deserialize, Serialize};

/// Where a [`ViolationSummary`] got its counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSource {
    Direct,
    Categories,
    Records,
    None,
}

/// Severity buckets for one facility plus the signal needed to tell "verified clean" apart from
/// "nothing on file".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationSummary {
    #[serde(flatten)]
    pub counts: SeverityCounts,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_category: Option<CategoryBreakdown>,
    pub has_data: bool,
    pub source: ViolationSource,
}

impl ViolationSummary {
    fn new(
        counts: SeverityCounts,
        by_category: Option<CategoryBreakdown>,
        source: ViolationSource,
    ) -> Self {
        Self {
            total: counts.total(),
            counts,
            by_category,
            has_data: source != ViolationSource::None,
            source,
        }
    }
}

/// Reduces whatever violation data a profile carries into severity buckets.
///
/// Direct counts are authoritative because they are what the rest of the product displays; the
/// breakdown and the raw list are only consulted when no direct count exists.
pub struct ViolationAggregator;

impl ViolationAggregator {
    pub fn aggregate(profile: &FacilityProfile) -> ViolationSummary {
        if let Some(counts) = profile.direct_counts() {
            return ViolationSummary::new(
                counts,
                profile.violations_by_category.clone(),
                ViolationSource::Direct,
            );
        }

        if let Some(breakdown) = &profile.violations_by_category {
            return ViolationSummary::new(
                breakdown.totals(),
                Some(breakdown.clone()),
                ViolationSource::Categories,
            );
        }

        if let Some(records) = &profile.violations {
            let mut breakdown = CategoryBreakdown::new();
            for record in records {
                let Some(severity) = Severity::parse(&record.risk_level) else {
                    continue;
                };
                let mut counts = SeverityCounts::default();
                counts.record(severity, 1);
                breakdown.add(record.category.trim(), counts);
            }
            return ViolationSummary::new(
                breakdown.totals(),
                Some(breakdown),
                ViolationSource::Records,
            );
        }

        ViolationSummary::new(SeverityCounts::default(), None, ViolationSource::None)
    }
}
