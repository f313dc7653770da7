use chrono::NaiveDate;

use crate::facility::{
    CategoryBreakdown, FacilityProfile, ParentReview, SeverityCounts, ViolationRecord,
};
use crate::rating::{RatingCalculator, RatingConfig};

pub(super) fn calculator() -> RatingCalculator {
    RatingCalculator::new(RatingConfig::default())
}

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn bare_profile() -> FacilityProfile {
    FacilityProfile::new("1490372", "Little Oaks Learning Center")
}

pub(super) fn counted_profile(
    high: u32,
    medium_high: u32,
    medium: u32,
    medium_low: u32,
    low: u32,
) -> FacilityProfile {
    let mut profile = bare_profile();
    profile.set_counts(SeverityCounts {
        high_risk: high,
        medium_high_risk: medium_high,
        medium_risk: medium,
        medium_low_risk: medium_low,
        low_risk: low,
    });
    profile
}

pub(super) fn clean_profile() -> FacilityProfile {
    counted_profile(0, 0, 0, 0, 0)
}

pub(super) fn reviews(values: &[f64]) -> Vec<ParentReview> {
    values.iter().copied().map(ParentReview::new).collect()
}

pub(super) fn counts(high: u32, medium_high: u32, medium: u32, medium_low: u32, low: u32) -> SeverityCounts {
    SeverityCounts {
        high_risk: high,
        medium_high_risk: medium_high,
        medium_risk: medium,
        medium_low_risk: medium_low,
        low_risk: low,
    }
}

pub(super) fn breakdown(entries: &[(&str, SeverityCounts)]) -> CategoryBreakdown {
    entries
        .iter()
        .map(|(category, counts)| (category.to_string(), *counts))
        .collect()
}

pub(super) fn record(category: &str, risk_level: &str) -> ViolationRecord {
    ViolationRecord {
        category: category.to_string(),
        risk_level: risk_level.to_string(),
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
