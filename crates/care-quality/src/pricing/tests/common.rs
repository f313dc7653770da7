use crate::facility::FacilityProfile;
use crate::pricing::{AdjustmentPipeline, PriceEstimator, PricingConfig, PricingPreferences};

pub(super) fn pipeline() -> AdjustmentPipeline {
    AdjustmentPipeline::new(PricingConfig::default())
}

pub(super) fn estimator() -> PriceEstimator {
    PriceEstimator::new(PricingConfig::default())
}

pub(super) fn profile_in(city: &str) -> FacilityProfile {
    let mut profile = FacilityProfile::new("88213", "Sunrise Kids Academy");
    profile.city = Some(city.to_string());
    profile.total_capacity = Some(60);
    profile
}

pub(super) fn preferences() -> PricingPreferences {
    PricingPreferences::default()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
