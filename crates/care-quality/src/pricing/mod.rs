//! Monthly price estimation: a base price from the facility profile, then ordered adjustments.

mod adjustments;
mod config;
mod domain;
mod estimator;

#[cfg(test)]
mod tests;

pub use adjustments::{apply_adjustments, round_to_increment, AdjustmentPipeline};
pub use config::{AgeFactors, PartTimeFactor, PricingConfig, ProgramFee};
pub use domain::{
    AdjustmentKind, AgeGroup, BaseEstimate, CityTier, PriceAdjustment, PriceEstimateResult,
    PricingPreferences, ProgramFeeLine, UnknownAgeGroup,
};
pub use estimator::PriceEstimator;
