use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cache::{RatingCache, RatingCacheKey};
use crate::config::EngineConfig;
use crate::facility::{FacilityId, FacilityProfile};
use crate::pricing::{PriceEstimateResult, PriceEstimator, PricingPreferences};
use crate::rating::{Classification, RatingCalculator, RatingConfig, RatingResult};

/// Rating plus, when preferences were supplied, a price estimate for one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityAssessment {
    pub facility_id: FacilityId,
    pub rating: RatingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceEstimateResult>,
}

/// Compact row used by listing tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingListingRow {
    pub facility_id: FacilityId,
    pub name: String,
    pub score: f64,
    pub classification: Classification,
    pub stars: String,
    pub total_violations: u32,
}

impl RatingListingRow {
    fn from_rating(profile: &FacilityProfile, rating: &RatingResult) -> Self {
        Self {
            facility_id: rating.facility_id.clone(),
            name: profile.name.clone(),
            score: rating.score,
            classification: rating.classification,
            stars: rating.stars.clone(),
            total_violations: rating.component_scores.violations.total,
        }
    }
}

/// Facade composing the rating calculator, the price estimator and an optional memo cache.
pub struct FacilityAssessmentService<C> {
    rating: RatingConfig,
    estimator: PriceEstimator,
    cache: Arc<C>,
}

impl<C> FacilityAssessmentService<C>
where
    C: RatingCache + 'static,
{
    pub fn new(config: EngineConfig, cache: Arc<C>) -> Self {
        Self {
            rating: config.rating,
            estimator: PriceEstimator::new(config.pricing),
            cache,
        }
    }

    pub fn rate(&self, profile: &FacilityProfile, as_of: Option<NaiveDate>) -> RatingResult {
        let key = RatingCacheKey::for_profile(profile, as_of);

        if let Some(key) = &key {
            match self.cache.get(key) {
                Ok(Some(rating)) => {
                    debug!(
                        facility_id = %key.facility_id,
                        version = key.profile_version,
                        "rating cache hit"
                    );
                    return rating;
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "rating cache lookup failed; recomputing"),
            }
        }

        log_data_gaps(profile);

        let mut calculator = RatingCalculator::new(self.rating.clone());
        if let Some(date) = as_of {
            calculator = calculator.as_of(date);
        }
        let rating = calculator.rate(profile);

        if let Some(key) = key {
            if let Err(err) = self.cache.put(key, rating.clone()) {
                warn!(error = %err, "failed to store rating in cache");
            }
        }

        rating
    }

    pub fn estimate(
        &self,
        profile: &FacilityProfile,
        preferences: &PricingPreferences,
    ) -> PriceEstimateResult {
        self.estimator.estimate(profile, preferences)
    }

    pub fn assess(
        &self,
        profile: &FacilityProfile,
        preferences: Option<&PricingPreferences>,
        as_of: Option<NaiveDate>,
    ) -> FacilityAssessment {
        FacilityAssessment {
            facility_id: profile.facility_id.clone(),
            rating: self.rate(profile, as_of),
            price: preferences.map(|preferences| self.estimate(profile, preferences)),
        }
    }

    /// Listing rows for a batch of profiles, best score first. Equal scores keep input order.
    pub fn rate_listing(
        &self,
        profiles: &[FacilityProfile],
        as_of: Option<NaiveDate>,
    ) -> Vec<RatingListingRow> {
        let mut rows: Vec<RatingListingRow> = profiles
            .iter()
            .map(|profile| RatingListingRow::from_rating(profile, &self.rate(profile, as_of)))
            .collect();
        rows.sort_by(|a, b| b.score.total_cmp(&a.score));
        rows
    }
}

fn log_data_gaps(profile: &FacilityProfile) {
    if profile.direct_counts().is_none()
        && profile.violations_by_category.is_none()
        && profile.violations.is_none()
    {
        debug!(
            facility_id = %profile.facility_id,
            "no violation data; using neutral history score"
        );
    }

    let ratings: Vec<f64> = profile
        .reviews
        .iter()
        .filter_map(|review| review.rating_value)
        .collect();
    if ratings.is_empty() {
        debug!(
            facility_id = %profile.facility_id,
            "no usable reviews; using default review score"
        );
    } else if ratings.iter().all(|value| *value <= 1.0) {
        debug!(
            facility_id = %profile.facility_id,
            reviews = ratings.len(),
            "every review is at or below 1.0; upstream may be sending a 0-1 scale"
        );
    }
}
