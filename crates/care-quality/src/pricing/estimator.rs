use super::adjustments::AdjustmentPipeline;
use super::config::PricingConfig;
use super::domain::{
    AgeGroup, BaseEstimate, CityTier, PriceEstimateResult, PricingPreferences, ProgramFeeLine,
};
use crate::facility::FacilityProfile;

/// Base monthly price estimation from location, age group and declared services.
#[derive(Debug, Clone, Default)]
pub struct PriceEstimator {
    config: PricingConfig,
}

impl PriceEstimator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Base estimate for the default (preschool) age group.
    pub fn estimate_base(&self, profile: &FacilityProfile) -> BaseEstimate {
        self.estimate_base_for(profile, AgeGroup::default())
    }

    pub fn estimate_base_for(&self, profile: &FacilityProfile, age_group: AgeGroup) -> BaseEstimate {
        let config = &self.config;
        let city_tier = self.city_tier(profile.city.as_deref());
        let city_rate = config.base_monthly_rate * self.tier_factor(city_tier);
        let age_factor = self.age_factor(age_group);

        let accreditation_factor = if profile.accredited {
            config.accreditation_multiplier
        } else {
            1.0
        };

        let capacity_factor = match profile.total_capacity {
            Some(capacity)
                if capacity > 0
                    && capacity <= config.small_capacity_max
                    && self.offers_specialized_program(profile) =>
            {
                config.small_capacity_multiplier
            }
            Some(capacity) if capacity >= config.large_capacity_min => {
                config.large_capacity_multiplier
            }
            _ => 1.0,
        };

        let program_fees: Vec<ProgramFeeLine> = config
            .program_fees
            .iter()
            .filter(|fee| profile.offers_program(&fee.keyword))
            .map(|fee| ProgramFeeLine {
                label: fee.label.clone(),
                amount: fee.amount,
            })
            .collect();

        let scaled = city_rate * age_factor * accreditation_factor * capacity_factor;
        let base_price = program_fees
            .iter()
            .fold(scaled, |price, fee| price + fee.amount);

        BaseEstimate {
            city_tier,
            city_rate,
            age_group,
            age_factor,
            accreditation_factor,
            capacity_factor,
            program_fees,
            base_price,
        }
    }

    /// Base estimate followed by the adjustment pipeline.
    pub fn estimate(
        &self,
        profile: &FacilityProfile,
        preferences: &PricingPreferences,
    ) -> PriceEstimateResult {
        let age_group = preferences.age_group.unwrap_or_default();
        let base = self.estimate_base_for(profile, age_group);

        let mut result =
            AdjustmentPipeline::new(self.config.clone()).apply(base.base_price, preferences);
        result.facility_id = Some(profile.facility_id.clone());
        result.base_breakdown = Some(base);
        result
    }

    pub fn city_tier(&self, city: Option<&str>) -> CityTier {
        let Some(city) = city.map(normalize_city).filter(|city| !city.is_empty()) else {
            return CityTier::Standard;
        };

        let listed = |cities: &[String]| cities.iter().any(|name| normalize_city(name) == city);
        if listed(&self.config.high_cost_cities) {
            CityTier::HighCost
        } else if listed(&self.config.metro_cities) {
            CityTier::Metro
        } else {
            CityTier::Standard
        }
    }

    fn offers_specialized_program(&self, profile: &FacilityProfile) -> bool {
        self.config
            .specialized_programs
            .iter()
            .any(|keyword| profile.offers_program(keyword))
    }

    fn tier_factor(&self, tier: CityTier) -> f64 {
        match tier {
            CityTier::HighCost => self.config.high_cost_factor,
            CityTier::Metro => self.config.metro_factor,
            CityTier::Standard => self.config.standard_factor,
        }
    }

    fn age_factor(&self, age_group: AgeGroup) -> f64 {
        let factors = &self.config.age_factors;
        match age_group {
            AgeGroup::Infant => factors.infant,
            AgeGroup::Toddler => factors.toddler,
            AgeGroup::Preschool => factors.preschool,
            AgeGroup::SchoolAge => factors.school_age,
        }
    }
}

fn normalize_city(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
