//! Quality rating: three clamped sub-scores blended into a 1.0–5.0 score.

mod classification;
mod config;
mod rules;
mod violations;

#[cfg(test)]
mod tests;

pub use classification::{star_string, Classification};
pub use config::{RatingConfig, SeverityWeights, TenureBonus};
pub use violations::{ViolationAggregator, ViolationSource, ViolationSummary};

use crate::facility::{FacilityId, FacilityProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The three weighted inputs to the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    ViolationHistory,
    ParentReviews,
    QualityIndicators,
}

impl ComponentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViolationHistory => "Violation history",
            Self::ParentReviews => "Parent reviews",
            Self::QualityIndicators => "Quality indicators",
        }
    }
}

/// Discrete contribution to a rating, kept for the explanation panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub component: ComponentKind,
    pub score: f64,
    pub weight: f64,
    pub notes: String,
}

/// Category surfaced in the explanation because it carries the most weighted violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub category: String,
    pub weighted_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub violation_score: f64,
    pub parent_review_score: f64,
    pub quality_score: f64,
    pub review_count: usize,
    pub top_categories: Vec<TopCategory>,
    pub violations: ViolationSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingResult {
    pub facility_id: FacilityId,
    pub score: f64,
    pub classification: Classification,
    pub stars: String,
    pub component_scores: ComponentScores,
    pub explanation: Vec<ScoreComponent>,
}

/// Stateless calculator applying a [`RatingConfig`] to facility profiles.
///
/// `as_of` is only used to turn a license issuance date into years of operation; the calculator
/// never reads the clock itself.
#[derive(Debug, Clone, Default)]
pub struct RatingCalculator {
    config: RatingConfig,
    as_of: Option<NaiveDate>,
}

impl RatingCalculator {
    pub fn new(config: RatingConfig) -> Self {
        Self {
            config,
            as_of: None,
        }
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn rate(&self, profile: &FacilityProfile) -> RatingResult {
        let summary = ViolationAggregator::aggregate(profile);

        let violation = rules::violation_component(&summary, &self.config);
        let (reviews, review_count) = rules::review_component(&profile.reviews, &self.config);
        let quality = rules::quality_component(profile, self.as_of, &self.config);
        let top_categories = rules::top_categories(summary.by_category.as_ref(), &self.config);

        let weighted = violation.score * violation.weight
            + reviews.score * reviews.weight
            + quality.score * quality.weight;
        let score = rules::clamp_score(weighted);
        debug_assert!(
            (rules::MIN_SCORE..=rules::MAX_SCORE).contains(&score),
            "final score {score} escaped the rating range"
        );

        RatingResult {
            facility_id: profile.facility_id.clone(),
            score,
            classification: Classification::from_score(score),
            stars: star_string(score),
            component_scores: ComponentScores {
                violation_score: violation.score,
                parent_review_score: reviews.score,
                quality_score: quality.score,
                review_count,
                top_categories,
                violations: summary,
            },
            explanation: vec![violation, reviews, quality],
        }
    }
}

/// Rates a profile with the default rubric and no reference date.
pub fn rate(profile: &FacilityProfile) -> RatingResult {
    RatingCalculator::default().rate(profile)
}
