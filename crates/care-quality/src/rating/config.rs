use crate::facility::{Severity, SeverityCounts};
use serde::{Deserialize, Serialize};

/// Per-severity coefficients applied to violation counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub high: f64,
    pub medium_high: f64,
    pub medium: f64,
    pub medium_low: f64,
    pub low: f64,
}

impl SeverityWeights {
    pub const fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::High => self.high,
            Severity::MediumHigh => self.medium_high,
            Severity::Medium => self.medium,
            Severity::MediumLow => self.medium_low,
            Severity::Low => self.low,
        }
    }

    /// Weighted sum, always accumulated from high to low severity.
    pub fn apply(&self, counts: &SeverityCounts) -> f64 {
        Severity::ordered()
            .into_iter()
            .fold(0.0, |sum, severity| {
                sum + f64::from(counts.get(severity)) * self.weight(severity)
            })
    }
}

/// Operating-history bonus granted once a facility reaches `min_years`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TenureBonus {
    pub min_years: f64,
    pub bonus: f64,
}

/// Rubric configuration for the quality rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    pub violation_weight: f64,
    pub review_weight: f64,
    pub quality_weight: f64,
    /// Points subtracted from 5.0 per violation.
    pub severity_penalties: SeverityWeights,
    /// Multipliers used only to rank categories for display.
    pub category_multipliers: SeverityWeights,
    /// Violation sub-score when the facility has no inspection data at all.
    pub unknown_history_score: f64,
    pub default_review_score: f64,
    pub quality_baseline: f64,
    pub tenure_bonuses: Vec<TenureBonus>,
    pub accreditation_bonus: f64,
    pub inspection_bonus_per_pass: f64,
    pub inspection_bonus_cap: f64,
    pub top_category_limit: usize,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            violation_weight: 0.6,
            review_weight: 0.2,
            quality_weight: 0.2,
            severity_penalties: SeverityWeights {
                high: 0.75,
                medium_high: 0.30,
                medium: 0.15,
                medium_low: 0.05,
                low: 0.03,
            },
            category_multipliers: SeverityWeights {
                high: 5.0,
                medium_high: 4.0,
                medium: 3.0,
                medium_low: 2.0,
                low: 1.0,
            },
            unknown_history_score: 3.0,
            default_review_score: 3.0,
            quality_baseline: 3.0,
            tenure_bonuses: vec![
                TenureBonus {
                    min_years: 10.0,
                    bonus: 1.0,
                },
                TenureBonus {
                    min_years: 5.0,
                    bonus: 0.5,
                },
                TenureBonus {
                    min_years: 2.0,
                    bonus: 0.25,
                },
            ],
            accreditation_bonus: 0.75,
            inspection_bonus_per_pass: 0.1,
            inspection_bonus_cap: 0.5,
            top_category_limit: 3,
        }
    }
}
