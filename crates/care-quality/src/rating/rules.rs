use super::config::RatingConfig;
use super::violations::ViolationSummary;
use super::{ComponentKind, ScoreComponent, TopCategory};
use crate::facility::{CategoryBreakdown, FacilityProfile, ParentReview};
use chrono::NaiveDate;

pub(crate) const MIN_SCORE: f64 = 1.0;
pub(crate) const MAX_SCORE: f64 = 5.0;

const DAYS_PER_YEAR: f64 = 365.25;

pub(crate) fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_SCORE;
    }
    value.clamp(MIN_SCORE, MAX_SCORE)
}

pub(crate) fn violation_component(
    summary: &ViolationSummary,
    config: &RatingConfig,
) -> ScoreComponent {
    if !summary.has_data {
        return ScoreComponent {
            component: ComponentKind::ViolationHistory,
            score: clamp_score(config.unknown_history_score),
            weight: config.violation_weight,
            notes: "no inspection history on file; scored as neutral".to_string(),
        };
    }

    let penalty = config.severity_penalties.apply(&summary.counts);
    let score = (MAX_SCORE - penalty).max(MIN_SCORE);

    let notes = if summary.total == 0 {
        "no violations on record".to_string()
    } else {
        format!(
            "{} violation(s): {} high, {} medium-high, {} medium, {} medium-low, {} low (penalty {:.2})",
            summary.total,
            summary.counts.high_risk,
            summary.counts.medium_high_risk,
            summary.counts.medium_risk,
            summary.counts.medium_low_risk,
            summary.counts.low_risk,
            penalty
        )
    };

    ScoreComponent {
        component: ComponentKind::ViolationHistory,
        score: clamp_score(score),
        weight: config.violation_weight,
        notes,
    }
}

/// Ranks categories by severity-weighted total. Ties keep first-seen order and categories with
/// no weighted violations are left out.
pub(crate) fn top_categories(
    breakdown: Option<&CategoryBreakdown>,
    config: &RatingConfig,
) -> Vec<TopCategory> {
    let Some(breakdown) = breakdown else {
        return Vec::new();
    };

    let mut ranked: Vec<TopCategory> = breakdown
        .entries()
        .iter()
        .map(|entry| TopCategory {
            category: entry.category.clone(),
            weighted_total: config.category_multipliers.apply(&entry.counts),
        })
        .filter(|entry| entry.weighted_total > 0.0)
        .collect();

    // stable sort: equal totals stay in document order
    ranked.sort_by(|a, b| b.weighted_total.total_cmp(&a.weighted_total));
    ranked.truncate(config.top_category_limit);
    ranked
}

/// Returns the review component and the number of usable reviews.
pub(crate) fn review_component(
    reviews: &[ParentReview],
    config: &RatingConfig,
) -> (ScoreComponent, usize) {
    let usable: Vec<f64> = reviews
        .iter()
        .filter_map(|review| review.rating_value)
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, MAX_SCORE))
        .collect();

    if usable.is_empty() {
        let component = ScoreComponent {
            component: ComponentKind::ParentReviews,
            score: clamp_score(config.default_review_score),
            weight: config.review_weight,
            notes: "no parent reviews yet".to_string(),
        };
        return (component, 0);
    }

    let sum = usable.iter().fold(0.0, |sum, value| sum + value);
    let mean = sum / usable.len() as f64;

    let component = ScoreComponent {
        component: ComponentKind::ParentReviews,
        score: clamp_score(mean),
        weight: config.review_weight,
        notes: format!("average of {} review(s): {:.2}", usable.len(), mean),
    };
    (component, usable.len())
}

pub(crate) fn years_in_operation(profile: &FacilityProfile, as_of: Option<NaiveDate>) -> Option<f64> {
    if let Some(years) = profile.years_in_operation {
        return Some(years.max(0.0));
    }

    let issued = profile.license_issuance_date?;
    let as_of = as_of?;
    let days = (as_of - issued).num_days().max(0);
    Some(days as f64 / DAYS_PER_YEAR)
}

pub(crate) fn quality_component(
    profile: &FacilityProfile,
    as_of: Option<NaiveDate>,
    config: &RatingConfig,
) -> ScoreComponent {
    let mut score = config.quality_baseline;
    let mut notes = Vec::new();

    if let Some(years) = years_in_operation(profile, as_of) {
        let bonus = config
            .tenure_bonuses
            .iter()
            .filter(|tier| years >= tier.min_years)
            .map(|tier| tier.bonus)
            .fold(0.0, f64::max);
        if bonus > 0.0 {
            score += bonus;
            notes.push(format!("{years:.1} years in operation (+{bonus:.2})"));
        }
    }

    if profile.accredited {
        score += config.accreditation_bonus;
        notes.push(format!("accredited (+{:.2})", config.accreditation_bonus));
    }

    if let Some(passed) = profile.inspections_passed.filter(|passed| *passed > 0) {
        let bonus =
            (f64::from(passed) * config.inspection_bonus_per_pass).min(config.inspection_bonus_cap);
        score += bonus;
        notes.push(format!("{passed} inspection(s) passed (+{bonus:.2})"));
    }

    let notes = if notes.is_empty() {
        "no quality indicators on file".to_string()
    } else {
        notes.join("; ")
    };

    ScoreComponent {
        component: ComponentKind::QualityIndicators,
        score: clamp_score(score.max(config.quality_baseline)),
        weight: config.quality_weight,
        notes,
    }
}
