use super::config::PricingConfig;
use super::domain::{AdjustmentKind, PriceAdjustment, PriceEstimateResult, PricingPreferences};

const FULL_TIME_DAYS: u32 = 5;
const ROUNDING_INCREMENT: f64 = 5.0;

/// Applies the ordered, compounding price adjustments on top of a base price.
///
/// Every step reads the running price left by the previous one. The sum of all adjustment
/// amounts plus the base price is the running price before the final rounding to a multiple
/// of five.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentPipeline {
    config: PricingConfig,
}

impl AdjustmentPipeline {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn apply(&self, base_price: f64, preferences: &PricingPreferences) -> PriceEstimateResult {
        let mut running = base_price;
        let mut adjustments = Vec::new();
        let mut push = |adjustment: PriceAdjustment, running: &mut f64| {
            *running += adjustment.amount;
            adjustments.push(adjustment);
        };

        if preferences.special_needs {
            let rate = self.config.special_needs_rate;
            let amount = running * rate;
            push(
                PriceAdjustment::new(
                    AdjustmentKind::SpecialNeeds,
                    amount,
                    format!("+{:.0}% for special needs support", rate * 100.0),
                ),
                &mut running,
            );
        }

        if let Some(children) = preferences.child_count.filter(|count| *count >= 2) {
            let per_child = running;
            let additional = f64::from(children - 1);
            let discounted = per_child * (1.0 - self.config.sibling_discount_rate);
            let charged = per_child + additional * discounted;
            let undiscounted = per_child * f64::from(children);

            push(
                PriceAdjustment::new(
                    AdjustmentKind::AdditionalChildren,
                    undiscounted - per_child,
                    format!("{} additional child(ren) at the full rate", children - 1),
                ),
                &mut running,
            );
            push(
                PriceAdjustment::new(
                    AdjustmentKind::SiblingDiscount,
                    charged - undiscounted,
                    format!(
                        "{:.0}% off each additional child ({children} children enrolled)",
                        self.config.sibling_discount_rate * 100.0
                    ),
                ),
                &mut running,
            );
            // running now equals `charged` up to rounding; pin it to the exact family total
            running = charged;
        }

        if let Some(days) = preferences
            .days_per_week
            .filter(|days| (1..FULL_TIME_DAYS).contains(days))
        {
            let full_time = running;
            let factor = self.config.part_time_factor(days);
            let daily_rate = full_time / f64::from(FULL_TIME_DAYS);
            let part_time = daily_rate * factor * f64::from(days);
            let proportional = full_time * f64::from(days) / f64::from(FULL_TIME_DAYS);

            push(
                PriceAdjustment::new(
                    AdjustmentKind::PartTimeSchedule,
                    proportional - full_time,
                    format!("{days}-day schedule prorated from a {FULL_TIME_DAYS}-day week"),
                ),
                &mut running,
            );
            push(
                PriceAdjustment::new(
                    AdjustmentKind::PartTimePremium,
                    part_time - proportional,
                    format!("{days} days/week billed at {factor:.2}× the daily rate"),
                ),
                &mut running,
            );
            running = part_time;
        }

        if preferences.security_features {
            push(
                PriceAdjustment::new(
                    AdjustmentKind::SecurityFeatures,
                    self.config.security_features_fee,
                    "Enhanced security features".to_string(),
                ),
                &mut running,
            );
        }

        if preferences.montessori && preferences.language_immersion {
            let rate = self.config.combined_program_rate;
            let amount = running * rate;
            push(
                PriceAdjustment::new(
                    AdjustmentKind::CombinedProgram,
                    amount,
                    format!("+{:.0}% for Montessori with language immersion", rate * 100.0),
                ),
                &mut running,
            );
        }

        PriceEstimateResult {
            facility_id: None,
            base_price,
            base_breakdown: None,
            adjustments,
            final_price: round_to_increment(running),
        }
    }
}

/// Rounds to the nearest multiple of five, half away from zero. Never negative.
pub fn round_to_increment(price: f64) -> u64 {
    if !price.is_finite() || price <= 0.0 {
        return 0;
    }
    let steps = (price / ROUNDING_INCREMENT).round();
    (steps * ROUNDING_INCREMENT) as u64
}

/// Convenience wrapper using the default rate table.
pub fn apply_adjustments(base_price: f64, preferences: &PricingPreferences) -> PriceEstimateResult {
    AdjustmentPipeline::default().apply(base_price, preferences)
}
