use crate::infra::{parse_date, reference_date};
use care_quality::assessment::{FacilityAssessment, FacilityAssessmentService, NoCache};
use care_quality::config::EngineConfig;
use care_quality::error::AppError;
use care_quality::facility::{CategoryBreakdown, FacilityProfile, ParentReview, SeverityCounts};
use care_quality::pricing::{AgeGroup, PriceEstimateResult, PricingPreferences};
use care_quality::rating::RatingResult;
use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for tenure (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Age group used for the price estimate
    #[arg(long)]
    pub(crate) age_group: Option<AgeGroup>,
    /// Number of children enrolled
    #[arg(long)]
    pub(crate) children: Option<u32>,
    /// Days per week (1-5)
    #[arg(long)]
    pub(crate) days: Option<u32>,
}

pub(crate) fn run_demo(args: DemoArgs, engine: EngineConfig) -> Result<(), AppError> {
    let service = FacilityAssessmentService::new(engine, Arc::new(NoCache));

    let as_of = reference_date(args.as_of);
    let profile = sample_facility();
    let preferences = PricingPreferences {
        age_group: Some(args.age_group.unwrap_or(AgeGroup::Toddler)),
        child_count: args.children.or(Some(2)),
        days_per_week: args.days,
        security_features: true,
        ..PricingPreferences::default()
    };

    let assessment = service.assess(&profile, Some(&preferences), Some(as_of));

    println!("Childcare quality demo");
    println!(
        "Facility: {} ({}) in {}",
        profile.name,
        profile.facility_id,
        profile.city.as_deref().unwrap_or("unknown city")
    );
    println!("Reference date: {as_of}");
    render_rating(&assessment.rating);
    render_price(&assessment);
    Ok(())
}

fn sample_facility() -> FacilityProfile {
    let mut profile = FacilityProfile::new("1490372", "Little Oaks Learning Center");
    profile.city = Some("Round Rock".to_string());
    profile.zip_code = Some("78664".to_string());
    profile.accredited = true;
    profile.total_capacity = Some(84);
    profile.inspections_passed = Some(3);
    profile.license_issuance_date = NaiveDate::from_ymd_opt(2016, 8, 15);
    profile.programs_provided = vec!["Meals Provided".to_string(), "Extended Hours".to_string()];
    profile.violations_by_category = Some(
        [
            (
                "Safety".to_string(),
                SeverityCounts {
                    medium_high_risk: 1,
                    low_risk: 2,
                    ..SeverityCounts::default()
                },
            ),
            (
                "Records".to_string(),
                SeverityCounts {
                    medium_low_risk: 2,
                    ..SeverityCounts::default()
                },
            ),
        ]
        .into_iter()
        .collect::<CategoryBreakdown>(),
    );
    profile.reviews = vec![
        ParentReview::new(4.5),
        ParentReview::new(5.0),
        ParentReview::new(3.5),
    ];
    profile
}

fn render_rating(rating: &RatingResult) {
    println!(
        "\nRating: {} {:.2} ({})",
        rating.stars,
        rating.score,
        rating.classification.label()
    );
    for component in &rating.explanation {
        println!(
            "  - {:<20} {:.2} x {:.0}%  {}",
            component.component.label(),
            component.score,
            component.weight * 100.0,
            component.notes
        );
    }

    let violations = &rating.component_scores.violations;
    println!("  Violations on record: {}", violations.total);
    if !rating.component_scores.top_categories.is_empty() {
        println!("  Top categories:");
        for category in &rating.component_scores.top_categories {
            println!(
                "    {} (weighted {:.0})",
                category.category, category.weighted_total
            );
        }
    }
}

fn render_price(assessment: &FacilityAssessment) {
    let Some(price) = assessment.price.as_ref() else {
        println!("\nPrice estimate: no preferences supplied");
        return;
    };

    println!("\nPrice estimate");
    render_base(price);
    for adjustment in &price.adjustments {
        println!(
            "  {:<28} {:>+7}  {}",
            adjustment.name, adjustment.display_amount, adjustment.description
        );
    }
    println!("  {:<28} {:>7}", "Estimated monthly total", price.final_price);
}

fn render_base(price: &PriceEstimateResult) {
    if let Some(base) = price.base_breakdown.as_ref() {
        println!(
            "  City tier: {} (${:.2})",
            base.city_tier.label(),
            base.city_rate
        );
        println!(
            "  Age group: {} (x{:.2})",
            base.age_group.label(),
            base.age_factor
        );
        println!(
            "  Accreditation x{:.2}, capacity x{:.2}",
            base.accreditation_factor, base.capacity_factor
        );
        for fee in &base.program_fees {
            println!("  {}: +${:.0}", fee.label, fee.amount);
        }
    }
    println!("  {:<28} {:>7.0}", "Base price", price.base_price);
}
