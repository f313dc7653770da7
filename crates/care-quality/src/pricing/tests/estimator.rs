use super::common::*;
use crate::pricing::{AgeGroup, CityTier, PricingPreferences};

#[test]
fn high_cost_city_preschool_base() {
    let base = estimator().estimate_base(&profile_in("Austin"));

    assert_eq!(base.city_tier, CityTier::HighCost);
    assert_eq!(base.age_group, AgeGroup::Preschool);
    assert_close(base.city_rate, 1062.5);
    assert_close(base.base_price, 1275.0);
    assert!(base.program_fees.is_empty());
}

#[test]
fn age_group_factor_scales_the_city_rate() {
    let estimator = estimator();
    let profile = profile_in("Fort Worth");

    let infant = estimator.estimate_base_for(&profile, AgeGroup::Infant);
    let school_age = estimator.estimate_base_for(&profile, AgeGroup::SchoolAge);

    assert_eq!(infant.city_tier, CityTier::Metro);
    assert_close(infant.base_price, 1355.75);
    assert_close(school_age.base_price, 1028.5);
    assert!(infant.base_price > school_age.base_price);
}

#[test]
fn unknown_or_missing_city_is_standard_tier() {
    let estimator = estimator();
    let mut profile = profile_in("Lubbock");
    assert_eq!(estimator.estimate_base(&profile).city_tier, CityTier::Standard);

    profile.city = None;
    let base = estimator.estimate_base(&profile);
    assert_eq!(base.city_tier, CityTier::Standard);
    assert_close(base.base_price, 1020.0);
}

#[test]
fn city_matching_ignores_case_and_spacing() {
    let estimator = estimator();
    assert_eq!(
        estimator.city_tier(Some("  the   WOODLANDS ")),
        CityTier::HighCost
    );
    assert_eq!(estimator.city_tier(Some("round rock")), CityTier::Metro);
    assert_eq!(estimator.city_tier(Some("   ")), CityTier::Standard);
}

#[test]
fn accreditation_capacity_and_programs_modify_the_base() {
    let mut profile = profile_in("Austin");
    profile.accredited = true;
    profile.total_capacity = Some(12);
    profile.programs_provided = vec![
        "Meals Provided".to_string(),
        "Extended Hours".to_string(),
        "Montessori".to_string(),
    ];

    let base = estimator().estimate_base(&profile);

    assert_eq!(base.accreditation_factor, 1.08);
    assert_eq!(base.capacity_factor, 1.05);
    let labels: Vec<_> = base.program_fees.iter().map(|fee| fee.label.as_str()).collect();
    assert_eq!(labels, vec!["Meals included", "Extended hours"]);
    assert_close(base.base_price, 1550.85);
}

#[test]
fn small_capacity_premium_requires_a_specialized_program() {
    let estimator = estimator();
    let mut profile = profile_in("Austin");
    profile.total_capacity = Some(12);
    profile.programs_provided = vec!["Meals Provided".to_string()];

    let general = estimator.estimate_base(&profile);
    assert_eq!(general.capacity_factor, 1.0);
    assert_close(general.base_price, 1320.0);

    profile.programs_provided.push("Spanish Language Immersion".to_string());
    let specialized = estimator.estimate_base(&profile);
    assert_eq!(specialized.capacity_factor, 1.05);
    assert_close(specialized.base_price, 1383.75);
}

#[test]
fn large_capacity_earns_a_scale_discount() {
    let mut profile = profile_in("Austin");
    profile.total_capacity = Some(220);

    let base = estimator().estimate_base(&profile);

    assert_eq!(base.capacity_factor, 0.97);
    assert_close(base.base_price, 1236.75);
}

#[test]
fn bare_profile_still_gets_a_base_price() {
    let profile = crate::facility::FacilityProfile::default();

    let result = estimator().estimate(&profile, &PricingPreferences::default());

    assert_close(result.base_price, 1020.0);
    assert_eq!(result.final_price, 1020);
    assert!(result.adjustments.is_empty());
}

#[test]
fn estimate_carries_breakdown_and_rounds() {
    let mut profile = profile_in("Lubbock");
    profile.programs_provided = vec!["Transportation".to_string()];
    let mut preferences = preferences();
    preferences.age_group = Some(AgeGroup::Toddler);
    preferences.security_features = true;

    let result = estimator().estimate(&profile, &preferences);

    let breakdown = result.base_breakdown.as_ref().expect("breakdown attached");
    assert_eq!(breakdown.age_group, AgeGroup::Toddler);
    assert_eq!(result.facility_id, Some(profile.facility_id.clone()));
    // 850 × 1.35 + 75 = 1222.5, + 120 = 1342.5 → 1345
    assert_close(result.base_price, 1222.5);
    assert_eq!(result.final_price, 1345);
    assert_eq!(result.final_price % 5, 0);
}

#[test]
fn age_group_parses_common_spellings() {
    assert_eq!(AgeGroup::parse("School-age"), Some(AgeGroup::SchoolAge));
    assert_eq!(AgeGroup::parse("infants"), Some(AgeGroup::Infant));
    assert_eq!(AgeGroup::parse("Pre-K"), Some(AgeGroup::Preschool));
    assert!("teen".parse::<AgeGroup>().is_err());
}
