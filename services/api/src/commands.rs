use crate::infra::{parse_date, reference_date};
use care_quality::assessment::{FacilityAssessmentService, NoCache, RatingListingRow};
use care_quality::config::EngineConfig;
use care_quality::error::AppError;
use care_quality::facility::{FacilityCsvImporter, FacilityProfile};
use care_quality::pricing::{AgeGroup, PricingPreferences};
use chrono::NaiveDate;
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RateArgs {
    /// Facility profile JSON file
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Reference date for tenure (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Facility profile JSON file
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Age group: infant, toddler, preschool or school-age
    #[arg(long)]
    pub(crate) age_group: Option<AgeGroup>,
    /// Number of children enrolled
    #[arg(long)]
    pub(crate) children: Option<u32>,
    /// Days per week (1-5)
    #[arg(long)]
    pub(crate) days: Option<u32>,
    #[arg(long)]
    pub(crate) special_needs: bool,
    #[arg(long)]
    pub(crate) security_features: bool,
    #[arg(long)]
    pub(crate) montessori: bool,
    /// Language immersion program
    #[arg(long)]
    pub(crate) language: bool,
}

impl EstimateArgs {
    pub(crate) fn preferences(&self) -> PricingPreferences {
        PricingPreferences {
            age_group: self.age_group,
            special_needs: self.special_needs,
            child_count: self.children,
            days_per_week: self.days,
            security_features: self.security_features,
            montessori: self.montessori,
            language_immersion: self.language,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Licensing-registry CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reference date for tenure (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn run_rate(args: RateArgs, engine: EngineConfig) -> Result<(), AppError> {
    let profile = load_profile(&args.profile)?;
    let rating = service(engine).rate(&profile, Some(reference_date(args.as_of)));
    println!("{}", serde_json::to_string_pretty(&rating)?);
    Ok(())
}

pub(crate) fn run_estimate(args: EstimateArgs, engine: EngineConfig) -> Result<(), AppError> {
    let profile = load_profile(&args.profile)?;
    let estimate = service(engine).estimate(&profile, &args.preferences());
    println!("{}", serde_json::to_string_pretty(&estimate)?);
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs, engine: EngineConfig) -> Result<(), AppError> {
    let profiles = FacilityCsvImporter::from_path(&args.csv)?;
    let rows = rate_import(&profiles, args.as_of, engine);

    println!("Rated {} facilities from {}", rows.len(), args.csv.display());
    for (rank, row) in rows.iter().enumerate() {
        println!("{}", render_listing_row(rank + 1, row));
    }
    Ok(())
}

pub(crate) fn load_profile(path: &Path) -> Result<FacilityProfile, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn render_listing_row(rank: usize, row: &RatingListingRow) -> String {
    format!(
        "{rank:>3}. {stars} {score:.2} {label:<9} {id:<10} {name} ({violations} violations)",
        stars = row.stars,
        score = row.score,
        label = row.classification.label(),
        id = row.facility_id.0,
        name = row.name,
        violations = row.total_violations,
    )
}

fn rate_import(
    profiles: &[FacilityProfile],
    as_of: Option<NaiveDate>,
    engine: EngineConfig,
) -> Vec<RatingListingRow> {
    service(engine).rate_listing(profiles, Some(reference_date(as_of)))
}

fn service(engine: EngineConfig) -> FacilityAssessmentService<NoCache> {
    FacilityAssessmentService::new(engine, Arc::new(NoCache))
}
