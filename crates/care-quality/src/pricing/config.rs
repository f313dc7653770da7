use serde::{Deserialize, Serialize};

/// Monthly multipliers per age group, applied to the city rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeFactors {
    pub infant: f64,
    pub toddler: f64,
    pub preschool: f64,
    pub school_age: f64,
}

/// Flat monthly fee for a program tag that implies extra staffing or services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramFee {
    /// Matched case-insensitively as a substring of the declared program tags.
    pub keyword: String,
    pub label: String,
    pub amount: f64,
}

/// Part-time daily-rate premium for a specific number of days per week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartTimeFactor {
    pub days: u32,
    pub factor: f64,
}

/// Rate tables for base estimation and the adjustment pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub base_monthly_rate: f64,
    pub high_cost_cities: Vec<String>,
    pub high_cost_factor: f64,
    pub metro_cities: Vec<String>,
    pub metro_factor: f64,
    pub standard_factor: f64,
    pub age_factors: AgeFactors,
    pub accreditation_multiplier: f64,
    pub small_capacity_max: u32,
    pub small_capacity_multiplier: f64,
    /// Program keywords that qualify a small facility for the capacity premium.
    pub specialized_programs: Vec<String>,
    pub large_capacity_min: u32,
    pub large_capacity_multiplier: f64,
    pub program_fees: Vec<ProgramFee>,

    pub special_needs_rate: f64,
    pub sibling_discount_rate: f64,
    pub part_time_factors: Vec<PartTimeFactor>,
    pub part_time_default_factor: f64,
    pub security_features_fee: f64,
    pub combined_program_rate: f64,
}

impl PricingConfig {
    pub fn part_time_factor(&self, days: u32) -> f64 {
        self.part_time_factors
            .iter()
            .find(|entry| entry.days == days)
            .map(|entry| entry.factor)
            .unwrap_or(self.part_time_default_factor)
    }
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|name| name.to_string()).collect()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_monthly_rate: 850.0,
            high_cost_cities: names(&[
                "Austin",
                "Dallas",
                "Houston",
                "Plano",
                "Frisco",
                "Southlake",
                "Sugar Land",
                "The Woodlands",
            ]),
            high_cost_factor: 1.25,
            metro_cities: names(&[
                "San Antonio",
                "Fort Worth",
                "Arlington",
                "Irving",
                "Round Rock",
                "Richardson",
                "McKinney",
                "Cedar Park",
                "Katy",
                "Pearland",
            ]),
            metro_factor: 1.10,
            standard_factor: 1.0,
            age_factors: AgeFactors {
                infant: 1.45,
                toddler: 1.35,
                preschool: 1.20,
                school_age: 1.10,
            },
            accreditation_multiplier: 1.08,
            small_capacity_max: 24,
            small_capacity_multiplier: 1.05,
            specialized_programs: names(&[
                "montessori",
                "language",
                "immersion",
                "special needs",
                "reggio",
                "waldorf",
            ]),
            large_capacity_min: 150,
            large_capacity_multiplier: 0.97,
            program_fees: vec![
                ProgramFee {
                    keyword: "meal".to_string(),
                    label: "Meals included".to_string(),
                    amount: 45.0,
                },
                ProgramFee {
                    keyword: "transport".to_string(),
                    label: "Transportation".to_string(),
                    amount: 75.0,
                },
                ProgramFee {
                    keyword: "extended".to_string(),
                    label: "Extended hours".to_string(),
                    amount: 60.0,
                },
            ],
            special_needs_rate: 0.15,
            sibling_discount_rate: 0.10,
            part_time_factors: vec![
                PartTimeFactor {
                    days: 2,
                    factor: 1.25,
                },
                PartTimeFactor {
                    days: 3,
                    factor: 1.15,
                },
                PartTimeFactor {
                    days: 4,
                    factor: 1.08,
                },
            ],
            part_time_default_factor: 1.10,
            security_features_fee: 120.0,
            combined_program_rate: 0.10,
        }
    }
}
