use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::facility::coerce;
use crate::facility::FacilityId;

/// Cost-of-living class of a facility's city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityTier {
    HighCost,
    Metro,
    Standard,
}

impl CityTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighCost => "High-cost metro",
            Self::Metro => "Metro",
            Self::Standard => "Standard",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Infant,
    Toddler,
    #[default]
    Preschool,
    SchoolAge,
}

impl AgeGroup {
    pub const fn ordered() -> [Self; 4] {
        [Self::Infant, Self::Toddler, Self::Preschool, Self::SchoolAge]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Infant => "Infant",
            Self::Toddler => "Toddler",
            Self::Preschool => "Preschool",
            Self::SchoolAge => "School-age",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();

        match normalized.as_str() {
            "infant" | "infants" => Some(Self::Infant),
            "toddler" | "toddlers" => Some(Self::Toddler),
            "preschool" | "prek" => Some(Self::Preschool),
            "schoolage" | "school" => Some(Self::SchoolAge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAgeGroup(pub String);

impl fmt::Display for UnknownAgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown age group '{}' (expected infant, toddler, preschool or school-age)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAgeGroup {}

impl FromStr for AgeGroup {
    type Err = UnknownAgeGroup;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| UnknownAgeGroup(raw.to_string()))
    }
}

fn lenient_age_group<'de, D>(deserializer: D) -> Result<Option<AgeGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => AgeGroup::parse(&raw),
        _ => None,
    })
}

/// Family-specific inputs to the adjustment pipeline. Anything left unset skips its adjustment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPreferences {
    #[serde(deserialize_with = "lenient_age_group", skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
    #[serde(deserialize_with = "coerce::flag")]
    pub special_needs: bool,
    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u32>,
    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub days_per_week: Option<u32>,
    #[serde(deserialize_with = "coerce::flag")]
    pub security_features: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub montessori: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub language_immersion: bool,
}

/// Pipeline steps in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    SpecialNeeds,
    AdditionalChildren,
    SiblingDiscount,
    PartTimeSchedule,
    PartTimePremium,
    SecurityFeatures,
    CombinedProgram,
}

impl AdjustmentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SpecialNeeds => "Special needs premium",
            Self::AdditionalChildren => "Additional children",
            Self::SiblingDiscount => "Sibling discount",
            Self::PartTimeSchedule => "Part-time schedule",
            Self::PartTimePremium => "Part-time premium",
            Self::SecurityFeatures => "Security features premium",
            Self::CombinedProgram => "Combined program premium",
        }
    }
}

/// One signed line of the estimate. `amount` is unrounded; `display_amount` is whole dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub kind: AdjustmentKind,
    pub name: String,
    pub amount: f64,
    pub display_amount: i64,
    pub description: String,
}

impl PriceAdjustment {
    pub(crate) fn new(kind: AdjustmentKind, amount: f64, description: String) -> Self {
        Self {
            kind,
            name: kind.label().to_string(),
            amount,
            display_amount: amount.round() as i64,
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramFeeLine {
    pub label: String,
    pub amount: f64,
}

/// Every factor that went into a base price, for the calculator breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseEstimate {
    pub city_tier: CityTier,
    pub city_rate: f64,
    pub age_group: AgeGroup,
    pub age_factor: f64,
    pub accreditation_factor: f64,
    pub capacity_factor: f64,
    pub program_fees: Vec<ProgramFeeLine>,
    pub base_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimateResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<FacilityId>,
    pub base_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_breakdown: Option<BaseEstimate>,
    pub adjustments: Vec<PriceAdjustment>,
    pub final_price: u64,
}

impl PriceEstimateResult {
    pub fn adjustment(&self, kind: AdjustmentKind) -> Option<&PriceAdjustment> {
        self.adjustments.iter().find(|entry| entry.kind == kind)
    }
}
