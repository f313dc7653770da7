use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::coerce;

/// Opaque registry identifier for a facility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(pub String);

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inspection severity buckets, most serious first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    MediumHigh,
    Medium,
    MediumLow,
    Low,
}

impl Severity {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::High,
            Self::MediumHigh,
            Self::Medium,
            Self::MediumLow,
            Self::Low,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::MediumHigh => "Medium High",
            Self::Medium => "Medium",
            Self::MediumLow => "Medium Low",
            Self::Low => "Low",
        }
    }

    /// Parses registry risk labels such as `"Medium High"`, `"medium-high"` or
    /// `"MEDIUM_HIGH_RISK"`. Unknown labels return `None` and are never guessed.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .to_ascii_lowercase()
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|word| !word.is_empty() && *word != "risk")
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "high" => Some(Self::High),
            "medium high" => Some(Self::MediumHigh),
            "medium" => Some(Self::Medium),
            "medium low" => Some(Self::MediumLow),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Violation counts per severity bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCounts {
    #[serde(deserialize_with = "coerce::count")]
    pub high_risk: u32,
    #[serde(deserialize_with = "coerce::count")]
    pub medium_high_risk: u32,
    #[serde(deserialize_with = "coerce::count")]
    pub medium_risk: u32,
    #[serde(deserialize_with = "coerce::count")]
    pub medium_low_risk: u32,
    #[serde(deserialize_with = "coerce::count")]
    pub low_risk: u32,
}

impl SeverityCounts {
    pub const fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::High => self.high_risk,
            Severity::MediumHigh => self.medium_high_risk,
            Severity::Medium => self.medium_risk,
            Severity::MediumLow => self.medium_low_risk,
            Severity::Low => self.low_risk,
        }
    }

    pub fn record(&mut self, severity: Severity, count: u32) {
        let slot = match severity {
            Severity::High => &mut self.high_risk,
            Severity::MediumHigh => &mut self.medium_high_risk,
            Severity::Medium => &mut self.medium_risk,
            Severity::MediumLow => &mut self.medium_low_risk,
            Severity::Low => &mut self.low_risk,
        };
        *slot = slot.saturating_add(count);
    }

    pub fn merge(&mut self, other: &SeverityCounts) {
        for severity in Severity::ordered() {
            self.record(severity, other.get(severity));
        }
    }

    pub fn total(&self) -> u32 {
        Severity::ordered()
            .into_iter()
            .fold(0u32, |total, severity| total.saturating_add(self.get(severity)))
    }
}

/// Severity counts attributed to one inspection category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryViolations {
    pub category: String,
    #[serde(flatten)]
    pub counts: SeverityCounts,
}

/// Ordered category breakdown. Document order is kept so that ties can be broken by the
/// category that appeared first; a repeated category is merged into its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBreakdown(Vec<CategoryViolations>);

impl CategoryBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: impl Into<String>, counts: SeverityCounts) {
        let category = category.into();
        match self.0.iter_mut().find(|entry| entry.category == category) {
            Some(entry) => entry.counts.merge(&counts),
            None => self.0.push(CategoryViolations { category, counts }),
        }
    }

    pub fn entries(&self) -> &[CategoryViolations] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn totals(&self) -> SeverityCounts {
        let mut totals = SeverityCounts::default();
        for entry in &self.0 {
            totals.merge(&entry.counts);
        }
        totals
    }
}

impl FromIterator<(String, SeverityCounts)> for CategoryBreakdown {
    fn from_iter<I: IntoIterator<Item = (String, SeverityCounts)>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for (category, counts) in iter {
            breakdown.add(category, counts);
        }
        breakdown
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.category, &entry.counts)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = CategoryBreakdown;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category to severity counts, or a list of categories")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut breakdown = CategoryBreakdown::new();
                while let Some((category, counts)) =
                    access.next_entry::<String, SeverityCounts>()?
                {
                    breakdown.add(category, counts);
                }
                Ok(breakdown)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut breakdown = CategoryBreakdown::new();
                while let Some(entry) = access.next_element::<CategoryViolations>()? {
                    breakdown.add(entry.category, entry.counts);
                }
                Ok(breakdown)
            }
        }

        deserializer.deserialize_any(BreakdownVisitor)
    }
}

/// Single inspection citation as exported by the licensing registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    #[serde(default = "uncategorized")]
    pub category: String,
    #[serde(default)]
    pub risk_level: String,
}

fn uncategorized() -> String {
    "Uncategorized".to_string()
}

/// Parent feedback entry. Unusable ratings decode to `None` and are ignored by the calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentReview {
    #[serde(deserialize_with = "coerce::rating_value")]
    pub rating_value: Option<f64>,
    #[serde(deserialize_with = "coerce::optional_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ParentReview {
    pub fn new(rating_value: f64) -> Self {
        Self {
            rating_value: Some(rating_value),
            submitted_at: None,
        }
    }
}

/// Everything the rating and pricing engines know about a facility.
///
/// Every field is optional on the wire. Missing data resolves to documented defaults inside the
/// engines rather than failing the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityProfile {
    #[serde(deserialize_with = "coerce::identifier")]
    pub facility_id: FacilityId,
    #[serde(deserialize_with = "coerce::optional_version", skip_serializing_if = "Option::is_none")]
    pub profile_version: Option<u64>,
    #[serde(deserialize_with = "coerce::text")]
    pub name: String,
    #[serde(deserialize_with = "coerce::optional_text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(deserialize_with = "coerce::optional_text", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub high_risk: Option<u32>,
    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub medium_high_risk: Option<u32>,
    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub medium_risk: Option<u32>,
    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub medium_low_risk: Option<u32>,
    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub low_risk: Option<u32>,
    #[serde(deserialize_with = "coerce::optional_breakdown", skip_serializing_if = "Option::is_none")]
    pub violations_by_category: Option<CategoryBreakdown>,
    #[serde(deserialize_with = "coerce::optional_records", skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<ViolationRecord>>,

    #[serde(deserialize_with = "coerce::optional_date", skip_serializing_if = "Option::is_none")]
    pub license_issuance_date: Option<NaiveDate>,
    #[serde(deserialize_with = "coerce::optional_years", skip_serializing_if = "Option::is_none")]
    pub years_in_operation: Option<f64>,
    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub inspections_passed: Option<u32>,

    #[serde(deserialize_with = "coerce::flag")]
    pub accredited: bool,
    #[serde(deserialize_with = "coerce::program_tags")]
    pub programs_provided: Vec<String>,
    #[serde(deserialize_with = "coerce::optional_text", skip_serializing_if = "Option::is_none")]
    pub staff_to_child_ratio: Option<String>,
    #[serde(deserialize_with = "coerce::optional_count", skip_serializing_if = "Option::is_none")]
    pub total_capacity: Option<u32>,

    #[serde(deserialize_with = "coerce::reviews")]
    pub reviews: Vec<ParentReview>,
}

impl FacilityProfile {
    pub fn new(facility_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            facility_id: FacilityId(facility_id.into()),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Direct severity counts, when at least one bucket was supplied.
    pub fn direct_counts(&self) -> Option<SeverityCounts> {
        let buckets = [
            self.high_risk,
            self.medium_high_risk,
            self.medium_risk,
            self.medium_low_risk,
            self.low_risk,
        ];
        if buckets.iter().all(Option::is_none) {
            return None;
        }

        Some(SeverityCounts {
            high_risk: self.high_risk.unwrap_or(0),
            medium_high_risk: self.medium_high_risk.unwrap_or(0),
            medium_risk: self.medium_risk.unwrap_or(0),
            medium_low_risk: self.medium_low_risk.unwrap_or(0),
            low_risk: self.low_risk.unwrap_or(0),
        })
    }

    pub fn set_counts(&mut self, counts: SeverityCounts) {
        self.high_risk = Some(counts.high_risk);
        self.medium_high_risk = Some(counts.medium_high_risk);
        self.medium_risk = Some(counts.medium_risk);
        self.medium_low_risk = Some(counts.medium_low_risk);
        self.low_risk = Some(counts.low_risk);
    }

    /// Case-insensitive check against the declared program tags.
    pub fn offers_program(&self, keyword: &str) -> bool {
        let keyword = keyword.to_ascii_lowercase();
        self.programs_provided
            .iter()
            .any(|program| program.to_ascii_lowercase().contains(&keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn severity_parses_registry_spellings() {
        assert_eq!(Severity::parse("Medium High"), Some(Severity::MediumHigh));
        assert_eq!(Severity::parse("medium-low"), Some(Severity::MediumLow));
        assert_eq!(Severity::parse("HIGH_RISK"), Some(Severity::High));
        assert_eq!(Severity::parse("Low Risk"), Some(Severity::Low));
        assert_eq!(Severity::parse("critical"), None);
        assert_eq!(Severity::parse(""), None);
    }

    #[test]
    fn profile_tolerates_malformed_counts() {
        let profile: FacilityProfile = serde_json::from_value(json!({
            "facility_id": "1490372",
            "name": "Little Oaks Learning Center",
            "high_risk": -3,
            "medium_risk": "4",
            "low_risk": null,
            "accredited": "Yes",
            "license_issuance_date": "not a date",
            "total_capacity": 48.0,
            "reviews": [{ "rating_value": "4.5" }, { "rating_value": "great" }]
        }))
        .expect("profile decodes");

        assert_eq!(profile.high_risk, Some(0));
        assert_eq!(profile.medium_risk, Some(4));
        assert_eq!(profile.low_risk, None);
        assert!(profile.accredited);
        assert_eq!(profile.license_issuance_date, None);
        assert_eq!(profile.total_capacity, Some(48));
        assert_eq!(profile.reviews[0].rating_value, Some(4.5));
        assert_eq!(profile.reviews[1].rating_value, None);

        let counts = profile.direct_counts().expect("direct counts present");
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn profile_tolerates_malformed_identity_and_list_fields() {
        let profile: FacilityProfile = serde_json::from_value(json!({
            "facility_id": 1490372,
            "profile_version": "3",
            "name": null,
            "zip_code": 78664,
            "programs_provided": "Montessori, Meals",
            "reviews": null,
            "violations_by_category": "none on file",
            "violations": [{ "category": "Safety", "risk_level": "High" }, 7]
        }))
        .expect("profile decodes");

        assert_eq!(profile.facility_id, FacilityId("1490372".to_string()));
        assert_eq!(profile.profile_version, Some(3));
        assert_eq!(profile.name, "");
        assert_eq!(profile.zip_code.as_deref(), Some("78664"));
        assert_eq!(profile.programs_provided, vec!["Montessori", "Meals"]);
        assert!(profile.reviews.is_empty());
        assert!(profile.violations_by_category.is_none());
        assert_eq!(profile.violations.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn reviews_accept_bare_numbers_and_skip_junk_entries() {
        let profile: FacilityProfile = serde_json::from_value(json!({
            "reviews": [4, "3.5", { "rating_value": 5 }, null, [1, 2]],
            "programs_provided": ["Meals; Transportation", 12, null]
        }))
        .expect("profile decodes");

        let ratings: Vec<_> = profile.reviews.iter().map(|review| review.rating_value).collect();
        assert_eq!(ratings, vec![Some(4.0), Some(3.5), Some(5.0)]);
        assert_eq!(profile.programs_provided, vec!["Meals", "Transportation", "12"]);
    }

    #[test]
    fn empty_profile_has_no_direct_counts() {
        let profile: FacilityProfile = serde_json::from_value(json!({})).expect("decodes");
        assert!(profile.direct_counts().is_none());
        assert!(profile.reviews.is_empty());
    }

    #[test]
    fn category_breakdown_keeps_document_order_and_merges_repeats() {
        let breakdown: CategoryBreakdown = serde_json::from_str(
            r#"{
                "Supervision": { "high_risk": 1 },
                "Safety": { "medium_risk": 2 },
                "Supervision": { "low_risk": 3 }
            }"#,
        )
        .expect("breakdown decodes");

        let names: Vec<_> = breakdown
            .entries()
            .iter()
            .map(|entry| entry.category.as_str())
            .collect();
        assert_eq!(names, vec!["Supervision", "Safety"]);
        assert_eq!(breakdown.entries()[0].counts.low_risk, 3);
        assert_eq!(breakdown.totals().total(), 6);

        let encoded = serde_json::to_value(&breakdown).expect("encodes");
        assert_eq!(encoded["Safety"]["medium_risk"], 2);
    }

    #[test]
    fn category_breakdown_accepts_list_form() {
        let breakdown: CategoryBreakdown = serde_json::from_value(json!([
            { "category": "Health", "medium_high_risk": 2 },
            { "category": "Records", "low_risk": "1" }
        ]))
        .expect("list decodes");

        assert_eq!(breakdown.entries().len(), 2);
        assert_eq!(breakdown.totals().medium_high_risk, 2);
        assert_eq!(breakdown.totals().low_risk, 1);
    }
}
