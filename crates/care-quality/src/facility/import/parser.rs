use crate::facility::coerce;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Raw licensing-registry row with every cell kept as text until mapping.
#[derive(Debug, Deserialize)]
pub(crate) struct RegistryRow {
    #[serde(rename = "Operation ID", default, deserialize_with = "empty_string_as_none")]
    pub(crate) operation_id: Option<String>,
    #[serde(rename = "Operation Name", default)]
    pub(crate) operation_name: String,
    #[serde(rename = "City", default, deserialize_with = "empty_string_as_none")]
    pub(crate) city: Option<String>,
    #[serde(rename = "Zip", default, deserialize_with = "empty_string_as_none")]
    pub(crate) zip: Option<String>,
    #[serde(rename = "High Risk", default, deserialize_with = "empty_string_as_none")]
    pub(crate) high_risk: Option<String>,
    #[serde(rename = "Medium High Risk", default, deserialize_with = "empty_string_as_none")]
    pub(crate) medium_high_risk: Option<String>,
    #[serde(rename = "Medium Risk", default, deserialize_with = "empty_string_as_none")]
    pub(crate) medium_risk: Option<String>,
    #[serde(rename = "Medium Low Risk", default, deserialize_with = "empty_string_as_none")]
    pub(crate) medium_low_risk: Option<String>,
    #[serde(rename = "Low Risk", default, deserialize_with = "empty_string_as_none")]
    pub(crate) low_risk: Option<String>,
    #[serde(rename = "Accredited", default, deserialize_with = "empty_string_as_none")]
    pub(crate) accredited: Option<String>,
    #[serde(rename = "Programs Provided", default, deserialize_with = "empty_string_as_none")]
    pub(crate) programs_provided: Option<String>,
    #[serde(rename = "Total Capacity", default, deserialize_with = "empty_string_as_none")]
    pub(crate) total_capacity: Option<String>,
    #[serde(rename = "License Issue Date", default, deserialize_with = "empty_string_as_none")]
    pub(crate) license_issue_date: Option<String>,
    #[serde(rename = "Years In Operation", default, deserialize_with = "empty_string_as_none")]
    pub(crate) years_in_operation: Option<String>,
    #[serde(rename = "Inspections Passed", default, deserialize_with = "empty_string_as_none")]
    pub(crate) inspections_passed: Option<String>,
}

impl RegistryRow {
    pub(crate) fn count(cell: Option<&str>) -> Option<u32> {
        cell.and_then(coerce::count_from_str)
    }

    pub(crate) fn programs(&self) -> Vec<String> {
        self.programs_provided
            .as_deref()
            .map(coerce::program_tags_from_str)
            .unwrap_or_default()
    }
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RegistryRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    csv_reader.deserialize::<RegistryRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
