//! Licensing-registry CSV adapter.
//!
//! Maps the registry's column headers onto the canonical [`FacilityProfile`] fields. This is the
//! only place upstream naming is known to the crate.

mod parser;

use crate::facility::coerce;
use crate::facility::domain::{FacilityId, FacilityProfile};
use parser::RegistryRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum FacilityImportError {
    #[error("failed to read facility export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid facility CSV data: {0}")]
    Csv(#[from] csv::Error),
}

pub struct FacilityCsvImporter;

impl FacilityCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<FacilityProfile>, FacilityImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<FacilityProfile>, FacilityImportError> {
        let rows = parser::parse_rows(reader)?;
        let total_rows = rows.len();

        let profiles: Vec<FacilityProfile> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let profile = map_row(row);
                if profile.is_none() {
                    warn!(row = index + 1, "skipping facility row without an operation id");
                }
                profile
            })
            .collect();

        debug!(rows = total_rows, imported = profiles.len(), "facility export parsed");
        Ok(profiles)
    }
}

fn map_row(row: RegistryRow) -> Option<FacilityProfile> {
    let facility_id = row.operation_id.clone()?;
    let programs_provided = row.programs();

    Some(FacilityProfile {
        facility_id: FacilityId(facility_id),
        name: row.operation_name.clone(),
        city: row.city.clone(),
        zip_code: row.zip.clone(),
        high_risk: RegistryRow::count(row.high_risk.as_deref()),
        medium_high_risk: RegistryRow::count(row.medium_high_risk.as_deref()),
        medium_risk: RegistryRow::count(row.medium_risk.as_deref()),
        medium_low_risk: RegistryRow::count(row.medium_low_risk.as_deref()),
        low_risk: RegistryRow::count(row.low_risk.as_deref()),
        license_issuance_date: row.license_issue_date.as_deref().and_then(coerce::date_from_str),
        years_in_operation: row
            .years_in_operation
            .as_deref()
            .and_then(coerce::real_from_str)
            .map(|years| years.max(0.0)),
        inspections_passed: RegistryRow::count(row.inspections_passed.as_deref()),
        accredited: row
            .accredited
            .as_deref()
            .map(coerce::flag_from_str)
            .unwrap_or(false),
        programs_provided,
        total_capacity: RegistryRow::count(row.total_capacity.as_deref()),
        ..FacilityProfile::default()
    })
}
