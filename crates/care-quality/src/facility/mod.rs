//! Facility profile data model and the adapters that produce it.

pub(crate) mod coerce;
pub mod domain;
pub mod import;

pub use domain::{
    CategoryBreakdown, CategoryViolations, FacilityId, FacilityProfile, ParentReview, Severity,
    SeverityCounts, ViolationRecord,
};
pub use import::{FacilityCsvImporter, FacilityImportError};
