//! Quality rating and price estimation for childcare facilities.
//!
//! The [`rating`] and [`pricing`] modules are pure: identical profiles always produce identical
//! results. Everything else in the crate (configuration, telemetry, the CSV importer, the
//! assessment service and its router) is the thin shell that feeds profiles into them.

pub mod assessment;
pub mod config;
pub mod error;
pub mod facility;
pub mod pricing;
pub mod rating;
pub mod telemetry;
