//! Facade over rating and pricing, plus the HTTP surface that exposes it.

pub mod cache;
pub mod router;
mod service;

#[cfg(test)]
mod tests;

pub use cache::{CacheError, NoCache, RatingCache, RatingCacheKey};
pub use router::assessment_router;
pub use service::{FacilityAssessment, FacilityAssessmentService, RatingListingRow};
