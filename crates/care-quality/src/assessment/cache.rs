use chrono::NaiveDate;

use crate::facility::{FacilityId, FacilityProfile};
use crate::rating::RatingResult;

/// Memo key for a rating. Only profiles that carry a `profile_version` are cacheable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RatingCacheKey {
    pub facility_id: FacilityId,
    pub profile_version: u64,
    pub as_of: Option<NaiveDate>,
}

impl RatingCacheKey {
    pub fn for_profile(profile: &FacilityProfile, as_of: Option<NaiveDate>) -> Option<Self> {
        if profile.facility_id.0.is_empty() {
            return None;
        }
        Some(Self {
            facility_id: profile.facility_id.clone(),
            profile_version: profile.profile_version?,
            as_of,
        })
    }
}

/// Optional memoization hook for computed ratings.
///
/// Implementations are an optimisation only; the service recomputes whenever the cache misses or
/// fails.
pub trait RatingCache: Send + Sync {
    fn get(&self, key: &RatingCacheKey) -> Result<Option<RatingResult>, CacheError>;
    fn put(&self, key: RatingCacheKey, rating: RatingResult) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("rating cache unavailable: {0}")]
    Unavailable(String),
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl RatingCache for NoCache {
    fn get(&self, _key: &RatingCacheKey) -> Result<Option<RatingResult>, CacheError> {
        Ok(None)
    }

    fn put(&self, _key: RatingCacheKey, _rating: RatingResult) -> Result<(), CacheError> {
        Ok(())
    }
}
