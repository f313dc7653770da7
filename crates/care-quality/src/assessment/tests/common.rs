use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::assessment::{
    assessment_router, CacheError, FacilityAssessmentService, NoCache, RatingCache,
    RatingCacheKey,
};
use crate::config::EngineConfig;
use crate::facility::{FacilityProfile, ParentReview, SeverityCounts};
use crate::rating::RatingResult;

/// Cache that records how often it was consulted.
#[derive(Default)]
pub(super) struct CountingCache {
    entries: Mutex<HashMap<RatingCacheKey, RatingResult>>,
    pub(super) hits: AtomicUsize,
    pub(super) puts: AtomicUsize,
}

impl CountingCache {
    pub(super) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub(super) fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl RatingCache for CountingCache {
    fn get(&self, key: &RatingCacheKey) -> Result<Option<RatingResult>, CacheError> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let found = entries.get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        Ok(found)
    }

    fn put(&self, key: RatingCacheKey, rating: RatingResult) -> Result<(), CacheError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(key, rating);
        Ok(())
    }
}

pub(super) struct UnavailableCache;

impl RatingCache for UnavailableCache {
    fn get(&self, _key: &RatingCacheKey) -> Result<Option<RatingResult>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    fn put(&self, _key: RatingCacheKey, _rating: RatingResult) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn service_with<C: RatingCache + 'static>(cache: Arc<C>) -> FacilityAssessmentService<C> {
    FacilityAssessmentService::new(EngineConfig::default(), cache)
}

pub(super) fn uncached_service() -> FacilityAssessmentService<NoCache> {
    service_with(Arc::new(NoCache))
}

pub(super) fn router() -> axum::Router {
    assessment_router(Arc::new(uncached_service()))
}

pub(super) fn profile(id: &str, name: &str) -> FacilityProfile {
    let mut profile = FacilityProfile::new(id, name);
    profile.city = Some("Austin".to_string());
    profile.total_capacity = Some(60);
    profile
}

pub(super) fn versioned_profile(version: u64) -> FacilityProfile {
    let mut profile = profile("1490372", "Little Oaks Learning Center");
    profile.profile_version = Some(version);
    profile.reviews = vec![ParentReview::new(4.0), ParentReview::new(5.0)];
    profile
}

pub(super) fn with_counts(mut profile: FacilityProfile, high: u32, low: u32) -> FacilityProfile {
    profile.set_counts(SeverityCounts {
        high_risk: high,
        low_risk: low,
        ..SeverityCounts::default()
    });
    profile
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
