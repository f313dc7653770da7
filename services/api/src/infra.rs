use care_quality::assessment::{CacheError, RatingCache, RatingCacheKey};
use care_quality::rating::RatingResult;
use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Process-local rating memo keyed by facility, profile version and reference date.
///
/// Holds at most `capacity` entries, evicting the oldest insert first. Once a newer reference
/// date is seen, entries for earlier dates are dropped and late writes for them are ignored.
#[derive(Clone)]
pub(crate) struct InMemoryRatingCache {
    inner: Arc<Mutex<CacheEntries>>,
    capacity: usize,
}

#[derive(Default)]
struct CacheEntries {
    ratings: HashMap<RatingCacheKey, RatingResult>,
    order: VecDeque<RatingCacheKey>,
    latest_as_of: Option<NaiveDate>,
}

impl CacheEntries {
    fn advance_to(&mut self, as_of: NaiveDate) {
        self.latest_as_of = Some(as_of);
        let current = |key: &RatingCacheKey| key.as_of.map_or(true, |date| date >= as_of);
        self.ratings.retain(|key, _| current(key));
        self.order.retain(|key| current(key));
    }
}

impl Default for InMemoryRatingCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl InMemoryRatingCache {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheEntries::default())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheEntries>, CacheError> {
        self.inner
            .lock()
            .map_err(|_| CacheError::Unavailable("rating cache mutex poisoned".to_string()))
    }
}

impl RatingCache for InMemoryRatingCache {
    fn get(&self, key: &RatingCacheKey) -> Result<Option<RatingResult>, CacheError> {
        Ok(self.lock()?.ratings.get(key).cloned())
    }

    fn put(&self, key: RatingCacheKey, rating: RatingResult) -> Result<(), CacheError> {
        let mut entries = self.lock()?;

        if let Some(as_of) = key.as_of {
            match entries.latest_as_of {
                Some(latest) if as_of < latest => return Ok(()),
                Some(latest) if as_of == latest => {}
                _ => entries.advance_to(as_of),
            }
        }

        if entries.ratings.insert(key.clone(), rating).is_none() {
            entries.order.push_back(key);
        }
        while entries.ratings.len() > self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.ratings.remove(&oldest);
        }
        Ok(())
    }
}

#[cfg(test)]
impl InMemoryRatingCache {
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().map(|entries| entries.ratings.len()).unwrap_or(0)
    }
}

/// Tenure is measured against this date; callers that omit one get today.
pub(crate) fn reference_date(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
