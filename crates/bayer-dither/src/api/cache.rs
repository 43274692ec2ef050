//! Single-slot memoization of [`dither`] results.

use std::sync::Arc;

use super::error::DitherError;
use crate::dither::{dither, DitherParams};
use crate::raster::Raster;

/// Hit/miss counters for a [`DitherCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cached entry
    pub hits: u64,
    /// Lookups that ran the dither pipeline
    pub misses: u64,
}

struct Entry {
    source: Arc<Raster>,
    params: DitherParams,
    result: Arc<Raster>,
}

/// Remembers the most recent `(source, params) -> result` computation.
///
/// The source is identified by its `Arc` allocation, not by content: swapping
/// in a freshly decoded image always misses even if the pixels happen to be
/// equal. Only successful computations are stored; a failing parameter set
/// leaves the previous entry untouched.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bayer_dither::{Channels, DitherCache, DitherParams, Raster};
///
/// let source = Arc::new(Raster::filled(8, 8, Channels::Luma, 128).unwrap());
/// let params = DitherParams::new();
/// let mut cache = DitherCache::new();
///
/// let first = cache.get_or_compute(&source, &params).unwrap();
/// let second = cache.get_or_compute(&source, &params).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.stats().hits, 1);
/// ```
#[derive(Default)]
pub struct DitherCache {
    entry: Option<Entry>,
    stats: CacheStats,
}

impl DitherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `(source, params)` or compute and store it.
    ///
    /// # Errors
    ///
    /// Propagates [`DitherError`] from [`dither`]. The cache is not modified
    /// on error.
    pub fn get_or_compute(
        &mut self,
        source: &Arc<Raster>,
        params: &DitherParams,
    ) -> Result<Arc<Raster>, DitherError> {
        if let Some(result) = self.lookup(source, params) {
            self.stats.hits += 1;
            return Ok(result);
        }

        let result = Arc::new(dither(source, params)?);
        self.stats.misses += 1;
        self.entry = Some(Entry {
            source: Arc::clone(source),
            params: *params,
            result: Arc::clone(&result),
        });
        Ok(result)
    }

    /// Whether a lookup for `(source, params)` would hit.
    pub fn is_cached(&self, source: &Arc<Raster>, params: &DitherParams) -> bool {
        self.lookup(source, params).is_some()
    }

    /// Drop the cached entry. Counters are kept.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn lookup(&self, source: &Arc<Raster>, params: &DitherParams) -> Option<Arc<Raster>> {
        self.entry
            .as_ref()
            .filter(|e| Arc::ptr_eq(&e.source, source) && e.params == *params)
            .map(|e| Arc::clone(&e.result))
    }
}

impl std::fmt::Debug for DitherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DitherCache")
            .field("params", &self.entry.as_ref().map(|e| e.params))
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InvalidParams;
    use crate::raster::Channels;

    fn source() -> Arc<Raster> {
        let data = (0..64u8).map(|i| i * 4).collect();
        Arc::new(Raster::new(8, 8, Channels::Luma, data).unwrap())
    }

    #[test]
    fn test_repeat_lookup_hits() {
        let src = source();
        let params = DitherParams::new().scale_factor(1);
        let mut cache = DitherCache::new();

        let a = cache.get_or_compute(&src, &params).unwrap();
        let b = cache.get_or_compute(&src, &params).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_param_change_recomputes() {
        let src = source();
        let mut cache = DitherCache::new();

        let a = cache.get_or_compute(&src, &DitherParams::new()).unwrap();
        let b = cache
            .get_or_compute(&src, &DitherParams::new().matrix_size(4))
            .unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats().misses, 2);
        assert!(!cache.is_cached(&src, &DitherParams::new()));
        assert!(cache.is_cached(&src, &DitherParams::new().matrix_size(4)));
    }

    #[test]
    fn test_new_source_allocation_misses() {
        let src = source();
        let copy = Arc::new((*src).clone());
        let params = DitherParams::new();
        let mut cache = DitherCache::new();

        cache.get_or_compute(&src, &params).unwrap();
        assert!(!cache.is_cached(&copy, &params));

        cache.get_or_compute(&copy, &params).unwrap();
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_error_leaves_entry_intact() {
        let src = source();
        let good = DitherParams::new();
        let mut cache = DitherCache::new();
        cache.get_or_compute(&src, &good).unwrap();

        let err = cache
            .get_or_compute(&src, &good.steps(1))
            .unwrap_err();
        assert_eq!(
            err,
            DitherError::InvalidParams(InvalidParams::TooFewSteps { steps: 1 })
        );

        assert!(cache.is_cached(&src, &good));
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1 });
    }

    #[test]
    fn test_invalidate() {
        let src = source();
        let params = DitherParams::new();
        let mut cache = DitherCache::new();

        cache.get_or_compute(&src, &params).unwrap();
        cache.invalidate();

        assert!(!cache.is_cached(&src, &params));
        cache.get_or_compute(&src, &params).unwrap();
        assert_eq!(cache.stats().misses, 2);
    }
}
