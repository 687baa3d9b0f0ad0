//! Configuration types for oncokb-cache

use std::path::{Path, PathBuf};

use crate::error::{AnnotatorError, Result};

/// The three mutually exclusive cache operating modes.
///
/// The mode is fixed when an annotator is constructed and never changes
/// mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve annotations from the persisted cache; the external tool is
    /// never invoked and no token is required
    Apply,
    /// Invoke the external tool, then merge its output into the cache
    Update,
    /// Invoke the external tool; leave the cache untouched
    #[default]
    Live,
}

/// Validated caching parameters, immutable after construction.
#[derive(Debug, Clone)]
pub struct CacheParams {
    /// Base cache directory; per-cancer-type subdirectories live below it
    cache_dir: Option<PathBuf>,

    /// Serve annotations from the cache instead of the live tool
    apply_cache: bool,

    /// Persist live tool output into the cache after each annotation
    update_cache: bool,
}

impl CacheParams {
    /// Validate and build cache parameters.
    ///
    /// Applying and updating in the same run are mutually exclusive, and
    /// either requires a cache directory.
    pub fn new(cache_dir: Option<PathBuf>, apply_cache: bool, update_cache: bool) -> Result<Self> {
        if apply_cache && update_cache {
            return Err(AnnotatorError::Configuration(
                "cannot apply and update the OncoKB cache in the same run".to_string(),
            ));
        }
        if (apply_cache || update_cache) && cache_dir.is_none() {
            return Err(AnnotatorError::Configuration(
                "cache apply/update requested without a cache directory".to_string(),
            ));
        }
        Ok(Self {
            cache_dir,
            apply_cache,
            update_cache,
        })
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    pub fn apply_cache(&self) -> bool {
        self.apply_cache
    }

    pub fn update_cache(&self) -> bool {
        self.update_cache
    }

    /// Resolve the flag pair into the closed mode enum. Callers dispatch on
    /// this once at construction instead of re-checking booleans.
    pub fn mode(&self) -> CacheMode {
        if self.apply_cache {
            CacheMode::Apply
        } else if self.update_cache {
            CacheMode::Update
        } else {
            CacheMode::Live
        }
    }
}

impl Default for CacheParams {
    /// Parameters for live annotation with no cache involvement.
    fn default() -> Self {
        Self {
            cache_dir: None,
            apply_cache: false,
            update_cache: false,
        }
    }
}

/// Run configuration consumed by the annotator factory.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Tumour sample identifier written to the clinical info file
    pub tumour_id: String,

    /// OncoTree cancer-type code; also scopes the cache subdirectory
    pub oncotree_code: String,

    /// Base cache directory, if caching is in play
    pub cache_dir: Option<PathBuf>,

    /// Serve annotations from the cache instead of the live tool
    pub apply_cache: bool,

    /// Persist live tool output into the cache
    pub update_cache: bool,
}

impl RunConfig {
    pub fn cache_params(&self) -> Result<CacheParams> {
        CacheParams::new(self.cache_dir.clone(), self.apply_cache, self.update_cache)
    }
}
