//! Caching and orchestration layer for the OncoKB annotator scripts.
//!
//! Report pipelines hand tabular alteration data (MAF mutations, copy
//! number calls, fusions) to an [`Annotator`], which either shells out to
//! the oncokb-annotator tools or serves annotations from JSON cache files
//! scoped by OncoTree code. Update mode records fresh annotator output
//! back into the caches so later runs can work fully offline.

pub mod annotator;
pub mod cache;
pub mod config;
pub mod error;
pub mod info;
pub mod runner;
pub mod schema;
pub mod token;
pub mod tsv;

// Convenience re-exports
pub use annotator::Annotator;
pub use cache::{CacheLoadPolicy, CacheStore, CnaCache, CopyAlteration, FlatCache};
pub use config::{CacheMode, CacheParams, RunConfig};
pub use error::{AnnotatorError, Result};
pub use info::ClinicalInfo;
pub use token::AccessToken;
