//! OncoKB annotation cache module
//!
//! This module provides persisted JSON caches of OncoKB annotation
//! results, allowing faster offline re-annotation of unchanged variants.
//! Stores are scoped by OncoTree code because identical variants can
//! differ in clinical significance across cancer types.

mod entries;
mod key;
mod store;

pub use entries::{CnaCache, FlatCache};
pub use key::{maf_row_key, CopyAlteration};
pub use store::{CacheLoadPolicy, CacheStore};
