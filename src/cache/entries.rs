//! In-memory cache map types.
//!
//! Each type serializes transparently to the bare JSON object persisted
//! on disk. `BTreeMap` keeps rewritten cache files in a stable key order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::key::CopyAlteration;
use crate::error::{AnnotatorError, Result};
use crate::schema::DEFAULT_ANNOTATIONS;

/// Flat cache map used for MAF and fusion annotations: key (SHA-256
/// digest or fusion identifier) to the 27 annotation strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatCache(BTreeMap<String, Vec<String>>);

impl FlatCache {
    /// Insert an entry; an existing entry for the same key is replaced.
    pub fn insert(&mut self, key: String, annotations: Vec<String>) {
        self.0.insert(key, annotations);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Stored annotations on a hit, the fixed default vector otherwise.
    /// Missing keys are legitimate here: the variant simply is not in
    /// OncoKB.
    pub fn lookup_or_default(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(annotations) => annotations.clone(),
            None => DEFAULT_ANNOTATIONS.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Two-level CNA cache map: gene symbol to alteration label to the 27
/// annotation strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CnaCache(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl CnaCache {
    /// Insert an entry; an existing entry for the same (gene, alteration)
    /// pair is replaced.
    pub fn insert(&mut self, gene: &str, alteration: CopyAlteration, annotations: Vec<String>) {
        self.0
            .entry(gene.to_string())
            .or_default()
            .insert(alteration.label().to_string(), annotations);
    }

    /// Strict lookup. A missing pair is an error: only copy-number calls
    /// actually known to OncoKB may appear in a report, so there is no
    /// default fallback.
    pub fn lookup_strict(&self, gene: &str, alteration: CopyAlteration) -> Result<&[String]> {
        self.0
            .get(gene)
            .and_then(|alterations| alterations.get(alteration.label()))
            .map(Vec::as_slice)
            .ok_or_else(|| AnnotatorError::CacheMiss {
                gene: gene.to_string(),
                alteration: alteration.label().to_string(),
            })
    }

    /// Number of genes with at least one cached alteration.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
