//! On-disk cache storage and cache-driven annotation.
//!
//! One store owns one cache directory holding up to three JSON files
//! (MAF, CNA, fusion). When an OncoTree code is given the directory is a
//! per-code subdirectory, because the same variant can carry different
//! clinical significance under different cancer types. Callers must not
//! mix OncoTree codes within one subdirectory across runs; nothing on
//! disk records which code populated it.

use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::entries::{CnaCache, FlatCache};
use crate::cache::key::{maf_row_key, CopyAlteration};
use crate::error::{AnnotatorError, Result};
use crate::info::ClinicalInfo;
use crate::schema::{
    ANNOTATED_HEADER, ANNOTATED_MAF, ANNOTATION_HEADERS, CNA_CACHE_FILE, CNA_OUTPUT_PREFIX,
    DATA_CNA_ANNOTATED, DATA_FUSIONS_ANNOTATED, FUSION_CACHE_FILE, MAF_CACHE_FILE, UNKNOWN,
};
use crate::tsv;

/// How a cache file load treats an absent file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLoadPolicy {
    /// The file must already exist; required before any apply-mode lookup
    MustExist,
    /// An absent file loads as an empty cache, to be populated and written
    OpenOrCreate,
}

/// Manager for one directory of JSON cache files.
#[derive(Debug)]
pub struct CacheStore {
    /// Directory holding the cache files; includes the per-code
    /// subdirectory when an OncoTree code was given
    cache_dir: PathBuf,
    maf_path: PathBuf,
    cna_path: PathBuf,
    fusion_path: PathBuf,
}

impl CacheStore {
    /// Open a cache store under `cache_base`, scoped to the lower-cased
    /// OncoTree code when one is given. The directory is created if
    /// absent; individual cache files need not exist until first write.
    pub fn new(cache_base: &Path, oncotree_code: Option<&str>) -> Result<Self> {
        let cache_dir = match oncotree_code {
            Some(code) => cache_base.join(code.to_lowercase()),
            None => cache_base.to_path_buf(),
        };

        if cache_dir.exists() {
            debug!("Using existing cache directory {}", cache_dir.display());
        } else {
            fs::create_dir_all(&cache_dir).map_err(|e| {
                AnnotatorError::Cache(format!(
                    "Failed to create cache directory '{}': {}",
                    cache_dir.display(),
                    e
                ))
            })?;
            debug!("Created cache directory {}", cache_dir.display());
        }

        let maf_path = cache_dir.join(MAF_CACHE_FILE);
        let cna_path = cache_dir.join(CNA_CACHE_FILE);
        let fusion_path = cache_dir.join(FUSION_CACHE_FILE);

        Ok(Self {
            cache_dir,
            maf_path,
            cna_path,
            fusion_path,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn maf_cache_path(&self) -> &Path {
        &self.maf_path
    }

    pub fn cna_cache_path(&self) -> &Path {
        &self.cna_path
    }

    pub fn fusion_cache_path(&self) -> &Path {
        &self.fusion_path
    }

    pub fn load_maf(&self, policy: CacheLoadPolicy) -> Result<FlatCache> {
        self.load_json(&self.maf_path, policy)
    }

    pub fn load_cna(&self, policy: CacheLoadPolicy) -> Result<CnaCache> {
        self.load_json(&self.cna_path, policy)
    }

    pub fn load_fusion(&self, policy: CacheLoadPolicy) -> Result<FlatCache> {
        self.load_json(&self.fusion_path, policy)
    }

    fn load_json<T>(&self, path: &Path, policy: CacheLoadPolicy) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if !path.exists() {
            return match policy {
                CacheLoadPolicy::MustExist => Err(AnnotatorError::MissingCacheFile {
                    path: path.display().to_string(),
                }),
                CacheLoadPolicy::OpenOrCreate => {
                    debug!("No existing cache file {}", path.display());
                    Ok(T::default())
                }
            };
        }
        let file = File::open(path).map_err(|e| {
            AnnotatorError::Cache(format!(
                "Failed to open cache file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            AnnotatorError::Cache(format!(
                "Failed to parse cache file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn save_json<T: Serialize>(&self, path: &Path, cache: &T, entries: usize) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            AnnotatorError::Cache(format!(
                "Failed to create cache file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, cache).map_err(|e| {
            AnnotatorError::Cache(format!(
                "Failed to write cache file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!(
            "Wrote {} annotations to cache file {}",
            entries,
            path.display()
        );
        Ok(())
    }

    /// Annotate a MAF file from the cache. Rows are keyed by the SHA-256
    /// digest of their pre-boundary columns; misses append the default
    /// annotations.
    pub fn annotate_maf(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(
            "Annotating MAF from cache: input {}, output {}",
            input.display(),
            output.display()
        );
        let cache = self.load_maf(CacheLoadPolicy::MustExist)?;
        self.annotate_flat(&cache, input, output, |row, boundary| {
            maf_row_key(&row[..boundary.min(row.len())])
        })
    }

    /// Annotate a fusion file from the cache. Rows are keyed by the
    /// fusion identifier in the second column; misses append the default
    /// annotations.
    pub fn annotate_fusion(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(
            "Annotating fusion from cache: input {}, output {}",
            input.display(),
            output.display()
        );
        let cache = self.load_fusion(CacheLoadPolicy::MustExist)?;
        self.annotate_flat(&cache, input, output, |row, _| {
            row.get(1).cloned().unwrap_or_default()
        })
    }

    /// Shared MAF/fusion apply path; the two differ only in key
    /// derivation. The first row fixes the annotation boundary and gains
    /// the annotation headers; every later row gains its cached or
    /// default annotations. Rows stream through one at a time.
    fn annotate_flat<F>(&self, cache: &FlatCache, input: &Path, output: &Path, key_for: F) -> Result<()>
    where
        F: Fn(&[String], usize) -> String,
    {
        let reader = tsv::open_maybe_gzip(input)?;
        let file = File::create(output)?;
        let mut writer = BufWriter::new(file);

        let mut boundary: Option<usize> = None;
        let mut from_cache = 0usize;
        let mut total = 0usize;
        for line in reader.lines() {
            let mut row = tsv::split_row(&line?);
            match boundary {
                None => {
                    boundary = Some(row.len());
                    row.extend(ANNOTATION_HEADERS.iter().map(|h| h.to_string()));
                }
                Some(boundary) => {
                    total += 1;
                    let key = key_for(&row, boundary);
                    if cache.contains(&key) {
                        from_cache += 1;
                    }
                    row.extend(cache.lookup_or_default(&key));
                }
            }
            writeln!(writer, "{}", row.join("\t"))?;
        }
        writer.flush()?;
        debug!("Found annotation for {} of {} variants", from_cache, total);
        Ok(())
    }

    /// Annotate a CNA file from the cache, strictly: every recognised
    /// (gene, alteration) pair must be cached, since only copy-number
    /// calls known to OncoKB are ever reported. Calls other than
    /// amplification or deletion are dropped from the output.
    pub fn annotate_cna(&self, input: &Path, output: &Path, info: &ClinicalInfo) -> Result<()> {
        debug!(
            "Annotating CNA from cache: input {}, output {}",
            input.display(),
            output.display()
        );
        let cache = self.load_cna(CacheLoadPolicy::MustExist)?;
        let reader = tsv::open_maybe_gzip(input)?;
        let file = File::create(output)?;
        let mut writer = BufWriter::new(file);

        let mut header_written = false;
        let mut written = 0usize;
        for line in reader.lines() {
            let row = tsv::split_row(&line?);
            if !header_written {
                header_written = true;
                let mut out: Vec<String> =
                    CNA_OUTPUT_PREFIX.iter().map(|h| h.to_string()).collect();
                out.extend(ANNOTATION_HEADERS.iter().map(|h| h.to_string()));
                writeln!(writer, "{}", out.join("\t"))?;
                continue;
            }
            let gene = match row.first() {
                Some(gene) => gene,
                None => continue,
            };
            let alteration = match row
                .get(1)
                .and_then(|call| call.parse::<i64>().ok())
                .and_then(CopyAlteration::from_call)
            {
                Some(alteration) => alteration,
                None => continue,
            };
            let annotations = cache.lookup_strict(gene, alteration)?;
            let mut out = vec![
                info.sample_id.clone(),
                info.oncotree_code.clone(),
                gene.clone(),
                alteration.label().to_string(),
            ];
            out.extend(annotations.iter().cloned());
            writeln!(writer, "{}", out.join("\t"))?;
            written += 1;
        }
        writer.flush()?;
        debug!("Wrote {} annotated CNA rows", written);
        Ok(())
    }

    /// Merge annotations from an annotated MAF into the MAF cache. The
    /// annotation boundary is located from the `ANNOTATED` header column;
    /// only rows with a gene actually in OncoKB are persisted. Existing
    /// entries for the same key are overwritten.
    pub fn write_maf_cache(&self, annotated: &Path) -> Result<()> {
        debug!(
            "Updating MAF cache from annotated file {}",
            annotated.display()
        );
        let mut cache = self.load_maf(CacheLoadPolicy::OpenOrCreate)?;
        let reader = tsv::open_maybe_gzip(annotated)?;

        let mut boundary: Option<usize> = None;
        for line in reader.lines() {
            let row = tsv::split_row(&line?);
            match boundary {
                None => {
                    let found = row.iter().position(|cell| cell == ANNOTATED_HEADER);
                    match found {
                        Some(index) => boundary = Some(index),
                        None => {
                            return Err(AnnotatorError::MalformedInput {
                                path: annotated.display().to_string(),
                                reason: format!(
                                    "cannot deduce annotation boundary; no {} column in header",
                                    ANNOTATED_HEADER
                                ),
                            })
                        }
                    }
                }
                Some(boundary) => {
                    let annotations: Vec<String> =
                        row.get(boundary..).unwrap_or_default().to_vec();
                    // GENE_IN_ONCOKB filter: unknown genes stay out of
                    // the cache so later knowledgebase updates can fill
                    // them in
                    if annotations.get(1).map(String::as_str) == Some("True") {
                        let key = maf_row_key(&row[..boundary.min(row.len())]);
                        cache.insert(key, annotations);
                    }
                }
            }
        }
        self.save_json(&self.maf_path, &cache, cache.len())
    }

    /// Merge annotations from an annotated CNA file into the CNA cache.
    /// The leading sample and cancer-type columns are not cached; lookup
    /// is by gene symbol and alteration label. Existing entries for the
    /// same pair are overwritten.
    pub fn write_cna_cache(&self, annotated: &Path) -> Result<()> {
        debug!("Writing CNA cache");
        let mut cache = self.load_cna(CacheLoadPolicy::OpenOrCreate)?;
        let reader = tsv::open_maybe_gzip(annotated)?;

        for line in reader.lines() {
            let row = tsv::split_row(&line?);
            let (gene, label) = match (row.get(2), row.get(3)) {
                (Some(gene), Some(label)) => (gene, label),
                _ => continue,
            };
            // skips the header row along with any unrecognised label
            let alteration = match CopyAlteration::from_label(label) {
                Some(alteration) => alteration,
                None => continue,
            };
            cache.insert(gene, alteration, row.get(4..).unwrap_or_default().to_vec());
        }
        self.save_json(&self.cna_path, &cache, cache.len())
    }

    /// Merge annotations from an annotated fusion file into the fusion
    /// cache. The sample column is not cached; lookup is by fusion
    /// identifier. Rows whose first annotation is the no-information
    /// `Unknown` value are not persisted, so later knowledgebase
    /// improvements are never masked by a cached non-finding.
    pub fn write_fusion_cache(&self, annotated: &Path) -> Result<()> {
        debug!("Writing fusion cache");
        let mut cache = self.load_fusion(CacheLoadPolicy::OpenOrCreate)?;
        let reader = tsv::open_maybe_gzip(annotated)?;

        let mut header_seen = false;
        for line in reader.lines() {
            let row = tsv::split_row(&line?);
            if !header_seen {
                header_seen = true;
                continue;
            }
            let fusion = match row.get(1) {
                Some(fusion) => fusion.clone(),
                None => continue,
            };
            let annotations: Vec<String> = row.get(2..).unwrap_or_default().to_vec();
            if annotations.first().is_some_and(|effect| effect != UNKNOWN) {
                cache.insert(fusion, annotations);
            }
        }
        self.save_json(&self.fusion_path, &cache, cache.len())
    }

    /// Update all three cache files from a report directory containing
    /// annotated outputs. The annotated MAF may sit in a `tmp`
    /// subdirectory (as report pipelines leave it) or directly in the
    /// report directory.
    pub fn update_from_report(&self, report_dir: &Path) -> Result<()> {
        let scratch_maf = report_dir.join("tmp").join(ANNOTATED_MAF);
        let maf = if scratch_maf.is_file() {
            scratch_maf
        } else {
            report_dir.join(ANNOTATED_MAF)
        };
        let cna = report_dir.join(DATA_CNA_ANNOTATED);
        let fusion = report_dir.join(DATA_FUSIONS_ANNOTATED);

        for path in [&maf, &cna, &fusion] {
            if !path.is_file() {
                return Err(AnnotatorError::FileNotFound {
                    path: path.display().to_string(),
                    reason: "annotated input missing; was the report generated with \
                             intermediate files kept?"
                        .to_string(),
                });
            }
        }

        self.write_cna_cache(&cna)?;
        self.write_fusion_cache(&fusion)?;
        self.write_maf_cache(&maf)?;
        Ok(())
    }
}
