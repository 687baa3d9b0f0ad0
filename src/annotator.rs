//! OncoKB annotation entry points and mode dispatch.
//!
//! An [`Annotator`] is constructed once per report run with a fixed
//! operating mode: serve annotations from the cache, call the live
//! annotation scripts and merge their output into the cache, or call the
//! scripts with the cache untouched. The mode never changes mid-run.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::{CacheMode, CacheParams, RunConfig};
use crate::error::{AnnotatorError, Result};
use crate::info::ClinicalInfo;
use crate::runner;
use crate::schema::{
    ANNOTATED_MAF, CLINICAL_INFO_FILE, CNA_ANNOTATOR, DATA_CNA_ANNOTATED, DATA_FUSIONS_ANNOTATED,
    FUSION_ANNOTATOR, FUSION_EMPTY_HEADERS, MAF_ANNOTATOR, MAF_QUERY_KEY,
};
use crate::token::AccessToken;
use crate::tsv;

/// Operating mode with exactly the resources each mode needs: no token
/// in apply mode, no cache store in live mode.
#[derive(Debug)]
enum Mode {
    Apply { cache: CacheStore },
    Update { cache: CacheStore, token: AccessToken },
    Live { token: AccessToken },
}

/// Annotates MAF, CNA and fusion files with OncoKB actionability data.
#[derive(Debug)]
pub struct Annotator {
    /// Input and persistent output directory
    report_dir: PathBuf,
    /// Directory for working files not needed in the final output
    scratch_dir: PathBuf,
    /// Clinical info side-channel file, written at construction
    info_path: PathBuf,
    mode: Mode,
}

impl Annotator {
    /// Build an annotator for one report run.
    ///
    /// Writes the clinical info file the external scripts read, resolves
    /// the operating mode from `cache_params`, and reads the bearer token
    /// when the mode calls the live tool. `scratch_dir` defaults to the
    /// report directory.
    pub fn new(
        tumour_id: &str,
        oncotree_code: &str,
        report_dir: &Path,
        scratch_dir: Option<&Path>,
        cache_params: &CacheParams,
    ) -> Result<Self> {
        if !report_dir.is_dir() {
            return Err(AnnotatorError::Configuration(format!(
                "report directory '{}' does not exist",
                report_dir.display()
            )));
        }
        let scratch_dir = scratch_dir.unwrap_or(report_dir);
        if !scratch_dir.is_dir() {
            return Err(AnnotatorError::Configuration(format!(
                "scratch directory '{}' does not exist",
                scratch_dir.display()
            )));
        }

        let info_path = scratch_dir.join(CLINICAL_INFO_FILE);
        ClinicalInfo::new(tumour_id, oncotree_code).write(&info_path)?;

        let mode = match cache_params.mode() {
            CacheMode::Apply => {
                debug!("Apply-cache enabled, no OncoKB access token required");
                Mode::Apply {
                    cache: Self::open_store(cache_params, oncotree_code)?,
                }
            }
            CacheMode::Update => Mode::Update {
                cache: Self::open_store(cache_params, oncotree_code)?,
                token: AccessToken::from_env()?,
            },
            CacheMode::Live => Mode::Live {
                token: AccessToken::from_env()?,
            },
        };

        Ok(Self {
            report_dir: report_dir.to_path_buf(),
            scratch_dir: scratch_dir.to_path_buf(),
            info_path,
            mode,
        })
    }

    /// Build an annotator from run configuration; the working directory
    /// serves as both report and scratch directory.
    pub fn from_config(work_dir: &Path, config: &RunConfig) -> Result<Self> {
        let cache_params = config.cache_params()?;
        debug!("OncoKB cache params: {:?}", cache_params);
        Self::new(
            &config.tumour_id,
            &config.oncotree_code,
            work_dir,
            None,
            &cache_params,
        )
    }

    fn open_store(cache_params: &CacheParams, oncotree_code: &str) -> Result<CacheStore> {
        // cache_params construction guarantees a directory in apply and
        // update modes
        let cache_dir = cache_params.cache_dir().ok_or_else(|| {
            AnnotatorError::Configuration(
                "cache mode requested without a cache directory".to_string(),
            )
        })?;
        CacheStore::new(cache_dir, Some(oncotree_code))
    }

    pub fn cache_mode(&self) -> CacheMode {
        match &self.mode {
            Mode::Apply { .. } => CacheMode::Apply,
            Mode::Update { .. } => CacheMode::Update,
            Mode::Live { .. } => CacheMode::Live,
        }
    }

    pub fn info_path(&self) -> &Path {
        &self.info_path
    }

    fn check_input(path: &Path) -> Result<()> {
        if path.is_file() {
            Ok(())
        } else {
            Err(AnnotatorError::FileNotFound {
                path: path.display().to_string(),
                reason: "input file does not exist".to_string(),
            })
        }
    }

    /// Invoke one of the annotation scripts with the standard argument
    /// set. The token argument is redacted from logging.
    fn run_script(
        &self,
        program: &str,
        input: &Path,
        output: &Path,
        query_key: Option<&str>,
        token: &AccessToken,
        description: &str,
    ) -> Result<()> {
        let mut args: Vec<&OsStr> = vec![
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
            OsStr::new("-c"),
            self.info_path.as_os_str(),
        ];
        if let Some(key) = query_key {
            args.push(OsStr::new("-q"));
            args.push(OsStr::new(key));
        }
        args.push(OsStr::new("-b"));
        args.push(OsStr::new(token.reveal()));
        runner::run_tool(program, &args, description, &["-b"])
    }

    /// Annotate a MAF file. The output lands in the scratch directory
    /// under the standard annotated-MAF name.
    pub fn annotate_maf(&self, input: &Path) -> Result<PathBuf> {
        Self::check_input(input)?;
        let output = self.scratch_dir.join(ANNOTATED_MAF);
        match &self.mode {
            Mode::Apply { cache } => cache.annotate_maf(input, &output)?,
            Mode::Update { cache, token } => {
                self.run_script(
                    MAF_ANNOTATOR,
                    input,
                    &output,
                    Some(MAF_QUERY_KEY),
                    token,
                    "MAF annotator",
                )?;
                cache.write_maf_cache(&output)?;
            }
            Mode::Live { token } => {
                self.run_script(
                    MAF_ANNOTATOR,
                    input,
                    &output,
                    Some(MAF_QUERY_KEY),
                    token,
                    "MAF annotator",
                )?;
            }
        }
        Ok(output)
    }

    /// Annotate a biomarker MAF to an explicit output path. Biomarker
    /// inputs lack the genomic-change column, so the script runs without
    /// a query key; cache handling matches [`Annotator::annotate_maf`].
    pub fn annotate_biomarkers_maf(&self, input: &Path, output: &Path) -> Result<PathBuf> {
        Self::check_input(input)?;
        match &self.mode {
            Mode::Apply { cache } => {
                debug!("Applying cache for biomarker annotation");
                cache.annotate_maf(input, output)?;
            }
            Mode::Update { cache, token } => {
                self.run_script(MAF_ANNOTATOR, input, output, None, token, "MAF annotator")?;
                debug!("Updating cache for biomarker annotation");
                cache.write_maf_cache(output)?;
            }
            Mode::Live { token } => {
                self.run_script(MAF_ANNOTATOR, input, output, None, token, "MAF annotator")?;
            }
        }
        Ok(output.to_path_buf())
    }

    /// Annotate a CNA file. The output name is the standard annotated-CNA
    /// stem prefixed with `extension`, in the report directory.
    pub fn annotate_cna(&self, input: &Path, extension: &str) -> Result<PathBuf> {
        Self::check_input(input)?;
        let output = self
            .report_dir
            .join(format!("{}{}", extension, DATA_CNA_ANNOTATED));
        match &self.mode {
            Mode::Apply { cache } => {
                let clinical_info = ClinicalInfo::read(&self.info_path)?;
                cache.annotate_cna(input, &output, &clinical_info)?;
            }
            Mode::Update { cache, token } => {
                self.run_script(CNA_ANNOTATOR, input, &output, None, token, "CNA annotator")?;
                cache.write_cna_cache(&output)?;
            }
            Mode::Live { token } => {
                self.run_script(CNA_ANNOTATOR, input, &output, None, token, "CNA annotator")?;
            }
        }
        Ok(output)
    }

    /// Annotate a fusion file. An input with no data rows short-circuits
    /// to a header-only output in every mode, without touching the tool
    /// or the cache. The output lands in the report directory.
    pub fn annotate_fusion(&self, input: &Path) -> Result<PathBuf> {
        Self::check_input(input)?;
        let output = self.report_dir.join(DATA_FUSIONS_ANNOTATED);

        let total = tsv::count_lines(input)?;
        if total <= 1 {
            info!("Fusion input is empty, writing empty annotated file");
            let header = FUSION_EMPTY_HEADERS.join("\t") + "\n";
            std::fs::write(&output, header)?;
            return Ok(output);
        }
        debug!("Read {} lines of fusion input", total);

        match &self.mode {
            Mode::Apply { cache } => cache.annotate_fusion(input, &output)?,
            Mode::Update { cache, token } => {
                self.run_script(
                    FUSION_ANNOTATOR,
                    input,
                    &output,
                    None,
                    token,
                    "fusion annotator",
                )?;
                cache.write_fusion_cache(&output)?;
            }
            Mode::Live { token } => {
                self.run_script(
                    FUSION_ANNOTATOR,
                    input,
                    &output,
                    None,
                    token,
                    "fusion annotator",
                )?;
            }
        }
        Ok(output)
    }
}
