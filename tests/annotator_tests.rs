//! Integration tests for annotator mode handling and tool orchestration
//!
//! Tests touching the token environment variable or PATH are serialised;
//! the live-tool tests stand a fake annotator script on the PATH instead
//! of the real oncokb-annotator package.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use oncokb_cache::cache::{maf_row_key, CacheLoadPolicy, CacheStore, FlatCache};
use oncokb_cache::config::{CacheMode, CacheParams};
use oncokb_cache::error::AnnotatorError;
use oncokb_cache::schema::{ANNOTATION_HEADERS, TOKEN_PATH_VAR};
use oncokb_cache::{tsv, Annotator};

fn apply_params(cache_dir: &Path) -> CacheParams {
    CacheParams::new(Some(cache_dir.to_path_buf()), true, false).unwrap()
}

fn update_params(cache_dir: &Path) -> CacheParams {
    CacheParams::new(Some(cache_dir.to_path_buf()), false, true).unwrap()
}

/// Point the token variable at a fresh token file
fn set_token_file(dir: &Path) -> PathBuf {
    let path = dir.join("oncokb_token.txt");
    fs::write(&path, "test-token\n").expect("Failed to write token file");
    env::set_var(TOKEN_PATH_VAR, &path);
    path
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .expect("Failed to read file")
        .lines()
        .map(tsv::split_row)
        .collect()
}

/// Manipulate PATH for one test, restoring the previous value on drop
struct PathGuard {
    saved: OsString,
}

impl PathGuard {
    fn prepend(dir: &Path) -> Self {
        let saved = env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![dir.to_path_buf()];
        paths.extend(env::split_paths(&saved));
        env::set_var("PATH", env::join_paths(paths).expect("Failed to join PATH"));
        Self { saved }
    }

    /// Replace PATH entirely, so no real tool can be found
    fn replace(dir: &Path) -> Self {
        let saved = env::var_os("PATH").unwrap_or_default();
        env::set_var("PATH", dir);
        Self { saved }
    }
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        env::set_var("PATH", &self.saved);
    }
}

/// Install a fake MafAnnotator.py that appends the annotation columns to
/// its input, standing in for the real oncokb-annotator script. Exits
/// non-zero when no token argument was passed.
#[cfg(unix)]
fn install_fake_maf_annotator(bin_dir: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let headers = ANNOTATION_HEADERS.join("\t");
    let values = {
        let mut all = vec!["True", "True", "True", "Gain-of-function"];
        all.resize(ANNOTATION_HEADERS.len(), "");
        all.join("\t")
    };
    let script = format!(
        "#!/bin/sh\n\
         while [ $# -gt 0 ]; do\n\
         \tcase \"$1\" in\n\
         \t\t-i) input=\"$2\"; shift 2 ;;\n\
         \t\t-o) output=\"$2\"; shift 2 ;;\n\
         \t\t-b) token=\"$2\"; shift 2 ;;\n\
         \t\t*) shift ;;\n\
         \tesac\n\
         done\n\
         [ -n \"$token\" ] || exit 1\n\
         awk 'BEGIN {{ FS = OFS = \"\\t\" }} \
         NR == 1 {{ print $0, \"{headers}\" }} \
         NR > 1 {{ print $0, \"{values}\" }}' \"$input\" > \"$output\"\n"
    );
    let path = bin_dir.join("MafAnnotator.py");
    fs::write(&path, script).expect("Failed to write fake annotator");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to set permissions");
}

mod modes {
    use super::*;

    #[test]
    #[serial]
    fn test_update_mode_requires_token() {
        env::remove_var(TOKEN_PATH_VAR);
        let temp = TempDir::new().unwrap();
        let report_dir = temp.path().join("report");
        fs::create_dir_all(&report_dir).unwrap();

        let err = Annotator::new(
            "SAMPLE-1",
            "PAAD",
            &report_dir,
            None,
            &update_params(&temp.path().join("cache")),
        )
        .unwrap_err();
        // the failure happens at construction, before any tool run
        assert!(matches!(err, AnnotatorError::Configuration(_)));
        assert!(err.to_string().contains(TOKEN_PATH_VAR));
    }

    #[test]
    #[serial]
    fn test_apply_mode_needs_no_token() {
        env::remove_var(TOKEN_PATH_VAR);
        let temp = TempDir::new().unwrap();
        let report_dir = temp.path().join("report");
        fs::create_dir_all(&report_dir).unwrap();

        let annotator = Annotator::new(
            "SAMPLE-1",
            "PAAD",
            &report_dir,
            None,
            &apply_params(&temp.path().join("cache")),
        )
        .unwrap();
        assert_eq!(annotator.cache_mode(), CacheMode::Apply);
    }

    #[test]
    #[serial]
    fn test_update_mode_missing_tool_is_fatal() {
        let temp = TempDir::new().unwrap();
        set_token_file(temp.path());
        let empty_bin = temp.path().join("bin");
        fs::create_dir_all(&empty_bin).unwrap();
        let _path = PathGuard::replace(&empty_bin);

        let report_dir = temp.path().join("report");
        fs::create_dir_all(&report_dir).unwrap();
        let annotator = Annotator::new(
            "SAMPLE-1",
            "PAAD",
            &report_dir,
            None,
            &update_params(&temp.path().join("cache")),
        )
        .unwrap();

        let input = report_dir.join("mutations.maf");
        fs::write(&input, "Chromosome\tAllele\nchr17\tG\n").unwrap();
        let err = annotator.annotate_maf(&input).unwrap_err();
        match err {
            AnnotatorError::AnnotationTool {
                description,
                detail,
            } => {
                assert_eq!(description, "MAF annotator");
                assert!(detail.contains("MafAnnotator.py"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        env::remove_var(TOKEN_PATH_VAR);
    }

    #[test]
    #[serial]
    fn test_fusion_fast_path_skips_missing_tool() {
        let temp = TempDir::new().unwrap();
        set_token_file(temp.path());
        // no tools anywhere on PATH: any invocation would fail
        let empty_bin = temp.path().join("bin");
        fs::create_dir_all(&empty_bin).unwrap();
        let _path = PathGuard::replace(&empty_bin);

        let report_dir = temp.path().join("report");
        fs::create_dir_all(&report_dir).unwrap();
        let cache_base = temp.path().join("cache");
        let annotator = Annotator::new(
            "SAMPLE-1",
            "PAAD",
            &report_dir,
            None,
            &update_params(&cache_base),
        )
        .unwrap();

        let input = report_dir.join("data_fusions_oncokb.txt");
        fs::write(&input, "Tumor_Sample_Barcode\tFusion\n").unwrap();
        let output = annotator.annotate_fusion(&input).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("Tumor_Sample_Barcode\tFusion\tmutation_effect"));
        assert_eq!(content.lines().count(), 1);
        // the fusion cache was not written either
        assert!(!cache_base.join("paad").join("fusion_cache.json").exists());

        env::remove_var(TOKEN_PATH_VAR);
    }

    #[test]
    fn test_biomarkers_apply_writes_to_explicit_output() {
        let temp = TempDir::new().unwrap();
        let report_dir = temp.path().join("report");
        fs::create_dir_all(&report_dir).unwrap();
        let cache_base = temp.path().join("cache");

        // seed a cache hit for one biomarker row
        let store = CacheStore::new(&cache_base, Some("PAAD")).unwrap();
        let mut cache = FlatCache::default();
        let mut cached = vec!["True".to_string(), "True".to_string(), "True".to_string()];
        cached.resize(ANNOTATION_HEADERS.len(), String::new());
        cache.insert(
            maf_row_key(&["TMB".to_string(), "10.5".to_string()]),
            cached,
        );
        serde_json::to_writer(fs::File::create(store.maf_cache_path()).unwrap(), &cache).unwrap();

        let annotator = Annotator::new(
            "SAMPLE-1",
            "PAAD",
            &report_dir,
            None,
            &apply_params(&cache_base),
        )
        .unwrap();

        let input = report_dir.join("biomarkers.maf");
        fs::write(&input, "Biomarker\tValue\nTMB\t10.5\nMSI\t3.1\n").unwrap();
        let output = report_dir.join("biomarkers_annotated.maf");
        annotator.annotate_biomarkers_maf(&input, &output).unwrap();

        let rows = read_rows(&output);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 2 + ANNOTATION_HEADERS.len());
        assert_eq!(rows[1][3], "True"); // cached hit: gene in OncoKB
        assert_eq!(rows[2][3], "False"); // miss: defaults
    }
}

#[cfg(unix)]
mod live_tool {
    use super::*;

    #[test]
    #[serial]
    fn test_update_mode_runs_tool_and_populates_cache() {
        let temp = TempDir::new().unwrap();
        set_token_file(temp.path());
        let bin_dir = temp.path().join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        install_fake_maf_annotator(&bin_dir);
        let _path = PathGuard::prepend(&bin_dir);

        let report_dir = temp.path().join("report");
        fs::create_dir_all(&report_dir).unwrap();
        let cache_base = temp.path().join("cache");
        let annotator = Annotator::new(
            "SAMPLE-1",
            "PAAD",
            &report_dir,
            None,
            &update_params(&cache_base),
        )
        .unwrap();

        let input = report_dir.join("mutations.maf");
        fs::write(
            &input,
            "Chromosome\tStart_Position\tAllele\nchr17\t7577120\tG\n",
        )
        .unwrap();
        let output = annotator.annotate_maf(&input).unwrap();
        assert_eq!(output, report_dir.join("annotated_maf.tsv"));

        let rows = read_rows(&output);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 3 + ANNOTATION_HEADERS.len());
        assert_eq!(rows[1][6], "Gain-of-function");

        // the tool output was merged straight into the per-code cache
        let store = CacheStore::new(&cache_base, Some("PAAD")).unwrap();
        let cache = store.load_maf(CacheLoadPolicy::MustExist).unwrap();
        let key = maf_row_key(&[
            "chr17".to_string(),
            "7577120".to_string(),
            "G".to_string(),
        ]);
        assert_eq!(cache.get(&key).unwrap()[3], "Gain-of-function");

        env::remove_var(TOKEN_PATH_VAR);
    }

    #[test]
    #[serial]
    fn test_live_mode_leaves_cache_untouched() {
        let temp = TempDir::new().unwrap();
        set_token_file(temp.path());
        let bin_dir = temp.path().join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        install_fake_maf_annotator(&bin_dir);
        let _path = PathGuard::prepend(&bin_dir);

        let report_dir = temp.path().join("report");
        fs::create_dir_all(&report_dir).unwrap();
        let annotator = Annotator::new(
            "SAMPLE-1",
            "PAAD",
            &report_dir,
            None,
            &CacheParams::default(),
        )
        .unwrap();
        assert_eq!(annotator.cache_mode(), CacheMode::Live);

        let input = report_dir.join("mutations.maf");
        fs::write(
            &input,
            "Chromosome\tStart_Position\tAllele\nchr17\t7577120\tG\n",
        )
        .unwrap();
        let output = annotator.annotate_maf(&input).unwrap();

        let rows = read_rows(&output);
        assert_eq!(rows[1][6], "Gain-of-function");
        // live mode never writes cache files anywhere
        assert!(!temp.path().join("cache").exists());

        env::remove_var(TOKEN_PATH_VAR);
    }
}
