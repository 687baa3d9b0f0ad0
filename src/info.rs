//! Clinical info side-channel file.
//!
//! The external annotation scripts read sample identity from a small
//! tab-delimited file: a `SAMPLE_ID\tONCOTREE_CODE` header and exactly one
//! data row. Cache-only CNA annotation reads the same file back to fill
//! the leading output columns.

use std::fs::File;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::error::{AnnotatorError, Result};
use crate::tsv;

const SAMPLE_ID_COLUMN: &str = "SAMPLE_ID";
const ONCOTREE_CODE_COLUMN: &str = "ONCOTREE_CODE";

/// Sample identity passed to the external tool alongside each input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicalInfo {
    pub sample_id: String,
    pub oncotree_code: String,
}

impl ClinicalInfo {
    pub fn new(sample_id: &str, oncotree_code: &str) -> Self {
        Self {
            sample_id: sample_id.to_string(),
            oncotree_code: oncotree_code.to_string(),
        }
    }

    /// Write the two-line info file consumed by the annotation scripts.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "{}\t{}", SAMPLE_ID_COLUMN, ONCOTREE_CODE_COLUMN)?;
        writeln!(file, "{}\t{}", self.sample_id, self.oncotree_code)?;
        Ok(())
    }

    /// Read an info file back, validating the row count. Columns are
    /// located by header name, not position.
    pub fn read(path: &Path) -> Result<Self> {
        let malformed = |reason: String| AnnotatorError::MalformedInput {
            path: path.display().to_string(),
            reason,
        };

        let reader = tsv::open_maybe_gzip(path)?;
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => tsv::split_row(&line?),
            None => return Err(malformed("empty clinical info file".to_string())),
        };
        let sample_col = header
            .iter()
            .position(|c| c == SAMPLE_ID_COLUMN)
            .ok_or_else(|| malformed(format!("no {} column", SAMPLE_ID_COLUMN)))?;
        let code_col = header
            .iter()
            .position(|c| c == ONCOTREE_CODE_COLUMN)
            .ok_or_else(|| malformed(format!("no {} column", ONCOTREE_CODE_COLUMN)))?;

        let mut found: Option<ClinicalInfo> = None;
        for line in lines {
            let row = tsv::split_row(&line?);
            if found.is_some() {
                return Err(malformed(
                    "expected exactly one data row of clinical info".to_string(),
                ));
            }
            match (row.get(sample_col), row.get(code_col)) {
                (Some(sample), Some(code)) => found = Some(ClinicalInfo::new(sample, code)),
                _ => {
                    return Err(malformed(
                        "could not read sample ID and OncoTree code".to_string(),
                    ))
                }
            }
        }
        found.ok_or_else(|| malformed("no data row of clinical info".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oncokb_clinical_info.txt");
        let info = ClinicalInfo::new("100-PM-013_LCM5", "PAAD");
        info.write(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "SAMPLE_ID\tONCOTREE_CODE\n100-PM-013_LCM5\tPAAD\n");
        assert_eq!(ClinicalInfo::read(&path).unwrap(), info);
    }

    #[test]
    fn test_read_accepts_reordered_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("info.txt");
        std::fs::write(&path, "ONCOTREE_CODE\tSAMPLE_ID\nPAAD\tSAMPLE-1\n").unwrap();

        let info = ClinicalInfo::read(&path).unwrap();
        assert_eq!(info.sample_id, "SAMPLE-1");
        assert_eq!(info.oncotree_code, "PAAD");
    }

    #[test]
    fn test_read_rejects_multiple_data_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("info.txt");
        std::fs::write(
            &path,
            "SAMPLE_ID\tONCOTREE_CODE\nSAMPLE-1\tPAAD\nSAMPLE-2\tPAAD\n",
        )
        .unwrap();

        let err = ClinicalInfo::read(&path).unwrap_err();
        assert!(matches!(err, AnnotatorError::MalformedInput { .. }));
        assert!(err.to_string().contains("exactly one data row"));
    }

    #[test]
    fn test_read_rejects_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("info.txt");
        std::fs::write(&path, "SAMPLE_ID\nSAMPLE-1\n").unwrap();

        let err = ClinicalInfo::read(&path).unwrap_err();
        assert!(err.to_string().contains("ONCOTREE_CODE"));
    }

    #[test]
    fn test_read_rejects_header_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("info.txt");
        std::fs::write(&path, "SAMPLE_ID\tONCOTREE_CODE\n").unwrap();

        let err = ClinicalInfo::read(&path).unwrap_err();
        assert!(matches!(err, AnnotatorError::MalformedInput { .. }));
    }
}
