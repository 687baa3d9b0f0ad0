//! Tab-separated input handling with transparent gzip support.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{AnnotatorError, Result};

/// Open a text input for buffered line reading, decompressing on the fly
/// when the path carries a `.gz` suffix. The file is streamed, never
/// materialized in memory.
pub fn open_maybe_gzip(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| AnnotatorError::FileNotFound {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Split a line into tab-separated cells.
pub fn split_row(line: &str) -> Vec<String> {
    line.split('\t').map(str::to_string).collect()
}

/// Count the lines in a possibly gzip-compressed input.
pub fn count_lines(path: &Path) -> Result<usize> {
    let reader = open_maybe_gzip(path)?;
    let mut count = 0;
    for line in reader.lines() {
        line?;
        count += 1;
    }
    Ok(count)
}
