//! Cache key derivation.
//!
//! MAF rows are keyed by a SHA-256 digest of the columns ahead of the
//! annotation boundary, so a key depends only on the variant itself and
//! never on annotation content. CNA entries are keyed by the composite
//! (gene symbol, alteration label). Fusion rows are keyed by their
//! literal fusion identifier and need no derivation.

use sha2::{Digest, Sha256};

/// Copy-number alteration labels the cache recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAlteration {
    Amplification,
    Deletion,
}

impl CopyAlteration {
    /// Map a raw CNA call value to its label: `2` is an amplification,
    /// `-2` a deletion, anything else is not annotated.
    pub fn from_call(call: i64) -> Option<Self> {
        match call {
            2 => Some(Self::Amplification),
            -2 => Some(Self::Deletion),
            _ => None,
        }
    }

    /// Parse an alteration label as it appears in annotated CNA output.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Amplification" => Some(Self::Amplification),
            "Deletion" => Some(Self::Deletion),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Amplification => "Amplification",
            Self::Deletion => "Deletion",
        }
    }
}

/// Key for a MAF row: lowercase hex SHA-256 of the tab-joined
/// pre-boundary columns, with any stray CR/LF characters stripped first
/// so the digest is stable across line-ending conventions.
pub fn maf_row_key(prefix: &[String]) -> String {
    let joined = prefix.join("\t").replace(&['\r', '\n'][..], "");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    format!("{:x}", hasher.finalize())
}
