//! OncoKB bearer token handling.
//!
//! The token is read from a file named by the `ONCOKB_TOKEN` environment
//! variable and wrapped in a type that never renders the raw value through
//! `Display` or `Debug`. The raw value is obtainable only via
//! [`AccessToken::reveal`], for building the tool command line.

use std::env;
use std::fmt;
use std::fs;

use crate::error::{AnnotatorError, Result};
use crate::schema::TOKEN_PATH_VAR;

/// Placeholder shown wherever a token would otherwise appear.
pub(crate) const REDACTED: &str = "***REDACTED***";

/// OncoKB API bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Read the token from the file named by the `ONCOKB_TOKEN` environment
    /// variable, trimming surrounding whitespace. Not required (and not
    /// called) in apply-cache mode.
    pub fn from_env() -> Result<Self> {
        let path = env::var(TOKEN_PATH_VAR).map_err(|_| {
            AnnotatorError::Configuration(format!(
                "environment variable {} must name a file holding the OncoKB token",
                TOKEN_PATH_VAR
            ))
        })?;
        let raw = fs::read_to_string(&path).map_err(|e| AnnotatorError::FileNotFound {
            path,
            reason: e.to_string(),
        })?;
        Ok(Self(raw.trim().to_string()))
    }

    /// The raw token value, for the subprocess command line only.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_display_and_debug_are_redacted() {
        let token = AccessToken("secret-value".to_string());
        assert_eq!(token.to_string(), "***REDACTED***");
        assert_eq!(format!("{:?}", token), "AccessToken(***REDACTED***)");
        assert_eq!(token.reveal(), "secret-value");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_and_trims_token_file() {
        let dir = TempDir::new().unwrap();
        let token_path = dir.path().join("token.txt");
        std::fs::write(&token_path, "abc123\n").unwrap();
        env::set_var(TOKEN_PATH_VAR, &token_path);

        let token = AccessToken::from_env().unwrap();
        assert_eq!(token.reveal(), "abc123");

        env::remove_var(TOKEN_PATH_VAR);
    }

    #[test]
    #[serial]
    fn test_from_env_fails_without_variable() {
        env::remove_var(TOKEN_PATH_VAR);
        let err = AccessToken::from_env().unwrap_err();
        assert!(err.to_string().contains(TOKEN_PATH_VAR));
    }

    #[test]
    #[serial]
    fn test_from_env_fails_when_token_file_missing() {
        let dir = TempDir::new().unwrap();
        let token_path = dir.path().join("absent.txt");
        env::set_var(TOKEN_PATH_VAR, &token_path);

        let err = AccessToken::from_env().unwrap_err();
        assert!(matches!(err, AnnotatorError::FileNotFound { .. }));

        env::remove_var(TOKEN_PATH_VAR);
    }
}
