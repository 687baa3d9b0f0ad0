//! CLI argument parsing using clap

use std::path::PathBuf;

use clap::Parser;

/// Update OncoKB JSON cache files from an annotated report directory
#[derive(Parser, Debug)]
#[command(name = "oncokb-cache")]
#[command(version)]
#[command(
    about = "Update OncoKB JSON cache files from an annotated report directory",
    long_about = None
)]
pub struct Cli {
    /// Directory for the JSON cache files. With --oncotree-code the
    /// per-code subdirectory is created below this path; otherwise cache
    /// files are written here directly
    #[arg(short = 'c', long = "cache-dir", value_name = "PATH")]
    pub cache_dir: PathBuf,

    /// Report directory holding the annotated MAF, CNA and fusion
    /// outputs; intermediate files must have been kept
    #[arg(short = 'i', long = "input-dir", value_name = "PATH")]
    pub input_dir: PathBuf,

    /// OncoTree code scoping the cache subdirectory
    #[arg(long = "oncotree-code", value_name = "CODE")]
    pub oncotree_code: Option<String>,

    /// Debug logging
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Quiet mode; log errors only
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Default tracing filter from the verbosity flags; most verbose wins
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_required_arguments() {
        let cli = Cli::parse_from(["oncokb-cache", "-c", "/tmp/cache", "-i", "/tmp/report"]);
        assert_eq!(cli.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(cli.input_dir, PathBuf::from("/tmp/report"));
        assert!(cli.oncotree_code.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_cli_missing_cache_dir_is_error() {
        let result = Cli::try_parse_from(["oncokb-cache", "-i", "/tmp/report"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_oncotree_code() {
        let cli = Cli::parse_from([
            "oncokb-cache",
            "-c",
            "/tmp/cache",
            "-i",
            "/tmp/report",
            "--oncotree-code",
            "PAAD",
        ]);
        assert_eq!(cli.oncotree_code.as_deref(), Some("PAAD"));
    }

    #[test]
    fn test_cli_log_level_precedence() {
        let base = ["oncokb-cache", "-c", "/tmp/c", "-i", "/tmp/r"];

        let mut args = base.to_vec();
        args.push("-v");
        assert_eq!(Cli::parse_from(&args).log_level(), "info");

        let mut args = base.to_vec();
        args.push("-q");
        assert_eq!(Cli::parse_from(&args).log_level(), "error");

        // debug wins over quiet
        let mut args = base.to_vec();
        args.extend(["-d", "-q"]);
        assert_eq!(Cli::parse_from(&args).log_level(), "debug");
    }
}
