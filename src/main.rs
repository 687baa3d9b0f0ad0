//! oncokb-cache - update OncoKB JSON cache files from an annotated report
//! directory
//!
//! Convenience command for cache maintenance; report pipelines drive the
//! same updates through the library's apply/update cache modes.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use oncokb_cache::cache::CacheStore;
use oncokb_cache::error::{AnnotatorError, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG overrides the verbosity flags when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.input_dir.is_dir() {
        return Err(AnnotatorError::Configuration(format!(
            "input directory '{}' does not exist",
            cli.input_dir.display()
        )));
    }
    let store = CacheStore::new(&cli.cache_dir, cli.oncotree_code.as_deref())?;
    store.update_from_report(&cli.input_dir)
}
