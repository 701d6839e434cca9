use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ExportResult;
use crate::ops;

/// Run the whole export: load config, fetch the roster, write the cards.
pub fn run(config_path: &Path, output_override: Option<PathBuf>) -> ExportResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(dir) = output_override {
        config.output_dir = Some(dir);
    }

    let stats = ops::run_export(&config)?;

    println!();
    println!(
        "Done: {} card(s) written to {}",
        stats.written,
        config.output_dir_or_default().display()
    );
    if stats.without_photo > 0 {
        println!("  {} card(s) written without a photo", stats.without_photo);
    }
    if stats.skipped > 0 {
        println!("  {} member(s) skipped (no usable name)", stats.skipped);
    }
    Ok(())
}
