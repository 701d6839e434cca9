//! Day-keyed snapshot of the fetched roster. A same-day rerun renders from
//! the snapshot instead of hitting the directory API again.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::error::ExportResult;
use crate::model::Member;

fn cache_file(dir: &Path) -> PathBuf {
    dir.join(format!("{}.json", Utc::now().format("%Y-%m-%d")))
}

/// Load today's snapshot. Any read or parse failure counts as a miss.
pub fn load(dir: &Path) -> Option<Vec<Member>> {
    let path = cache_file(dir);
    let raw = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(members) => {
            debug!(path = %path.display(), "using cached roster");
            Some(members)
        }
        Err(_) => None,
    }
}

pub fn store(dir: &Path, members: &[Member]) -> ExportResult<()> {
    fs::create_dir_all(dir)?;
    let raw = serde_json::to_string(members)?;
    fs::write(cache_file(dir), raw)?;
    Ok(())
}
