use std::path::PathBuf;

use log::warn;
use runagg_core::errors::{AggError, ErrorInfo};
use walkdir::WalkDir;

/// Checks that every root exists before any processing starts.
pub fn ensure_roots(roots: &[PathBuf]) -> Result<(), AggError> {
    if roots.is_empty() {
        return Err(AggError::Usage(ErrorInfo::new(
            "discover.no_roots",
            "at least one data directory is required",
        )));
    }
    for root in roots {
        if !root.is_dir() {
            return Err(AggError::Usage(
                ErrorInfo::new("discover.root", "unable to find data directory")
                    .with_context("path", root.display().to_string()),
            ));
        }
    }
    Ok(())
}

/// Lists replicate directories directly under each root.
///
/// Symlinked replicate directories are followed. Within a root, replicates
/// are returned sorted by name; roots keep the order they were given in.
pub fn discover_replicates(roots: &[PathBuf], marker: &str) -> Result<Vec<PathBuf>, AggError> {
    let mut replicates = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() > 0 => {
                    warn!("  - Skipping unreadable entry under {}: {err}", root.display());
                    continue;
                }
                Err(err) => {
                    return Err(AggError::Io(
                        ErrorInfo::new("discover.walk", "failed to list data directory")
                            .with_context("path", root.display().to_string())
                            .with_hint(err.to_string()),
                    ))
                }
            };
            if entry.file_type().is_dir() && entry.file_name().to_string_lossy().contains(marker) {
                replicates.push(entry.into_path());
            }
        }
    }
    Ok(replicates)
}
