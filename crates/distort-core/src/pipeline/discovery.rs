//! File discovery: the regular files directly inside the input directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::error::PipelineError;

/// Lists candidate files in an input directory.
///
/// Only immediate entries are considered. Subdirectories are never entered,
/// and symlinks and special files are counted as ignored.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Base name, reused for the destination
    pub file_name: OsString,
    /// File size in bytes
    pub size: u64,
}

/// Result of listing an input directory.
#[derive(Debug, Default)]
pub struct Listing {
    /// Regular files, in listing order (or by name when sorting is enabled)
    pub files: Vec<DiscoveredFile>,
    /// Entries that were not regular files or could not be inspected
    pub ignored: usize,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// List the regular files directly inside `dir`.
    ///
    /// Fails only when the directory itself cannot be opened.
    pub fn discover(&self, dir: &Path) -> Result<Listing, PipelineError> {
        std::fs::read_dir(dir).map_err(|e| PipelineError::InputDirectory {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);
        if self.config.sort_entries {
            walker = walker.sort_by_file_name();
        }

        let mut listing = Listing::default();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                    listing.ignored += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                tracing::trace!("Ignoring non-regular entry {:?}", entry.path());
                listing.ignored += 1;
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            listing.files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                file_name: entry.file_name().to_os_string(),
                size,
            });
        }

        Ok(listing)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
