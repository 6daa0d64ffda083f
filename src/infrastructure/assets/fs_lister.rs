//! Filesystem-backed directory lister.

use std::fs;
use std::path::Path;

use tracing::{trace, warn};

use crate::domain::ports::DirectoryLister;

/// Lists regular files with `std::fs`, following symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectoryLister;

impl DirectoryLister for FsDirectoryLister {
    fn list_files(&self, dir: &Path) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => {
                    trace!(path = %path.display(), "Ignoring non-file entry");
                    continue;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to stat directory entry");
                    continue;
                }
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    warn!(name = ?raw, "Skipping file with non UTF-8 name");
                }
            }
        }

        names.sort();
        Ok(names)
    }
}
