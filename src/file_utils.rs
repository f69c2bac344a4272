use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use log::warn;
use walkdir::{DirEntry, WalkDir};

use crate::errors::DocumentError;

// @module: File and directory utilities

// @struct: A note read from the vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    // @field: Location in the vault
    pub path: PathBuf,

    // @field: Raw markdown
    pub text: String,
}

impl Document {
    // @reads: Whole note as UTF-8
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @finds: Files with the given extension in walk order, pruning directories named in skip_dirs
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str, skip_dirs: &[String]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let extension = extension.trim_start_matches('.');

        let walker = WalkDir::new(dir.as_ref())
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !Self::is_skipped(entry, skip_dirs));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(e).with_context(|| format!("Failed to read directory: {:?}", dir.as_ref()));
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if entry.file_type().is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(extension) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    // @checks: Entry name is one of the skipped names (the root is never skipped)
    fn is_skipped(entry: &DirEntry, skip_dirs: &[String]) -> bool {
        entry.depth() > 0
            && skip_dirs
                .iter()
                .any(|skip| entry.file_name().to_string_lossy() == skip.as_str())
    }
}
