//! Input directory scanning

use crate::IndexerError;
use clubhouse_domain::DocumentFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files found under an input directory, in path order
#[derive(Debug, Default)]
pub(crate) struct Discovery {
    /// Supported files with their format
    pub documents: Vec<(PathBuf, DocumentFormat)>,
    /// Files with an unsupported extension
    pub skipped: Vec<PathBuf>,
}

/// Walk `root` recursively, sorted by file name at each level
pub(crate) fn discover(root: &Path) -> Result<Discovery, IndexerError> {
    if !root.is_dir() {
        return Err(IndexerError::Io {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut discovery = Discovery::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        match DocumentFormat::from_path(&path) {
            Some(format) => discovery.documents.push((path, format)),
            None => {
                tracing::warn!(path = %path.display(), "Skipping unsupported file");
                discovery.skipped.push(path);
            }
        }
    }

    tracing::debug!(
        root = %root.display(),
        documents = discovery.documents.len(),
        skipped = discovery.skipped.len(),
        "Discovered input files"
    );
    Ok(discovery)
}
