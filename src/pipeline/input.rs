//! Input resolution: validate the source folder and list its page files.
//!
//! Listings are sorted by file name. `read_dir` order is filesystem-specific,
//! and the body of a book is whatever is left after the role tags are
//! extracted, so an unsorted listing would shuffle the content pages.

use crate::error::Pdg2PdfError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check that `path` is an existing directory and return its absolute form.
pub fn resolve_source_dir(path: &Path) -> Result<PathBuf, Pdg2PdfError> {
    if !path.exists() {
        return Err(Pdg2PdfError::DirectoryNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(Pdg2PdfError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let resolved = path
        .canonicalize()
        .map_err(|source| Pdg2PdfError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Resolved source folder: {}", resolved.display());
    Ok(resolved)
}

/// Names of the regular files in `dir` ending in `.{extension}`, sorted.
///
/// The suffix match is case-sensitive. Symlinks are followed, so a linked
/// page is listed like a regular one. A matching name that is not valid
/// UTF-8 is an error: role tags are matched on the name as text.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<String>, Pdg2PdfError> {
    let read_err = |source| Pdg2PdfError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    };
    let suffix = format!(".{extension}");

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        let name = match entry.file_name().into_string() {
            Ok(name) if name.ends_with(&suffix) => name,
            Ok(_) => continue,
            Err(raw) if raw.to_string_lossy().ends_with(&suffix) => {
                return Err(Pdg2PdfError::NonUtf8FileName { path });
            }
            Err(_) => continue,
        };

        let metadata = std::fs::metadata(&path)
            .map_err(|source| Pdg2PdfError::ReadFailed { path, source })?;
        if metadata.is_file() {
            names.push(name);
        }
    }

    names.sort();
    debug!("Found {} {} files in {}", names.len(), suffix, dir.display());
    Ok(names)
}

/// Like [`list_files`], failing with `NoMatchingSourceFiles` on an empty result.
pub fn list_source_files(dir: &Path, extension: &str) -> Result<Vec<String>, Pdg2PdfError> {
    let names = list_files(dir, extension)?;
    if names.is_empty() {
        return Err(Pdg2PdfError::NoMatchingSourceFiles {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    Ok(names)
}
