//! Error types for the pdg2pdf library.
//!
//! Every failure in the pipeline is fatal: a single unreadable page aborts
//! the whole run. All variants live in one enum, [`Pdg2PdfError`], returned
//! as `Err` from [`crate::convert()`] and the pipeline stages. The reordering
//! core never fails and has no error type.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdg2pdf library.
#[derive(Debug, Error)]
pub enum Pdg2PdfError {
    // ── Source errors ─────────────────────────────────────────────────────
    /// The source directory does not exist.
    #[error("the folder '{path}' does not exist")]
    DirectoryNotFound { path: PathBuf },

    /// The source path exists but is not a directory.
    #[error("'{path}' is not a folder")]
    NotADirectory { path: PathBuf },

    /// No files with the source extension were found.
    #[error("no .{extension} files found in the folder '{dir}'")]
    NoMatchingSourceFiles { dir: PathBuf, extension: String },

    /// A page file name is not valid UTF-8, so its role cannot be read.
    #[error("the file name '{path}' is not valid UTF-8")]
    NonUtf8FileName { path: PathBuf },

    /// Listing a directory or reading a file failed.
    #[error("failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Staging errors ────────────────────────────────────────────────────
    /// The timestamped scratch directory could not be created.
    #[error("failed to create scratch folder in '{path}': {source}")]
    ScratchDirCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a source page into the scratch directory failed.
    #[error("failed to copy '{from}' to '{to}': {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing embedded metadata from a staged page failed.
    #[error("failed to delete the EXIF data from '{path}': {detail}")]
    MetadataStripFailed { path: PathBuf, detail: String },

    /// Staging produced no files with the target extension.
    #[error("no .{extension} files found in the folder '{dir}'")]
    NoMatchingIntermediateFiles { dir: PathBuf, extension: String },

    // ── Assembly errors ───────────────────────────────────────────────────
    /// A staged page is not a JPEG the assembler can embed.
    #[error("'{path}' is not a usable JPEG page: {detail}")]
    InvalidPageImage { path: PathBuf, detail: String },

    /// The PDF could not be built or written.
    #[error("failed to assemble '{path}': {detail}")]
    AssemblyFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
