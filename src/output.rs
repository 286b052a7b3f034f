//! Result types returned by a conversion.

use crate::pipeline::reorder::PageLayoutSummary;
use serde::Serialize;
use std::path::PathBuf;

/// Summary of a finished conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Absolute path of the source folder.
    pub source_dir: PathBuf,
    /// Path the PDF was written to.
    pub output_path: PathBuf,
    /// Number of pages in the PDF.
    pub page_count: usize,
    /// Staged pages that actually had EXIF data removed.
    pub metadata_stripped: usize,
    /// Staged file names in the order they were added to the PDF.
    pub page_order: Vec<String>,
    /// Size of each role group.
    pub layout: PageLayoutSummary,
    /// Scratch folder, if it was kept on disk.
    pub scratch_dir: Option<PathBuf>,
    pub stats: ConversionStats,
}

/// Wall-clock timings of a conversion.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ConversionStats {
    /// Copying (and stripping) the source pages.
    pub staging_duration_ms: u64,
    /// Building and writing the PDF.
    pub assembly_duration_ms: u64,
    pub total_duration_ms: u64,
}
