//! Conversion entry points.
//!
//! [`convert`] runs the whole pipeline for one source folder, sequentially
//! and fail-fast: the first error is returned and nothing after it runs. The
//! scratch folder is removed on every exit path (see
//! [`crate::pipeline::scratch`]).

use crate::config::ConversionConfig;
use crate::error::Pdg2PdfError;
use crate::output::{ConversionReport, ConversionStats};
use crate::pipeline::assemble::PdfAssembler;
use crate::pipeline::reorder::{layout_pages, RoleTag};
use crate::pipeline::scratch::ScratchDir;
use crate::pipeline::{input, stage};
use crate::progress::Stage;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert the `.pdg` pages of `config.source_dir` into one PDF.
///
/// # Errors
/// Returns the first failure of any step: a missing or invalid folder, no
/// pages, a page that cannot be copied, stripped, or embedded, or a PDF that
/// cannot be written.
pub fn convert(config: &ConversionConfig) -> Result<ConversionReport, Pdg2PdfError> {
    let total_start = Instant::now();

    // ── Step 1: Validate source folder ───────────────────────────────────
    let source_dir = input::resolve_source_dir(&config.source_dir)?;
    let output_path = config.output_path(&source_dir);
    info!("The target folder: {}", source_dir.display());
    info!("The name of output file: {}", output_path.display());

    // ── Step 2: List source pages ────────────────────────────────────────
    let sources = input::list_source_files(&source_dir, &config.source_extension)?;
    info!("Number of .{} files: {}", config.source_extension, sources.len());

    // ── Step 3: Scratch folder ───────────────────────────────────────────
    let scratch = ScratchDir::create(&source_dir, &config.scratch_prefix)?;

    // ── Step 4: Stage pages ──────────────────────────────────────────────
    let staging_start = Instant::now();
    let metadata_stripped = stage::stage_pages(&source_dir, &sources, scratch.path(), config)?;
    let staging_duration_ms = staging_start.elapsed().as_millis() as u64;

    // ── Step 5: Reorder and assemble ─────────────────────────────────────
    let assembly_start = Instant::now();
    let staged = list_staged(scratch.path(), &config.target_extension)?;
    let layout = layout_pages(staged);
    let summary = layout.summary();
    debug!("Page layout: {:?}", summary);
    let page_order = layout.into_sequence();

    let output_path = assemble(scratch.path(), &page_order, &output_path, config)?;
    let assembly_duration_ms = assembly_start.elapsed().as_millis() as u64;

    // ── Step 6: Clean up ─────────────────────────────────────────────────
    let scratch_dir = if config.keep_scratch {
        Some(scratch.keep())
    } else {
        scratch.close();
        None
    };

    let stats = ConversionStats {
        staging_duration_ms,
        assembly_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} pages, {}ms total",
        page_order.len(),
        stats.total_duration_ms
    );

    Ok(ConversionReport {
        source_dir,
        output_path,
        page_count: page_order.len(),
        metadata_stripped,
        page_order,
        layout: summary,
        scratch_dir,
        stats,
    })
}

/// [`convert`] with the source folder overridden by `dir`.
pub fn convert_dir(
    dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Pdg2PdfError> {
    let mut config = config.clone();
    config.source_dir = dir.as_ref().to_path_buf();
    convert(&config)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Staged page names in `dir`; an empty folder is an error.
fn list_staged(dir: &Path, extension: &str) -> Result<Vec<String>, Pdg2PdfError> {
    let staged = input::list_files(dir, extension)?;
    if staged.is_empty() {
        return Err(Pdg2PdfError::NoMatchingIntermediateFiles {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    Ok(staged)
}

/// Add `pages` from `dir` to a new PDF at `output`, in the given order.
fn assemble(
    dir: &Path,
    pages: &[String],
    output: &Path,
    config: &ConversionConfig,
) -> Result<std::path::PathBuf, Pdg2PdfError> {
    let total = pages.len();
    let cb = config.progress_callback.as_ref();
    info!("Conversion from {} started", Stage::Assembling);
    if let Some(cb) = cb {
        cb.on_stage_start(Stage::Assembling, total);
    }

    let mut pdf = PdfAssembler::create(output, config.dpi);
    for (index, name) in pages.iter().enumerate() {
        if let Some(cb) = cb {
            cb.on_page(Stage::Assembling, index, total, name);
        }
        debug!("Adding {} ({:?})", name, RoleTag::classify(name));
        pdf.add_page(&dir.join(name))?;
    }
    let written = pdf.finish()?;

    if let Some(cb) = cb {
        cb.on_stage_complete(Stage::Assembling, total);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::jpeg::tests::synthetic_jpeg;

    #[test]
    fn empty_staging_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stray.pdg"), b"x").unwrap();

        let err = list_staged(dir.path(), "jpg").unwrap_err();
        assert!(matches!(
            err,
            Pdg2PdfError::NoMatchingIntermediateFiles { ref extension, .. } if extension == "jpg"
        ));
    }

    #[test]
    fn staged_names_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.jpg", "c.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        assert_eq!(list_staged(dir.path(), "jpg").unwrap(), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn unreadable_page_leaves_no_scratch_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("000001.pdg"), synthetic_jpeg(2, 2, 3)).unwrap();
        std::fs::write(dir.path().join("000002.pdg"), b"garbage").unwrap();

        let config = ConversionConfig::builder()
            .source_dir(dir.path())
            .strip_metadata(true)
            .build()
            .unwrap();
        let err = convert(&config).unwrap_err();
        assert!(matches!(err, Pdg2PdfError::MetadataStripFailed { .. }), "got {err}");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn convert_dir_does_not_mutate_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConversionConfig::default();
        let err = convert_dir(dir.path().join("missing"), &config).unwrap_err();
        assert!(matches!(err, Pdg2PdfError::DirectoryNotFound { .. }));
        assert_eq!(config.source_dir, std::path::PathBuf::from("."));
    }
}
