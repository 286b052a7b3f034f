//! Staging: copy each `.pdg` page into the scratch folder as a `.jpg`.
//!
//! PDG pages are JPEG files under another extension, so staging is a plain
//! byte copy plus a rename. When requested, EXIF is stripped from the copy;
//! the source pages are never modified.

use crate::config::ConversionConfig;
use crate::error::Pdg2PdfError;
use crate::pipeline::exif;
use crate::progress::Stage;
use std::path::Path;
use tracing::{debug, info};

/// `name` with its `.{from}` suffix replaced by `.{to}`.
///
/// Names without the suffix just get `.{to}` appended.
pub fn staged_name(name: &str, from: &str, to: &str) -> String {
    let stem = name
        .strip_suffix(from)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(name);
    format!("{stem}.{to}")
}

/// Copy `names` from `source_dir` into `scratch_dir`, renamed to the target extension.
///
/// Fails on the first page that cannot be copied or stripped. Returns the
/// number of copies that had metadata removed.
pub fn stage_pages(
    source_dir: &Path,
    names: &[String],
    scratch_dir: &Path,
    config: &ConversionConfig,
) -> Result<usize, Pdg2PdfError> {
    let total = names.len();
    let cb = config.progress_callback.as_ref();
    info!("Conversion from {} started", Stage::Staging);
    if let Some(cb) = cb {
        cb.on_stage_start(Stage::Staging, total);
    }

    let mut stripped = 0;
    for (index, name) in names.iter().enumerate() {
        if let Some(cb) = cb {
            cb.on_page(Stage::Staging, index, total, name);
        }

        let from = source_dir.join(name);
        let to = scratch_dir.join(staged_name(
            name,
            &config.source_extension,
            &config.target_extension,
        ));
        std::fs::copy(&from, &to).map_err(|source| Pdg2PdfError::CopyFailed {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        debug!("Copied {} → {}", from.display(), to.display());

        if config.strip_metadata && exif::strip_exif_in_place(&to)? {
            stripped += 1;
        }
    }

    if let Some(cb) = cb {
        cb.on_stage_complete(Stage::Staging, total);
    }
    info!("Staged {} pages ({} had EXIF removed)", total, stripped);
    Ok(stripped)
}
