//! Metadata stripping: drop EXIF segments from a staged page in place.
//!
//! Scanned pages often carry EXIF blocks with scanner make, timestamps and
//! embedded thumbnails. Only the APP1 segments that start with `Exif\0\0` are
//! removed; every other byte, including the compressed scan data, is kept
//! verbatim, so the image is never re-encoded and never grows.

use crate::error::Pdg2PdfError;
use crate::pipeline::jpeg::{self, JpegError};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Return `data` with every EXIF APP1 segment removed.
///
/// Input without EXIF comes back byte-identical.
pub fn strip_exif(data: &[u8]) -> Result<Vec<u8>, JpegError> {
    let header = jpeg::parse_header(data)?;

    let mut out = Vec::with_capacity(data.len());
    let mut cursor = 0;
    for segment in header.exif_segments() {
        out.extend_from_slice(&data[cursor..segment.span.start]);
        cursor = segment.span.end;
    }
    out.extend_from_slice(&data[cursor..]);
    Ok(out)
}

/// Strip EXIF from the JPEG at `path`, rewriting it only when something changed.
///
/// The new bytes go to a temp file in the same folder which is then renamed
/// over the original, so a failed write never leaves a half-written page.
/// Returns whether any metadata was removed.
pub fn strip_exif_in_place(path: &Path) -> Result<bool, Pdg2PdfError> {
    let strip_err = |detail: String| Pdg2PdfError::MetadataStripFailed {
        path: path.to_path_buf(),
        detail,
    };

    let data = std::fs::read(path).map_err(|e| strip_err(e.to_string()))?;
    let stripped = strip_exif(&data).map_err(|e| strip_err(e.to_string()))?;

    if stripped.len() == data.len() {
        debug!("No EXIF in {}", path.display());
        return Ok(false);
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| strip_err(e.to_string()))?;
    tmp.write_all(&stripped)
        .map_err(|e| strip_err(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| strip_err(e.error.to_string()))?;

    debug!(
        "Stripped {} bytes of EXIF from {}",
        data.len() - stripped.len(),
        path.display()
    );
    Ok(true)
}
