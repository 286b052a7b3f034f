//! Scratch folder: a timestamped working directory for staged pages.
//!
//! The folder is created next to the source pages as
//! `<prefix><YYYYMMDD_HHMMSS>_<random>`; the random tail keeps two runs
//! started in the same second apart. It is backed by a [`TempDir`], so it is
//! removed when the pipeline unwinds on an error as well as after success.

use crate::error::Pdg2PdfError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Timestamp part of the scratch folder name.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A uniquely named working folder, deleted on [`ScratchDir::close`] or drop.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a new scratch folder inside `parent`.
    pub fn create(parent: &Path, prefix: &str) -> Result<Self, Pdg2PdfError> {
        let stamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        let dir = tempfile::Builder::new()
            .prefix(&format!("{prefix}{stamp}_"))
            .rand_bytes(4)
            .tempdir_in(parent)
            .map_err(|source| Pdg2PdfError::ScratchDirCreationFailed {
                path: parent.to_path_buf(),
                source,
            })?;

        info!("Folder name of converted files: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the folder and everything in it.
    ///
    /// Best-effort: a failure is logged and otherwise ignored.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("Removed scratch folder {}", path.display()),
            Err(e) => warn!("Failed to remove scratch folder {}: {}", path.display(), e),
        }
    }

    /// Leave the folder on disk and return its path.
    pub fn keep(self) -> PathBuf {
        let path = self.dir.keep();
        info!("Keeping scratch folder {}", path.display());
        path
    }
}
