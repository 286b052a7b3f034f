//! Configuration types for PDG-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The CLI maps its flags onto the
//! builder one-to-one, so library callers and the binary share the same
//! defaults.

use crate::error::Pdg2PdfError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of the source page images.
pub const DEFAULT_SOURCE_EXTENSION: &str = "pdg";

/// Extension the staged copies are renamed to.
pub const DEFAULT_TARGET_EXTENSION: &str = "jpg";

/// Prefix of the timestamped scratch folder.
pub const DEFAULT_SCRATCH_PREFIX: &str = "jpg_";

/// Output name used when the source folder has no usable basename.
const FALLBACK_OUTPUT_NAME: &str = "output.pdf";

/// Configuration for a PDG-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdg2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .source_dir("/books/dune")
///     .output("dune.pdf")
///     .strip_metadata(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Folder holding the `.pdg` files. Default: current directory (`.`).
    pub source_dir: PathBuf,

    /// Output PDF path. Relative paths are resolved against `source_dir`.
    /// If None, `<source-folder-name>.pdf` is used.
    pub output: Option<PathBuf>,

    /// Remove EXIF data from each staged page before assembly. Default: false.
    pub strip_metadata: bool,

    /// Extension of the source pages, without the dot. Default: `pdg`.
    pub source_extension: String,

    /// Extension given to the staged copies, without the dot. Default: `jpg`.
    pub target_extension: String,

    /// Prefix of the scratch folder name. Default: `jpg_`.
    pub scratch_prefix: String,

    /// Resolution used to turn pixel dimensions into page size. Range: 72–600. Default: 72.
    ///
    /// At 72 DPI one image pixel maps to one PDF point, which reproduces the
    /// page geometry of the scanned originals exactly.
    pub dpi: u32,

    /// Leave the scratch folder on disk after the run. Default: false.
    pub keep_scratch: bool,

    /// Optional observer for per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output: None,
            strip_metadata: false,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            scratch_prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
            dpi: 72,
            keep_scratch: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("source_dir", &self.source_dir)
            .field("output", &self.output)
            .field("strip_metadata", &self.strip_metadata)
            .field("source_extension", &self.source_extension)
            .field("target_extension", &self.target_extension)
            .field("scratch_prefix", &self.scratch_prefix)
            .field("dpi", &self.dpi)
            .field("keep_scratch", &self.keep_scratch)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the output PDF path for a validated source folder.
    ///
    /// An explicit relative `output` lands inside `source_dir`; without one
    /// the PDF is named after the folder itself.
    pub fn output_path(&self, source_dir: &Path) -> PathBuf {
        match &self.output {
            Some(out) if out.is_absolute() => out.clone(),
            Some(out) => source_dir.join(out),
            None => source_dir.join(default_output_name(source_dir)),
        }
    }
}

/// `<basename>.pdf` for a folder, or `output.pdf` when it has no basename.
pub fn default_output_name(source_dir: &Path) -> String {
    match source_dir.file_name().and_then(|n| n.to_str()) {
        Some(name) if !name.is_empty() => format!("{name}.pdf"),
        _ => FALLBACK_OUTPUT_NAME.to_string(),
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source_dir = dir.into();
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = Some(path.into());
        self
    }

    pub fn strip_metadata(mut self, v: bool) -> Self {
        self.config.strip_metadata = v;
        self
    }

    pub fn source_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.source_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn target_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.target_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn scratch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.scratch_prefix = prefix.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn keep_scratch(mut self, v: bool) -> Self {
        self.config.keep_scratch = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdg2PdfError> {
        let c = &self.config;
        if !(72..=600).contains(&c.dpi) {
            return Err(Pdg2PdfError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.source_extension.is_empty() || c.target_extension.is_empty() {
            return Err(Pdg2PdfError::InvalidConfig(
                "file extensions must not be empty".into(),
            ));
        }
        if c.source_extension == c.target_extension {
            return Err(Pdg2PdfError::InvalidConfig(format!(
                "source and target extension are both '.{}'",
                c.source_extension
            )));
        }
        if c.scratch_prefix.contains(['/', '\\']) {
            return Err(Pdg2PdfError::InvalidConfig(format!(
                "scratch prefix '{}' must not contain path separators",
                c.scratch_prefix
            )));
        }
        Ok(self.config)
    }
}
