//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to observe
//! the pipeline as it stages and assembles each page. Callbacks are purely
//! observational: nothing they do can change the result of a run.
//!
//! # Example
//!
//! ```rust
//! use pdg2pdf::{ConversionConfig, ConversionProgressCallback, Stage};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     added: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page(&self, stage: Stage, _index: usize, _total: usize, name: &str) {
//!         if stage == Stage::Assembling {
//!             self.added.fetch_add(1, Ordering::SeqCst);
//!             eprintln!("Adding {name}");
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { added: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The two per-page passes of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Copying `.pdg` sources into the scratch folder (and stripping EXIF).
    Staging,
    /// Adding staged images to the output PDF in reordered sequence.
    Assembling,
}

impl Stage {
    /// Verb shown next to the current file name, e.g. "Processing cov001.pdg".
    pub fn verb(self) -> &'static str {
        match self {
            Stage::Staging => "Processing",
            Stage::Assembling => "Adding",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Staging => f.write_str("PDG → JPG"),
            Stage::Assembling => f.write_str("JPG → PDF"),
        }
    }
}

/// Called by the conversion pipeline as it works through each stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline is single-threaded; the `Send + Sync`
/// bound only exists so a config holding a callback can be shared.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first page of `stage`.
    fn on_stage_start(&self, stage: Stage, total: usize) {
        let _ = (stage, total);
    }

    /// Called just before page `index` (0-based) of `total` is handled.
    fn on_page(&self, stage: Stage, index: usize, total: usize, name: &str) {
        let _ = (stage, index, total, name);
    }

    /// Called once after every page of `stage` was handled successfully.
    fn on_stage_complete(&self, stage: Stage, total: usize) {
        let _ = (stage, total);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
