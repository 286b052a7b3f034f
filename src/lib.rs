//! # pdg2pdf
//!
//! Bundle a folder of `.pdg` page images into a single PDF.
//!
//! PDG pages, as produced by some scanned-book readers, are plain JPEG files
//! under another extension. Special pages are marked by a substring in the
//! file name: `cov` (cover), `bok` (title page), `leg` (copyright page) and
//! `fow` (foreword). A plain name-sorted merge would scatter those pages, so
//! the converter puts them back in book order before assembly.
//!
//! ## Pipeline Overview
//!
//! ```text
//! folder/*.pdg
//!  │
//!  ├─ 1. Input     validate folder, list .pdg files (sorted)
//!  ├─ 2. Scratch   create folder/jpg_YYYYMMDD_HHMMSS_xxxx/
//!  ├─ 3. Stage     copy as .jpg, optionally strip EXIF
//!  ├─ 4. Reorder   front cover, title, copyright, foreword, body, back covers
//!  ├─ 5. Assemble  one DCTDecode image per page (lopdf)
//!  └─ 6. Clean up  remove scratch folder, return ConversionReport
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdg2pdf::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .source_dir("/books/dune")
//!         .strip_metadata(true)
//!         .build()?;
//!     let report = convert(&config)?;
//!     println!("{} pages → {}", report.page_count, report.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! The ordering rules are usable on their own:
//!
//! ```rust
//! let pages = vec!["000001", "cov001", "bok001", "cov002"];
//! assert_eq!(
//!     pdg2pdf::reorder_pages(pages),
//!     vec!["cov001", "bok001", "000001", "cov002"]
//! );
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdg2pdf` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_dir};
pub use error::Pdg2PdfError;
pub use output::{ConversionReport, ConversionStats};
pub use pipeline::assemble::PdfAssembler;
pub use pipeline::exif::{strip_exif, strip_exif_in_place};
pub use pipeline::reorder::{
    extract_special_pages, layout_pages, reorder_pages, PageLayout, PageLayoutSummary, RoleTag,
};
pub use pipeline::scratch::ScratchDir;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
