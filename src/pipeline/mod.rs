//! Pipeline stages for PDG-to-PDF conversion.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the orchestration in [`crate::convert`] stays a straight line.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ scratch ──▶ stage ──▶ reorder ──▶ assemble
//! (scan)    (jpg_…/)    (copy,     (book       (lopdf,
//!                        exif)      order)      DCTDecode)
//! ```
//!
//! 1. [`input`]: validate the source folder and list `.pdg` files
//! 2. [`scratch`]: create the timestamped working folder
//! 3. [`stage`]: copy pages in as `.jpg`, optionally via [`exif`]
//! 4. [`reorder`]: front cover, title, copyright, foreword, body, back cover
//! 5. [`assemble`]: embed each page in the output PDF
//!
//! [`jpeg`] holds the marker-segment walker shared by [`exif`] and [`assemble`].

pub mod assemble;
pub mod exif;
pub mod input;
pub mod jpeg;
pub mod reorder;
pub mod scratch;
pub mod stage;
