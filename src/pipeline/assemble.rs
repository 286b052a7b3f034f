//! PDF assembly: one JPEG per page, embedded without re-encoding.
//!
//! Each staged page becomes an image XObject with the `DCTDecode` filter, so
//! the JPEG bytes go into the PDF exactly as they are on disk. The page is
//! sized to the image (pixels scaled by `72 / dpi` points) and the image is
//! drawn to fill it.
//!
//! [`PdfAssembler`] is a scoped resource: `create` → `add_page`* → `finish`.
//! If it is dropped without `finish` (an error unwound the pipeline), the
//! pages added so far are still written, and a failure to do so is logged.

use crate::error::Pdg2PdfError;
use crate::pipeline::jpeg::{self, FrameInfo};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PDF_VERSION: &str = "1.5";

/// Incremental builder for the output PDF.
pub struct PdfAssembler {
    output: PathBuf,
    dpi: u32,
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    finished: bool,
}

impl PdfAssembler {
    /// Start a new document that will be written to `output`.
    pub fn create(output: impl Into<PathBuf>, dpi: u32) -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            output: output.into(),
            dpi: dpi.max(1),
            doc,
            pages_id,
            page_ids: Vec::new(),
            finished: false,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append the JPEG at `path` as the next page.
    pub fn add_page(&mut self, path: &Path) -> Result<(), Pdg2PdfError> {
        let data = std::fs::read(path).map_err(|source| Pdg2PdfError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_jpeg(data)
            .map_err(|detail| Pdg2PdfError::InvalidPageImage {
                path: path.to_path_buf(),
                detail,
            })
    }

    /// Append in-memory JPEG bytes as the next page.
    pub fn add_jpeg(&mut self, data: Vec<u8>) -> Result<(), String> {
        let frame = probe_jpeg(&data)?;
        let index = self.page_ids.len() + 1;
        let image_name = format!("Im{index}");

        let image_id = self.doc.add_object(image_stream(&frame, data));

        let width = frame.width as f32 * 72.0 / self.dpi as f32;
        let height = frame.height as f32 * 72.0 / self.dpi as f32;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(image_name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|e| e.to_string())?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let media_box: Vec<Object> = vec![0.into(), 0.into(), width.into(), height.into()];
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    image_name => image_id,
                },
            },
        });
        self.page_ids.push(page_id);

        debug!(
            "Added page {} ({}x{} px, {} components)",
            index, frame.width, frame.height, frame.components
        );
        Ok(())
    }

    /// Write the document to disk.
    pub fn finish(mut self) -> Result<PathBuf, Pdg2PdfError> {
        self.finished = true;
        self.write()?;
        info!(
            "Wrote {} pages to {}",
            self.page_ids.len(),
            self.output.display()
        );
        Ok(self.output.clone())
    }

    fn write(&mut self) -> Result<(), Pdg2PdfError> {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        self.doc
            .save(&self.output)
            .map_err(|e| Pdg2PdfError::AssemblyFailed {
                path: self.output.clone(),
                detail: e.to_string(),
            })?;
        Ok(())
    }
}

impl Drop for PdfAssembler {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!(
            "Assembly interrupted, writing {} pages to {}",
            self.page_ids.len(),
            self.output.display()
        );
        if let Err(e) = self.write() {
            warn!("{e}");
        }
    }
}

/// Validate `data` as a JPEG and read what the XObject needs.
fn probe_jpeg(data: &[u8]) -> Result<FrameInfo, String> {
    match image::guess_format(data) {
        Ok(image::ImageFormat::Jpeg) => {}
        Ok(other) => return Err(format!("expected JPEG data, found {other:?}")),
        Err(e) => return Err(e.to_string()),
    }

    let frame = jpeg::parse_header(data)
        .and_then(|h| h.frame_info())
        .map_err(|e| e.to_string())?;
    if frame.width == 0 || frame.height == 0 {
        return Err(format!("empty image ({}x{})", frame.width, frame.height));
    }
    Ok(frame)
}

fn image_stream(frame: &FrameInfo, data: Vec<u8>) -> Stream {
    let color_space = match frame.components {
        1 => "DeviceGray",
        4 => "DeviceCMYK",
        _ => "DeviceRGB",
    };
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(frame.width),
        "Height" => i64::from(frame.height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
        "Filter" => "DCTDecode",
    };
    // Adobe writes CMYK JPEGs inverted.
    if frame.components == 4 && frame.adobe {
        let decode: Vec<Object> = [1i64, 0, 1, 0, 1, 0, 1, 0]
            .into_iter()
            .map(Object::from)
            .collect();
        dict.set("Decode", decode);
    }
    Stream::new(dict, data).with_compression(false)
}
