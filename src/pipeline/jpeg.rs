//! JPEG header walking: marker segments up to the first scan.
//!
//! Pages are never decoded. Both the metadata stripper and the PDF assembler
//! only need the header segments that precede the entropy-coded data: the
//! stripper drops some of them, the assembler reads the frame header to pick
//! a colour space. Everything from the start-of-scan marker on is opaque.

use std::ops::Range;
use thiserror::Error;

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const APP1: u8 = 0xE1;
const APP14: u8 = 0xEE;

/// Header signature of an EXIF APP1 payload.
pub const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// A JPEG header that could not be walked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JpegError {
    #[error("missing SOI marker (not a JPEG)")]
    NotAJpeg,

    #[error("truncated segment at offset {offset}")]
    Truncated { offset: usize },

    #[error("expected a marker at offset {offset}, found 0x{byte:02X}")]
    BadMarker { offset: usize, byte: u8 },

    #[error("invalid segment length {length} at offset {offset}")]
    BadLength { offset: usize, length: usize },

    #[error("image ends before the first scan")]
    NoScan,

    #[error("no frame header (SOF) before the first scan")]
    NoFrame,
}

/// One marker segment of the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Marker byte following `0xFF`.
    pub marker: u8,
    /// Byte range of the whole segment, fill bytes and marker included.
    pub span: Range<usize>,
    /// Segment payload, without marker and length field.
    pub payload: &'a [u8],
}

/// The walked header of a JPEG stream.
#[derive(Debug, Clone)]
pub struct Header<'a> {
    /// Segments after SOI, up to and including SOS.
    pub segments: Vec<Segment<'a>>,
}

/// Frame geometry and colour layout from the SOF segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
    pub components: u8,
    /// An Adobe APP14 segment is present (CMYK data is then stored inverted).
    pub adobe: bool,
}

fn is_standalone(marker: u8) -> bool {
    matches!(marker, 0x01 | 0xD0..=0xD7)
}

fn is_sof(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Walk the marker segments of `data` up to the first start-of-scan.
pub fn parse_header(data: &[u8]) -> Result<Header<'_>, JpegError> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
        return Err(JpegError::NotAJpeg);
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        let start = pos;
        match data.get(pos) {
            Some(0xFF) => {}
            Some(&byte) => return Err(JpegError::BadMarker { offset: pos, byte }),
            None => return Err(JpegError::NoScan),
        }
        // Fill bytes: any run of 0xFF before the marker byte.
        while data.get(pos + 1) == Some(&0xFF) {
            pos += 1;
        }
        let marker = *data.get(pos + 1).ok_or(JpegError::Truncated { offset: start })?;
        pos += 2;

        if marker == EOI {
            return Err(JpegError::NoScan);
        }
        if is_standalone(marker) {
            segments.push(Segment {
                marker,
                span: start..pos,
                payload: &[],
            });
            continue;
        }

        let len_bytes = data
            .get(pos..pos + 2)
            .ok_or(JpegError::Truncated { offset: start })?;
        let length = usize::from(u16::from_be_bytes([len_bytes[0], len_bytes[1]]));
        if length < 2 {
            return Err(JpegError::BadLength {
                offset: start,
                length,
            });
        }
        let end = pos + length;
        let payload = data
            .get(pos + 2..end)
            .ok_or(JpegError::Truncated { offset: start })?;

        segments.push(Segment {
            marker,
            span: start..end,
            payload,
        });
        pos = end;

        if marker == SOS {
            return Ok(Header { segments });
        }
    }
}

impl<'a> Header<'a> {
    /// Read the frame header.
    pub fn frame_info(&self) -> Result<FrameInfo, JpegError> {
        let adobe = self
            .segments
            .iter()
            .any(|s| s.marker == APP14 && s.payload.starts_with(b"Adobe"));

        let sof = self
            .segments
            .iter()
            .find(|s| is_sof(s.marker))
            .ok_or(JpegError::NoFrame)?;
        let p = sof.payload;
        if p.len() < 6 {
            return Err(JpegError::Truncated {
                offset: sof.span.start,
            });
        }

        Ok(FrameInfo {
            height: u32::from(u16::from_be_bytes([p[1], p[2]])),
            width: u32::from(u16::from_be_bytes([p[3], p[4]])),
            components: p[5],
            adobe,
        })
    }

    /// Segments holding EXIF metadata.
    pub fn exif_segments(&self) -> impl Iterator<Item = &Segment<'a>> + '_ {
        self.segments
            .iter()
            .filter(|s| s.marker == APP1 && s.payload.starts_with(EXIF_SIGNATURE))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A header-only JPEG: SOI, APP0, SOF0 (w×h, n components), SOS, then
    /// a few fake scan bytes and EOI.
    pub(crate) fn synthetic_jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut v = vec![0xFF, 0xD8];
        // APP0 JFIF
        v.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        v.extend_from_slice(b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
        // SOF0
        let sof_len = 8 + 3 * u16::from(components);
        v.extend_from_slice(&[0xFF, 0xC0]);
        v.extend_from_slice(&sof_len.to_be_bytes());
        v.push(8);
        v.extend_from_slice(&height.to_be_bytes());
        v.extend_from_slice(&width.to_be_bytes());
        v.push(components);
        for id in 1..=components {
            v.extend_from_slice(&[id, 0x11, 0x00]);
        }
        // SOS with a single component
        v.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        v.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56]);
        v.extend_from_slice(&[0xFF, 0xD9]);
        v
    }

    /// Insert an EXIF APP1 segment right after SOI.
    pub(crate) fn with_exif(jpeg: &[u8]) -> Vec<u8> {
        let mut payload = EXIF_SIGNATURE.to_vec();
        payload.extend_from_slice(b"MM\0\x2a\0\0\0\x08\0\0");
        let mut v = jpeg[..2].to_vec();
        v.extend_from_slice(&[0xFF, APP1]);
        v.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        v.extend_from_slice(&payload);
        v.extend_from_slice(&jpeg[2..]);
        v
    }

    #[test]
    fn walks_to_first_scan() {
        let jpeg = synthetic_jpeg(640, 480, 3);
        let header = parse_header(&jpeg).unwrap();
        let markers: Vec<u8> = header.segments.iter().map(|s| s.marker).collect();
        assert_eq!(markers, vec![0xE0, 0xC0, 0xDA]);
    }

    #[test]
    fn reads_frame_info() {
        let jpeg = synthetic_jpeg(640, 480, 1);
        let info = parse_header(&jpeg).unwrap().frame_info().unwrap();
        assert_eq!(
            info,
            FrameInfo {
                width: 640,
                height: 480,
                components: 1,
                adobe: false,
            }
        );
    }

    #[test]
    fn detects_adobe_marker() {
        let jpeg = synthetic_jpeg(10, 10, 4);
        let mut v = jpeg[..2].to_vec();
        v.extend_from_slice(&[0xFF, APP14, 0x00, 0x0E]);
        v.extend_from_slice(b"Adobe\0\x64\0\0\0\0\x02");
        v.extend_from_slice(&jpeg[2..]);

        let info = parse_header(&v).unwrap().frame_info().unwrap();
        assert!(info.adobe);
        assert_eq!(info.components, 4);
    }

    #[test]
    fn finds_exif_segments() {
        let jpeg = with_exif(&synthetic_jpeg(8, 8, 3));
        let header = parse_header(&jpeg).unwrap();
        assert_eq!(header.exif_segments().count(), 1);
    }

    #[test]
    fn tolerates_fill_bytes() {
        let jpeg = synthetic_jpeg(8, 8, 3);
        let mut v = jpeg[..2].to_vec();
        v.extend_from_slice(&[0xFF, 0xFF]);
        v.extend_from_slice(&jpeg[2..]);
        let header = parse_header(&v).unwrap();
        assert_eq!(header.segments[0].marker, 0xE0);
        assert_eq!(header.segments[0].span.start, 2);
    }

    #[test]
    fn rejects_non_jpeg() {
        assert_eq!(parse_header(b"\x89PNG\r\n").unwrap_err(), JpegError::NotAJpeg);
        assert_eq!(parse_header(b"").unwrap_err(), JpegError::NotAJpeg);
    }

    #[test]
    fn rejects_truncated_segment() {
        let jpeg = synthetic_jpeg(8, 8, 3);
        let err = parse_header(&jpeg[..10]).unwrap_err();
        assert!(matches!(err, JpegError::Truncated { .. }), "got {err:?}");
    }

    #[test]
    fn rejects_image_without_scan() {
        let err = parse_header(&[0xFF, 0xD8, 0xFF, 0xD9]).unwrap_err();
        assert_eq!(err, JpegError::NoScan);
    }
}
