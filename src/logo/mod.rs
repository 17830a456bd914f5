use std::fs;
use std::io;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{GenericImageView, ImageFormat};
use thiserror::Error;

/// Largest logo accepted for upload or inlining.
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

const SVG_MIME: &str = "image/svg+xml";
const SVG_SNIFF_WINDOW: usize = 1024;
const RASTER_FORMATS: [ImageFormat; 6] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Ico,
];

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("logo is empty")]
    Empty,
    #[error("logo is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("unsupported logo format")]
    UnsupportedFormat,
    #[error("logo image does not decode: {message}")]
    Decode { message: String },
    #[error("not a base64 data URI")]
    InvalidDataUri,
    #[error("data URI payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type LogoResult<T> = std::result::Result<T, LogoError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoAsset {
    mime: String,
    bytes: Vec<u8>,
    /// `None` for vector logos.
    dimensions: Option<(u32, u32)>,
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SVG_SNIFF_WINDOW)];
    let text = match std::str::from_utf8(window) {
        Ok(text) => text,
        // The window may end inside a multi-byte character.
        Err(err) if err.error_len().is_none() => {
            match std::str::from_utf8(&window[..err.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    (text.starts_with("<svg") || text.starts_with("<?xml") || text.starts_with("<!--"))
        && text.contains("<svg")
}

impl LogoAsset {
    pub fn from_path(path: &Path) -> LogoResult<Self> {
        let size = fs::metadata(path)?.len();
        if size > MAX_LOGO_BYTES as u64 {
            return Err(LogoError::TooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                limit: MAX_LOGO_BYTES,
            });
        }
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Sniffs the format and checks that raster images decode.
    pub fn from_bytes(bytes: Vec<u8>) -> LogoResult<Self> {
        if bytes.is_empty() {
            return Err(LogoError::Empty);
        }
        if bytes.len() > MAX_LOGO_BYTES {
            return Err(LogoError::TooLarge {
                size: bytes.len(),
                limit: MAX_LOGO_BYTES,
            });
        }
        if looks_like_svg(&bytes) {
            return Ok(Self {
                mime: SVG_MIME.to_string(),
                bytes,
                dimensions: None,
            });
        }

        let format = image::guess_format(&bytes).map_err(|_| LogoError::UnsupportedFormat)?;
        if !RASTER_FORMATS.contains(&format) {
            return Err(LogoError::UnsupportedFormat);
        }
        let decoded = image::load_from_memory_with_format(&bytes, format).map_err(|err| {
            LogoError::Decode {
                message: err.to_string(),
            }
        })?;
        let dimensions = decoded.dimensions();
        tracing::debug!(
            format = ?format,
            width = dimensions.0,
            height = dimensions.1,
            size = bytes.len(),
            "logo sniffed"
        );
        Ok(Self {
            mime: format.to_mime_type().to_string(),
            bytes,
            dimensions: Some(dimensions),
        })
    }

    /// Parses `data:<mime>;base64,<payload>` and re-validates the payload.
    pub fn from_data_uri(uri: &str) -> LogoResult<Self> {
        let rest = uri.strip_prefix("data:").ok_or(LogoError::InvalidDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(LogoError::InvalidDataUri)?;
        if !header.ends_with(";base64") {
            return Err(LogoError::InvalidDataUri);
        }
        let bytes = STANDARD.decode(payload.trim())?;
        Self::from_bytes(bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Upload file name derived from the mime type.
    pub fn file_name(&self) -> String {
        let extension = match self.mime.as_str() {
            SVG_MIME => "svg",
            mime => ImageFormat::from_mime_type(mime)
                .and_then(|format| format.extensions_str().first().copied())
                .unwrap_or("bin"),
        };
        format!("logo.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([30, 64, 175, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn png_is_sniffed_and_measured() {
        let logo = LogoAsset::from_bytes(png_bytes(4, 3)).unwrap();
        assert_eq!(logo.mime(), "image/png");
        assert_eq!(logo.dimensions(), Some((4, 3)));
        assert_eq!(logo.file_name(), "logo.png");
    }

    #[test]
    fn svg_is_recognized_by_its_markup() {
        let svg = br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"/>"#.to_vec();
        let logo = LogoAsset::from_bytes(svg).unwrap();
        assert_eq!(logo.mime(), SVG_MIME);
        assert_eq!(logo.dimensions(), None);
        assert_eq!(logo.file_name(), "logo.svg");
    }

    #[test]
    fn svg_sniffing_tolerates_a_character_cut_by_the_window() {
        let mut text = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg"><!-- "#);
        text.push_str(&"a".repeat(SVG_SNIFF_WINDOW - 1 - text.len()));
        text.push_str("é --></svg>");
        assert!(!text.is_char_boundary(SVG_SNIFF_WINDOW));

        let logo = LogoAsset::from_bytes(text.into_bytes()).unwrap();
        assert_eq!(logo.mime(), SVG_MIME);
    }

    #[test]
    fn data_uri_round_trips() {
        let logo = LogoAsset::from_bytes(png_bytes(2, 2)).unwrap();
        let uri = logo.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(LogoAsset::from_data_uri(&uri).unwrap(), logo);
    }

    #[test]
    fn garbage_and_truncated_images_are_rejected() {
        assert!(matches!(
            LogoAsset::from_bytes(b"plain text".to_vec()),
            Err(LogoError::UnsupportedFormat)
        ));
        let mut truncated = png_bytes(8, 8);
        truncated.truncate(24);
        assert!(matches!(
            LogoAsset::from_bytes(truncated),
            Err(LogoError::Decode { .. })
        ));
        assert!(matches!(LogoAsset::from_bytes(Vec::new()), Err(LogoError::Empty)));
    }

    #[test]
    fn oversized_logo_is_rejected_before_decoding() {
        let mut bytes = png_bytes(1, 1);
        bytes.resize(MAX_LOGO_BYTES + 1, 0);
        assert!(matches!(
            LogoAsset::from_bytes(bytes),
            Err(LogoError::TooLarge { .. })
        ));
    }

    #[test]
    fn malformed_data_uris_are_rejected() {
        assert!(matches!(
            LogoAsset::from_data_uri("https://example.com/logo.png"),
            Err(LogoError::InvalidDataUri)
        ));
        assert!(matches!(
            LogoAsset::from_data_uri("data:image/png,abc"),
            Err(LogoError::InvalidDataUri)
        ));
        assert!(matches!(
            LogoAsset::from_data_uri("data:image/png;base64,!!!"),
            Err(LogoError::Base64(_))
        ));
    }
}
