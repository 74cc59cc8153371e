//! System clipboard backed by `arboard`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lovart_core::{ClipboardError, PlatformClipboard};

/// Host clipboard access for native builds.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new().map_err(map_error)?;
        Ok(Self { inner })
    }
}

fn map_error(e: arboard::Error) -> ClipboardError {
    match e {
        arboard::Error::ContentNotAvailable => ClipboardError::Empty,
        arboard::Error::ConversionFailure => ClipboardError::Encoding(e.to_string()),
        other => ClipboardError::Unavailable(other.to_string()),
    }
}

impl PlatformClipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner.set_text(text).map_err(map_error)
    }

    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        match self.inner.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(map_error(e)),
        }
    }

    fn read_image(&mut self) -> Result<Option<String>, ClipboardError> {
        let img_data = match self.inner.get_image() {
            Ok(img_data) => img_data,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => return Err(map_error(e)),
        };
        let width = img_data.width as u32;
        let height = img_data.height as u32;
        let png_data = encode_png(width, height, &img_data.bytes)?;
        log::info!("Read image from clipboard: {}x{}", width, height);
        Ok(Some(png_data_uri(&png_data)))
    }
}

/// Encode RGBA8 pixels as PNG.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, ClipboardError> {
    let encoding = |e: ::png::EncodingError| ClipboardError::Encoding(e.to_string());
    let mut png_data = Vec::new();
    {
        let mut encoder = ::png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(::png::ColorType::Rgba);
        encoder.set_depth(::png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(encoding)?;
        writer.write_image_data(rgba).map_err(encoding)?;
        writer.finish().map_err(encoding)?;
    }
    Ok(png_data)
}

/// Wrap PNG bytes as a `data:` URI.
pub fn png_data_uri(png_data: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_data))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png() {
        let pixels = [255u8, 0, 0, 255, 0, 255, 0, 255];
        let png = encode_png(2, 1, &pixels).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_rejects_short_buffer() {
        assert!(matches!(encode_png(4, 4, &[0u8; 3]), Err(ClipboardError::Encoding(_))));
    }

    #[test]
    fn test_data_uri() {
        let uri = png_data_uri(&PNG_SIGNATURE);
        assert!(uri.starts_with("data:image/png;base64,"));
        let encoded = uri.trim_start_matches("data:image/png;base64,");
        assert_eq!(STANDARD.decode(encoded).unwrap(), PNG_SIGNATURE);
    }

    #[test]
    fn test_map_error() {
        assert_eq!(map_error(arboard::Error::ContentNotAvailable), ClipboardError::Empty);
        assert!(matches!(
            map_error(arboard::Error::ClipboardOccupied),
            ClipboardError::Unavailable(_)
        ));
    }
}
