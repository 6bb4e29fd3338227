//! Food photo loading and format detection

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageFormat;

use super::{VisionError, VisionResult};

/// A photo ready to send to a vision model
#[derive(Debug, Clone)]
pub struct FoodImage {
    bytes: Vec<u8>,
    media_type: &'static str,
}

impl FoodImage {
    /// Wrap raw bytes, sniffing the format from the file signature
    pub fn from_bytes(bytes: Vec<u8>) -> VisionResult<Self> {
        if bytes.is_empty() {
            return Err(VisionError::EmptyImage);
        }

        let format = image::guess_format(&bytes).map_err(|_| VisionError::UnsupportedFormat)?;
        let media_type = match format {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            _ => return Err(VisionError::UnsupportedFormat),
        };

        Ok(Self { bytes, media_type })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> VisionResult<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Accepts plain base64 or a `data:<type>;base64,` URL
    pub fn from_base64(data: &str) -> VisionResult<Self> {
        let payload = match data.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => data,
        };
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        Self::from_bytes(STANDARD.decode(cleaned)?)
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

#[cfg(test)]
pub(crate) const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
