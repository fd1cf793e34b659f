//! Decoded camera frame shared by all collaborators of one request.

use std::sync::OnceLock;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

use crate::error::InferenceResult;

/// JPEG quality used when a collaborator needs encoded bytes.
pub const JPEG_QUALITY: u8 = 90;

/// An RGB frame plus its JPEG encoding, computed at most once.
#[derive(Debug)]
pub struct Frame {
    rgb: RgbImage,
    jpeg: OnceLock<Vec<u8>>,
}

impl Frame {
    /// Decode uploaded bytes (any format the `image` crate recognizes).
    pub fn decode(bytes: &[u8]) -> InferenceResult<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self::from_rgb(image.into_rgb8())
    }

    pub fn from_rgb(rgb: RgbImage) -> Self {
        Self {
            rgb,
            jpeg: OnceLock::new(),
        }
    }

    pub fn rgb(&self) -> &RgbImage {
        &self.rgb
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.rgb.dimensions()
    }

    /// JPEG encoding of the frame. CPU-bound on first call.
    pub fn jpeg(&self) -> InferenceResult<&[u8]> {
        if let Some(bytes) = self.jpeg.get() {
            return Ok(bytes);
        }
        let encoded = encode_jpeg(&self.rgb)?;
        Ok(self.jpeg.get_or_init(|| encoded))
    }
}

fn encode_jpeg(rgb: &RgbImage) -> InferenceResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    encoder.encode_image(rgb)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 128]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_decode_converts_to_rgb() {
        let frame = Frame::decode(&png_bytes()).unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
        assert_eq!(frame.rgb().get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(Frame::decode(b"definitely not an image").is_err());
    }

    #[test]
    fn test_jpeg_is_cached() {
        let frame = Frame::decode(&png_bytes()).unwrap();
        let first = frame.jpeg().unwrap().as_ptr();
        let second = frame.jpeg().unwrap().as_ptr();
        assert_eq!(first, second);
        assert!(image::load_from_memory(frame.jpeg().unwrap()).is_ok());
    }
}
