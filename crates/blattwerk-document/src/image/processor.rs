// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode and re-encode raster images using the `image`
// crate. The PDF writer and stamper use it for decoding and channel
// inspection; the rasterizer uses it to encode rendered pages.

use image::{ColorType, DynamicImage, ImageFormat};
use tracing::{debug, instrument};

use blattwerk_core::error::{BlattwerkError, Result};

/// A decoded in-memory image.
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            BlattwerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the image is single-channel (luma, with or without alpha).
    pub fn is_grayscale(&self) -> bool {
        matches!(
            self.image.color(),
            ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16
        )
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Output ---------------------------------------------------------------

    /// Raw 8-bit RGB pixel data, alpha flattened away.
    pub fn to_raw_rgb(&self) -> Vec<u8> {
        self.image.to_rgb8().into_raw()
    }

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| BlattwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| BlattwerkError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> DynamicImage {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn decode_roundtrip_preserves_dimensions() {
        let png = ImageProcessor::from_dynamic(checker(6, 4)).to_png_bytes().unwrap();
        let decoded = ImageProcessor::from_bytes(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 4));
        assert!(!decoded.is_grayscale());
    }

    #[test]
    fn jpeg_encoding_produces_jpeg_magic() {
        let jpeg = ImageProcessor::from_dynamic(checker(8, 8))
            .to_jpeg_bytes(90)
            .unwrap();
        assert!(jpeg.starts_with(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn raw_rgb_has_three_bytes_per_pixel() {
        let processor = ImageProcessor::from_dynamic(checker(5, 3));
        assert_eq!(processor.to_raw_rgb().len(), 5 * 3 * 3);
    }

    #[test]
    fn grayscale_detection() {
        let luma = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
        assert!(ImageProcessor::from_dynamic(luma).is_grayscale());
    }

    #[test]
    fn undecodable_bytes_rejected() {
        assert!(matches!(
            ImageProcessor::from_bytes(b"not an image"),
            Err(BlattwerkError::ImageError(_))
        ));
    }
}
