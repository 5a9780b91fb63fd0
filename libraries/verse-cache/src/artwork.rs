//! Artwork thumbnail processing

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;

use crate::error::Result;

/// Longest edge of a stored thumbnail, in pixels
pub const THUMBNAIL_MAX_DIMENSION: u32 = 500;

const JPEG_QUALITY: u8 = 85;

/// Decode an image and re-encode it as a bounded JPEG thumbnail
///
/// Aspect ratio is preserved and images already within the bound are not
/// upscaled. Alpha is dropped since JPEG has no alpha channel.
pub fn make_thumbnail(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)?;

    let img = if img.width() > THUMBNAIL_MAX_DIMENSION || img.height() > THUMBNAIL_MAX_DIMENSION {
        img.resize(
            THUMBNAIL_MAX_DIMENSION,
            THUMBNAIL_MAX_DIMENSION,
            FilterType::Lanczos3,
        )
    } else {
        img
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([200, 10, 10, 255]),
        ));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_large_image_is_bounded() {
        let thumb = make_thumbnail(&png(1200, 600)).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();

        assert_eq!(decoded.width(), 500);
        assert_eq!(decoded.height(), 250);
        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let thumb = make_thumbnail(&png(100, 80)).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (100, 80));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(make_thumbnail(b"definitely not an image").is_err());
    }
}
