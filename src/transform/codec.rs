//! Image decoding and encoding.
//!
//! Decoding sniffs the format from the bytes rather than trusting a file
//! extension or a declared MIME type. Encoding picks the output format from
//! the derived filename's extension, falling back to the source format.

use std::io::Cursor;

use bytes::Bytes;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};

use crate::error::TransformError;

/// Decode an image, returning it together with its detected format.
pub fn decode(data: &[u8]) -> Result<(DynamicImage, ImageFormat), TransformError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode {
            message: e.to_string(),
        })?;

    let format = reader.format().ok_or_else(|| TransformError::Decode {
        message: "unrecognized image format".to_string(),
    })?;

    let image = reader.decode().map_err(|e| TransformError::Decode {
        message: e.to_string(),
    })?;

    Ok((image, format))
}

/// Check that `data` is a structurally valid, decodable image.
pub fn is_valid_image(data: &[u8]) -> bool {
    decode(data).is_ok()
}

/// Choose the encoding for an output file.
///
/// Uses the extension of `filename` when it names a format this build can
/// write, otherwise `fallback`.
pub fn output_format(filename: &str, fallback: ImageFormat) -> ImageFormat {
    ImageFormat::from_path(filename)
        .ok()
        .filter(|format| format.writing_enabled())
        .unwrap_or(fallback)
}

/// Encode an image in the given format.
///
/// JPEG has no alpha channel and no 16-bit mode, so images are reduced to
/// 8-bit luma or RGB before JPEG encoding.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Bytes, TransformError> {
    let mut buffer = Cursor::new(Vec::new());

    let result = if format == ImageFormat::Jpeg {
        match image.color() {
            ColorType::L8 | ColorType::Rgb8 => image.write_to(&mut buffer, format),
            ColorType::L16 | ColorType::La8 | ColorType::La16 => {
                DynamicImage::ImageLuma8(image.to_luma8()).write_to(&mut buffer, format)
            }
            _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut buffer, format),
        }
    } else {
        image.write_to(&mut buffer, format)
    };

    result.map_err(|e| TransformError::Encode {
        message: e.to_string(),
    })?;

    Ok(Bytes::from(buffer.into_inner()))
}
