//! Decoding uploads and encoding results.

use std::fmt;
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgba};
use imageproc::definitions::Image;
use serde::{Deserialize, Serialize};

use crate::error::CutoutError;

/// Encoded output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    #[default]
    Png,
    /// JPEG; alpha is discarded
    Jpeg,
    /// Lossless WebP with alpha, requires the `webp` feature
    WebP,
}

impl OutputFormat {
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Decodes an uploaded image, guessing the format from its content
///
/// # Errors
///
/// * `CutoutError::InvalidInput` - When `bytes` is empty or longer than `max_bytes`
/// * `CutoutError::DependencyUnavailable` - When the format is not compiled in
/// * `CutoutError::DecodeFailure` - When the data is corrupt or unrecognised
pub fn decode(bytes: &[u8], max_bytes: Option<usize>) -> Result<DynamicImage, CutoutError> {
    if bytes.is_empty() {
        return Err(CutoutError::InvalidInput("no image provided".to_string()));
    }
    if let Some(limit) = max_bytes.filter(|&limit| bytes.len() > limit) {
        return Err(CutoutError::InvalidInput(format!(
            "image is {} bytes, limit is {limit}",
            bytes.len()
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|err| CutoutError::DecodeFailure(format!("unrecognised image data: {err}")))?;
    if !format.reading_enabled() {
        return Err(CutoutError::DependencyUnavailable(format!(
            "decoding {format:?} is not enabled in this build"
        )));
    }

    let image = image::load_from_memory_with_format(bytes, format)?;
    tracing::debug!(
        ?format,
        width = image.width(),
        height = image.height(),
        "decoded input"
    );
    Ok(image)
}

/// Encodes a cut-out into `format`
///
/// `jpeg_quality` is only used for JPEG and is clamped to `1..=100`.
///
/// # Errors
///
/// * `CutoutError::DependencyUnavailable` - When the encoder is not compiled in
/// * `CutoutError::EncodeFailure` - When the encoder fails
pub fn encode(
    image: &Image<Rgba<u8>>,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, CutoutError> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => image.write_to(&mut buffer, ImageFormat::Png)?,
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut buffer,
                jpeg_quality.clamp(1, 100),
            );
            rgb.write_with_encoder(encoder)?;
        }
        OutputFormat::WebP => encode_webp(image, &mut buffer)?,
    }
    Ok(buffer.into_inner())
}

#[cfg(feature = "webp")]
fn encode_webp(image: &Image<Rgba<u8>>, buffer: &mut Cursor<Vec<u8>>) -> Result<(), CutoutError> {
    Ok(image.write_to(buffer, ImageFormat::WebP)?)
}

#[cfg(not(feature = "webp"))]
fn encode_webp(_image: &Image<Rgba<u8>>, _buffer: &mut Cursor<Vec<u8>>) -> Result<(), CutoutError> {
    Err(CutoutError::DependencyUnavailable(
        "WebP output requires the `webp` feature".to_string(),
    ))
}

/// Standard base64 with padding, as embedded in a JSON response body
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Inverse of [`to_base64`]
///
/// # Errors
///
/// * `CutoutError::DecodeFailure` - When `encoded` is not valid base64
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, CutoutError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|err| CutoutError::DecodeFailure(format!("invalid base64: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cutout() -> Image<Rgba<u8>> {
        let mut image: Image<Rgba<u8>> = Image::from_pixel(3, 2, Rgba([10, 20, 30, 0]));
        image.put_pixel(1, 1, Rgba([200, 100, 50, 255]));
        image
    }

    #[test]
    fn png_keeps_alpha() {
        let bytes = encode(&sample_cutout(), OutputFormat::Png, 95).unwrap();
        let decoded = decode(&bytes, None).unwrap().into_rgba8();
        assert_eq!(decoded, sample_cutout());
    }

    #[test]
    fn jpeg_drops_alpha() {
        let bytes = encode(&sample_cutout(), OutputFormat::Jpeg, 95).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let decoded = decode(&bytes, None).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[cfg(not(feature = "webp"))]
    #[test]
    fn webp_output_needs_feature() {
        assert!(matches!(
            encode(&sample_cutout(), OutputFormat::WebP, 95),
            Err(CutoutError::DependencyUnavailable(_))
        ));
    }

    #[test]
    fn empty_payload_is_invalid() {
        assert!(matches!(decode(&[], None), Err(CutoutError::InvalidInput(_))));
    }

    #[test]
    fn oversized_payload_is_invalid() {
        let bytes = encode(&sample_cutout(), OutputFormat::Png, 95).unwrap();
        assert!(matches!(
            decode(&bytes, Some(bytes.len() - 1)),
            Err(CutoutError::InvalidInput(_))
        ));
        assert!(decode(&bytes, Some(bytes.len())).is_ok());
    }

    #[test]
    fn garbage_is_a_decode_failure() {
        assert!(matches!(
            decode(b"definitely not an image", None),
            Err(CutoutError::DecodeFailure(_))
        ));
    }

    #[test]
    fn truncated_png_is_a_decode_failure() {
        let bytes = encode(&sample_cutout(), OutputFormat::Png, 95).unwrap();
        assert!(matches!(
            decode(&bytes[..bytes.len() / 2], None),
            Err(CutoutError::DecodeFailure(_))
        ));
    }

    #[test]
    fn disabled_format_is_dependency_unavailable() {
        // GIF signature; the gif codec is never enabled
        assert!(matches!(
            decode(b"GIF89a\x01\x00\x01\x00\x00\x00\x00", None),
            Err(CutoutError::DependencyUnavailable(_))
        ));
    }

    #[test]
    fn base64_round_trip() {
        assert_eq!(to_base64(b"png"), "cG5n");
        assert_eq!(from_base64(" cG5n\n").unwrap(), b"png");
        assert!(matches!(
            from_base64("***"),
            Err(CutoutError::DecodeFailure(_))
        ));
    }

    #[test]
    fn output_format_names() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::WebP.to_string(), "webp");
        assert_eq!(
            serde_json::from_str::<OutputFormat>("\"jpeg\"").unwrap(),
            OutputFormat::Jpeg
        );
    }
}
