//! Internal utility functions for imageops-cutout.
//!
//! This module contains common validation used across different image operations.

use crate::error::{AlphaMaskError, CutoutError};

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
/// * `context` - A description of the context for error messages
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise `CutoutError::InvalidInput`
pub fn validate_non_empty_image(width: u32, height: u32, context: &str) -> Result<(), CutoutError> {
    if width == 0 || height == 0 {
        Err(CutoutError::InvalidInput(format!(
            "{context}: image dimensions must be non-zero, got {width}x{height}"
        )))
    } else {
        Ok(())
    }
}

/// Validates that an image and its mask have matching dimensions.
pub fn validate_matching_dimensions(
    image: (u32, u32),
    mask: (u32, u32),
) -> Result<(), AlphaMaskError> {
    if image != mask {
        Err(AlphaMaskError::DimensionMismatch {
            expected: image,
            actual: mask,
        })
    } else {
        Ok(())
    }
}
