use image::{Luma, Rgb, Rgba};
use imageproc::{definitions::Image, map::map_colors2};

use crate::{error::AlphaMaskError, utils::validate_matching_dimensions};

/// Trait for turning an RGB image into RGBA using a grayscale mask
///
/// This consumes the original image.
pub trait ApplyAlphaMask {
    /// Applies the mask as the alpha channel of a new RGBA image
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - When image and mask dimensions don't match
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_cutout::{Image, ApplyAlphaMask};
    /// use image::{Luma, Rgb};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let rgb_image: Image<Rgb<u8>> = Image::new(10, 10);
    /// let mask: Image<Luma<u8>> = Image::new(10, 10);
    ///
    /// let rgba_image = rgb_image.apply_alpha_mask(&mask)?;
    /// # Ok(())
    /// # }
    /// ```
    fn apply_alpha_mask(self, mask: &Image<Luma<u8>>) -> Result<Image<Rgba<u8>>, AlphaMaskError>;
}

/// Trait for replacing the alpha channel of an existing RGBA image
///
/// Color channels are left untouched.
pub trait ModifyAlpha: Sized {
    /// Replaces the alpha channel with the provided mask
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - When image and mask dimensions don't match
    fn replace_alpha(self, mask: &Image<Luma<u8>>) -> Result<Self, AlphaMaskError>;

    /// Replaces the alpha channel with the provided mask in-place
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - When image and mask dimensions don't match
    fn replace_alpha_mut(&mut self, mask: &Image<Luma<u8>>) -> Result<&mut Self, AlphaMaskError>;
}

impl ApplyAlphaMask for Image<Rgb<u8>> {
    fn apply_alpha_mask(self, mask: &Image<Luma<u8>>) -> Result<Image<Rgba<u8>>, AlphaMaskError> {
        validate_matching_dimensions(self.dimensions(), mask.dimensions())?;

        Ok(map_colors2(
            &self,
            mask,
            |Rgb([red, green, blue]), Luma([alpha])| Rgba([red, green, blue, alpha]),
        ))
    }
}

impl ModifyAlpha for Image<Rgba<u8>> {
    fn replace_alpha(mut self, mask: &Image<Luma<u8>>) -> Result<Self, AlphaMaskError> {
        self.replace_alpha_mut(mask)?;
        Ok(self)
    }

    fn replace_alpha_mut(&mut self, mask: &Image<Luma<u8>>) -> Result<&mut Self, AlphaMaskError> {
        validate_matching_dimensions(self.dimensions(), mask.dimensions())?;

        self.pixels_mut()
            .zip(mask.pixels())
            .for_each(|(pixel, &Luma([alpha]))| pixel[3] = alpha);

        Ok(self)
    }
}
