use image::{buffer::ConvertBuffer, DynamicImage, Rgb, Rgba};
use imageproc::definitions::Image;

use super::apply_alpha_mask::{ApplyAlphaMask, ModifyAlpha};
use super::classifier::BackgroundClassifier;
use crate::error::CutoutError;

/// Trait for cutting the background out of an image
///
/// The result has the same dimensions as the input, with color channels
/// copied unchanged and the alpha channel replaced by the classifier's mask.
pub trait RemoveBackground {
    /// Classifies the background and returns the image with background pixels made transparent
    ///
    /// This consumes the original image.
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When the image has zero width or height
    /// * `CutoutError::AlphaMask` - When the classifier returns a mask of the wrong size
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_cutout::{CornerKeyClassifier, Image, RemoveBackground};
    /// use image::Rgb;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let photo: Image<Rgb<u8>> = Image::from_pixel(8, 8, Rgb([250, 250, 250]));
    /// let cutout = photo.remove_background(&CornerKeyClassifier::default())?;
    /// assert_eq!(cutout.get_pixel(4, 4)[3], 0);
    /// # Ok(())
    /// # }
    /// ```
    fn remove_background<C>(self, classifier: &C) -> Result<Image<Rgba<u8>>, CutoutError>
    where
        C: BackgroundClassifier + ?Sized;
}

impl RemoveBackground for Image<Rgba<u8>> {
    fn remove_background<C>(self, classifier: &C) -> Result<Image<Rgba<u8>>, CutoutError>
    where
        C: BackgroundClassifier + ?Sized,
    {
        let mask = classifier.alpha_mask(&self)?;
        Ok(self.replace_alpha(&mask)?)
    }
}

impl RemoveBackground for Image<Rgb<u8>> {
    fn remove_background<C>(self, classifier: &C) -> Result<Image<Rgba<u8>>, CutoutError>
    where
        C: BackgroundClassifier + ?Sized,
    {
        let rgba: Image<Rgba<u8>> = self.convert();
        let mask = classifier.alpha_mask(&rgba)?;
        Ok(self.apply_alpha_mask(&mask)?)
    }
}

impl RemoveBackground for DynamicImage {
    fn remove_background<C>(self, classifier: &C) -> Result<Image<Rgba<u8>>, CutoutError>
    where
        C: BackgroundClassifier + ?Sized,
    {
        self.into_rgba8().remove_background(classifier)
    }
}
