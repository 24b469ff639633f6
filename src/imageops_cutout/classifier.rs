use image::{ImageBuffer, Luma, Pixel, Rgb, RgbaImage};
use imageproc::definitions::Image;

use super::reference_color::{opaque_rgb, ReferenceColor};
use crate::error::CutoutError;

/// Mask value for pixels judged to be background
pub const TRANSPARENT: u8 = 0;
/// Mask value for pixels judged to be foreground
pub const OPAQUE: u8 = 255;
/// Default per-channel tolerance of [`CornerKeyClassifier`]
pub const DEFAULT_TOLERANCE: u8 = 40;

/// Produces a background alpha mask for an image
///
/// This is the seam a cut-out pipeline is built around: the pipeline receives
/// an implementation at construction time and calls it once per image.
pub trait BackgroundClassifier {
    /// Returns a mask of the same dimensions as `image`, where 0 marks
    /// background and 255 marks foreground
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When the image cannot be classified
    fn alpha_mask(&self, image: &RgbaImage) -> Result<Image<Luma<u8>>, CutoutError>;
}

/// Corner-keyed background classifier
///
/// The background colour is estimated as the truncated average of the four
/// corner pixels. A pixel is background when each of its red, green and blue
/// channels differs from that colour by strictly less than `tolerance`.
///
/// Results are unreliable when the corners are not all background, e.g. on a
/// busy backdrop or when the subject touches the image edges. Background
/// coloured regions inside the subject are removed as well since pixels are
/// classified independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerKeyClassifier {
    tolerance: u8,
}

impl Default for CornerKeyClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl CornerKeyClassifier {
    pub const fn new(tolerance: u8) -> Self {
        Self { tolerance }
    }

    pub const fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// Whether `pixel` is close enough to `reference` to count as background
    #[inline]
    pub fn is_background(&self, pixel: Rgb<u8>, reference: Rgb<u8>) -> bool {
        pixel
            .0
            .iter()
            .zip(reference.0)
            .all(|(&channel, reference)| channel.abs_diff(reference) < self.tolerance)
    }

    /// Computes the binary background mask of an image
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When the image has zero width or height
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_cutout::{CornerKeyClassifier, Image};
    /// use image::{Luma, Rgb};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut image: Image<Rgb<u8>> = Image::from_pixel(5, 5, Rgb([255, 255, 255]));
    /// image.put_pixel(2, 2, Rgb([0, 0, 0]));
    ///
    /// let mask = CornerKeyClassifier::default().classify_mask(&image)?;
    /// assert_eq!(mask.get_pixel(0, 0), &Luma([0]));
    /// assert_eq!(mask.get_pixel(2, 2), &Luma([255]));
    /// # Ok(())
    /// # }
    /// ```
    pub fn classify_mask<P>(&self, image: &Image<P>) -> Result<Image<Luma<u8>>, CutoutError>
    where
        P: Pixel<Subpixel = u8> + Send + Sync,
    {
        let _span = tracing::debug_span!("classify_mask").entered();

        let reference = image.reference_color()?;
        tracing::trace!(?reference, tolerance = self.tolerance, "reference colour");

        let classify = |pixel: &P| {
            if self.is_background(opaque_rgb(*pixel), reference) {
                TRANSPARENT
            } else {
                OPAQUE
            }
        };

        #[cfg(feature = "rayon")]
        let values: Vec<u8> = {
            use rayon::prelude::*;
            image.par_pixels().map(classify).collect()
        };
        #[cfg(not(feature = "rayon"))]
        let values: Vec<u8> = image.pixels().map(classify).collect();

        let (width, height) = image.dimensions();
        ImageBuffer::from_raw(width, height, values).ok_or_else(|| {
            CutoutError::InvalidInput(format!("mask buffer does not fit {width}x{height}"))
        })
    }
}

impl BackgroundClassifier for CornerKeyClassifier {
    fn alpha_mask(&self, image: &RgbaImage) -> Result<Image<Luma<u8>>, CutoutError> {
        self.classify_mask(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_framed_subject, create_test_rgb_image};
    use image::Rgba;

    #[test]
    fn tolerance_boundary_is_strict() {
        let classifier = CornerKeyClassifier::default();
        let reference = Rgb([100, 100, 100]);

        assert!(classifier.is_background(Rgb([139, 61, 139]), reference));
        assert!(!classifier.is_background(Rgb([140, 100, 100]), reference));
        assert!(!classifier.is_background(Rgb([100, 60, 100]), reference));
        assert!(!classifier.is_background(Rgb([100, 100, 140]), reference));
    }

    #[test]
    fn channels_are_checked_independently() {
        let classifier = CornerKeyClassifier::new(10);
        let reference = Rgb([50, 50, 50]);

        // Each channel within tolerance even though the combined distance is large
        assert!(classifier.is_background(Rgb([59, 41, 59]), reference));
        assert!(!classifier.is_background(Rgb([50, 50, 61]), reference));
    }

    #[test]
    fn zero_tolerance_never_matches() {
        let classifier = CornerKeyClassifier::new(0);
        let image: Image<Rgb<u8>> = Image::from_pixel(3, 3, Rgb([9, 9, 9]));
        let mask = classifier.classify_mask(&image).unwrap();
        assert!(mask.pixels().all(|p| p.0 == [OPAQUE]));
    }

    #[test]
    fn uniform_image_is_fully_transparent() {
        let image: Image<Rgb<u8>> = Image::from_pixel(4, 3, Rgb([10, 20, 30]));
        let mask = CornerKeyClassifier::default().classify_mask(&image).unwrap();
        assert_eq!(mask.dimensions(), (4, 3));
        assert!(mask.pixels().all(|p| p.0 == [TRANSPARENT]));
    }

    #[test]
    fn framed_subject_keeps_only_subject() {
        let image = create_framed_subject(6, 6, Rgb([240, 240, 240]), Rgb([20, 60, 200]));
        let mask = CornerKeyClassifier::default().classify_mask(&image).unwrap();

        for (x, y, pixel) in mask.enumerate_pixels() {
            let inside = (2..4).contains(&x) && (2..4).contains(&y);
            let expected = if inside { OPAQUE } else { TRANSPARENT };
            assert_eq!(pixel.0, [expected], "pixel ({x}, {y})");
        }
    }

    #[test]
    fn interior_holes_are_not_protected() {
        let mut image = create_framed_subject(7, 7, Rgb([0, 0, 0]), Rgb([255, 255, 255]));
        image.put_pixel(3, 3, Rgb([5, 5, 5]));
        let mask = CornerKeyClassifier::default().classify_mask(&image).unwrap();
        assert_eq!(mask.get_pixel(3, 3), &Luma([TRANSPARENT]));
        assert_eq!(mask.get_pixel(2, 3), &Luma([OPAQUE]));
    }

    #[test]
    fn rgba_alpha_does_not_affect_classification() {
        let mut image: RgbaImage = Image::from_pixel(3, 3, Rgba([10, 10, 10, 0]));
        image.put_pixel(1, 1, Rgba([10, 10, 10, 255]));
        let mask = CornerKeyClassifier::default().alpha_mask(&image).unwrap();
        assert!(mask.pixels().all(|p| p.0 == [TRANSPARENT]));
    }

    #[test]
    fn mask_matches_non_uniform_corners() {
        // corners average to (125, 131, 118)
        let image = create_test_rgb_image();
        let mask = CornerKeyClassifier::new(80).classify_mask(&image).unwrap();
        assert_eq!(mask.get_pixel(0, 0), &Luma([TRANSPARENT]));
        assert_eq!(mask.get_pixel(1, 0), &Luma([TRANSPARENT]));
        // blue 200 is 82 off
        assert_eq!(mask.get_pixel(0, 1), &Luma([OPAQUE]));
        // blue 25 is 93 off
        assert_eq!(mask.get_pixel(1, 1), &Luma([OPAQUE]));
    }

    #[test]
    fn empty_image_is_invalid_input() {
        let image: Image<Rgb<u8>> = Image::new(0, 0);
        let result = CornerKeyClassifier::default().classify_mask(&image);
        assert!(matches!(result, Err(CutoutError::InvalidInput(_))));
    }
}
