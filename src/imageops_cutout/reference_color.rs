use image::{Pixel, Rgb, Rgba};
use imageproc::definitions::Image;
use itertools::iproduct;

use crate::error::CutoutError;
use crate::utils::validate_non_empty_image;

/// Trait for estimating the background colour of an image from its corners
pub trait ReferenceColor {
    /// Returns the four corner pixels as RGB triples
    ///
    /// The order is top-left, top-right, bottom-left, bottom-right. Any alpha
    /// channel is ignored.
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When the image has zero width or height
    fn corner_samples(&self) -> Result<[Rgb<u8>; 4], CutoutError>;

    /// Averages the four corner samples channel by channel
    ///
    /// Each channel is summed and divided by four with truncation, so corners
    /// `(1, 0, 0)`, `(0, 0, 0)`, `(0, 0, 0)`, `(0, 0, 0)` give a red of 0.
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When the image has zero width or height
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_cutout::{Image, ReferenceColor};
    /// use image::Rgb;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image: Image<Rgb<u8>> = Image::from_pixel(4, 4, Rgb([10, 20, 30]));
    /// assert_eq!(image.reference_color()?, Rgb([10, 20, 30]));
    /// # Ok(())
    /// # }
    /// ```
    fn reference_color(&self) -> Result<Rgb<u8>, CutoutError> {
        let corners = self.corner_samples()?;
        let mut sums = [0u16; 3];
        for Rgb(channels) in corners {
            for (sum, channel) in sums.iter_mut().zip(channels) {
                *sum += u16::from(channel);
            }
        }
        Ok(Rgb(sums.map(|sum| (sum / 4) as u8)))
    }
}

impl<P> ReferenceColor for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn corner_samples(&self) -> Result<[Rgb<u8>; 4], CutoutError> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height, "ReferenceColor")?;

        let mut corners = [Rgb([0u8; 3]); 4];
        for (corner, (y, x)) in corners
            .iter_mut()
            .zip(iproduct!([0, height - 1], [0, width - 1]))
        {
            *corner = opaque_rgb(*self.get_pixel(x, y));
        }
        Ok(corners)
    }
}

/// Reads a pixel as RGB, dropping any alpha channel
#[inline]
pub(crate) fn opaque_rgb<P>(pixel: P) -> Rgb<u8>
where
    P: Pixel<Subpixel = u8>,
{
    let Rgba([red, green, blue, _]) = pixel.to_rgba();
    Rgb([red, green, blue])
}
