//! Test utilities for imageops-cutout
//!
//! Fixtures shared by the unit tests. Only compiled when running tests.

use image::{Luma, Pixel, Primitive, Rgb, Rgba};
use imageproc::definitions::Image;
use itertools::iproduct;

/// Creates a 2x2 RGB image with known pixel values:
/// - (0,0): [200, 150, 100]
/// - (1,0): [100, 200, 150]
/// - (0,1): [150, 100, 200]
/// - (1,1): [50, 75, 25]
pub fn create_test_rgb_image() -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgb([200, 150, 100]));
    image.put_pixel(1, 0, Rgb([100, 200, 150]));
    image.put_pixel(0, 1, Rgb([150, 100, 200]));
    image.put_pixel(1, 1, Rgb([50, 75, 25]));
    image
}

/// Same colors as [`create_test_rgb_image`] with alpha 255, 128, 64 and 0
pub fn create_test_rgba_image() -> Image<Rgba<u8>> {
    let mut image: Image<Rgba<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgba([200, 150, 100, 255]));
    image.put_pixel(1, 0, Rgba([100, 200, 150, 128]));
    image.put_pixel(0, 1, Rgba([150, 100, 200, 64]));
    image.put_pixel(1, 1, Rgba([50, 75, 25, 0]));
    image
}

/// Creates a 2x2 mask with values 255, 192, 128 and 64 in row-major order
pub fn create_test_alpha_mask() -> Image<Luma<u8>> {
    let mut mask: Image<Luma<u8>> = Image::new(2, 2);
    mask.put_pixel(0, 0, Luma([255]));
    mask.put_pixel(1, 0, Luma([192]));
    mask.put_pixel(0, 1, Luma([128]));
    mask.put_pixel(1, 1, Luma([64]));
    mask
}

/// Creates an image filled with `background` and a `subject` rectangle in the middle third
///
/// The subject covers `width / 3 .. width - width / 3` horizontally and the
/// same fraction vertically.
pub fn create_framed_subject(
    width: u32,
    height: u32,
    background: Rgb<u8>,
    subject: Rgb<u8>,
) -> Image<Rgb<u8>> {
    let mut image = Image::from_pixel(width, height, background);
    for (y, x) in iproduct!(
        height / 3..height - height / 3,
        width / 3..width - width / 3
    ) {
        image.put_pixel(x, y, subject);
    }
    image
}

/// Compares two pixels channel by channel within `tolerance`
pub fn pixels_approx_equal<P>(expected: P, actual: P, tolerance: f32) -> bool
where
    P: Pixel,
    P::Subpixel: Primitive,
    f32: From<P::Subpixel>,
{
    expected
        .channels()
        .iter()
        .zip(actual.channels())
        .all(|(&e, &a)| (f32::from(e) - f32::from(a)).abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_framed_subject_places_subject_in_middle() {
        let image = create_framed_subject(6, 3, Rgb([0, 0, 0]), Rgb([9, 9, 9]));
        let subject: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == Rgb([9, 9, 9]))
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(subject, vec![(2, 1), (3, 1)]);
    }

    #[test]
    fn pixels_approx_equal_with_tolerant_comparison() {
        let pixel1 = Rgb([100u8, 150u8, 200u8]);
        let pixel2 = Rgb([101u8, 149u8, 201u8]);
        let pixel3 = Rgb([105u8, 145u8, 205u8]);

        assert!(pixels_approx_equal(pixel1, pixel2, 1.5));
        assert!(!pixels_approx_equal(pixel1, pixel3, 1.5));
    }
}
