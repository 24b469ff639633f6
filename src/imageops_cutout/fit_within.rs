use image::{imageops, imageops::FilterType, Pixel};
use imageproc::definitions::Image;

use crate::error::CutoutError;

/// Trait for downsizing images that exceed a maximum dimension
pub trait FitWithin: Sized {
    /// Scales the image down so its longer side is at most `max_dimension`
    ///
    /// Both sides are scaled by `max_dimension / longer_side` and truncated,
    /// never below 1, so the longer side becomes exactly `max_dimension`.
    /// Images already within bounds are returned unchanged. Resampling uses Lanczos3.
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When `max_dimension` is zero
    fn fit_within(self, max_dimension: u32) -> Result<Self, CutoutError>;
}

/// Target size for fitting `(width, height)` into `max_dimension`, or `None` if it already fits
pub fn fitted_dimensions(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    let longer = width.max(height);
    if longer <= max_dimension {
        return None;
    }

    let scale = |side: u32| {
        let scaled = u64::from(side) * u64::from(max_dimension) / u64::from(longer);
        (scaled as u32).clamp(1, max_dimension)
    };
    Some((scale(width), scale(height)))
}

impl<P> FitWithin for Image<P>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    fn fit_within(self, max_dimension: u32) -> Result<Self, CutoutError> {
        if max_dimension == 0 {
            return Err(CutoutError::InvalidInput(
                "max dimension must be non-zero".to_string(),
            ));
        }

        let (width, height) = self.dimensions();
        match fitted_dimensions(width, height, max_dimension) {
            Some((new_width, new_height)) => {
                tracing::debug!(
                    width,
                    height,
                    new_width,
                    new_height,
                    "downsizing before classification"
                );
                Ok(imageops::resize(
                    &self,
                    new_width,
                    new_height,
                    FilterType::Lanczos3,
                ))
            }
            None => Ok(self),
        }
    }
}
