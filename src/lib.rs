mod error;
mod imageops_cutout;
mod utils;

pub mod codec;
pub mod config;
pub mod pipeline;

#[cfg(test)]
mod test_utils;

use image::{ImageBuffer, Pixel};

pub use codec::OutputFormat;
pub use config::CutoutConfig;
pub use error::{AlphaMaskError, CutoutError};
pub use imageops_cutout::apply_alpha_mask::{ApplyAlphaMask, ModifyAlpha};
pub use imageops_cutout::backdrop::{Backdrop, HexColor};
pub use imageops_cutout::classifier::{
    BackgroundClassifier, CornerKeyClassifier, DEFAULT_TOLERANCE, OPAQUE, TRANSPARENT,
};
pub use imageops_cutout::fit_within::{fitted_dimensions, FitWithin};
pub use imageops_cutout::reference_color::ReferenceColor;
pub use imageops_cutout::remove_background::RemoveBackground;
pub use pipeline::{CutoutOutput, CutoutPipeline, ImagePayload};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
