//! End-to-end cut-out processing: decode, downsize, classify, composite, encode.

use std::fmt;

use image::{DynamicImage, Rgba};
use imageproc::definitions::Image;
use serde::Serialize;

use crate::codec::{self, OutputFormat};
use crate::config::CutoutConfig;
use crate::error::CutoutError;
use crate::imageops_cutout::backdrop::Backdrop;
use crate::imageops_cutout::classifier::{BackgroundClassifier, CornerKeyClassifier};
use crate::imageops_cutout::fit_within::FitWithin;
use crate::imageops_cutout::remove_background::RemoveBackground;

/// An encoded cut-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoutOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// JSON body carrying a base64-encoded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePayload {
    pub image: String,
}

impl CutoutOutput {
    pub fn to_base64(&self) -> String {
        codec::to_base64(&self.bytes)
    }

    /// `{"image": "<base64>"}`
    pub fn to_payload(&self) -> ImagePayload {
        ImagePayload {
            image: self.to_base64(),
        }
    }
}

/// Background removal pipeline
///
/// The classifier is supplied once at construction and shared by every call,
/// so a single pipeline can serve concurrent requests.
pub struct CutoutPipeline {
    classifier: Box<dyn BackgroundClassifier + Send + Sync>,
    config: CutoutConfig,
    backdrop: Backdrop,
}

impl fmt::Debug for CutoutPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CutoutPipeline")
            .field("config", &self.config)
            .field("backdrop", &self.backdrop)
            .finish_non_exhaustive()
    }
}

impl CutoutPipeline {
    /// Creates a pipeline around `classifier`
    ///
    /// The backdrop is taken from `config.background_color`.
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When `config` fails validation
    pub fn new<C>(classifier: C, config: CutoutConfig) -> Result<Self, CutoutError>
    where
        C: BackgroundClassifier + Send + Sync + 'static,
    {
        config.validate()?;
        let backdrop = config.backdrop();
        Ok(Self {
            classifier: Box::new(classifier),
            config,
            backdrop,
        })
    }

    /// Creates a pipeline using a [`CornerKeyClassifier`] with `config.tolerance`
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When `config` fails validation
    pub fn with_corner_key(config: CutoutConfig) -> Result<Self, CutoutError> {
        let classifier = CornerKeyClassifier::new(config.tolerance);
        Self::new(classifier, config)
    }

    /// Replaces the backdrop with a custom image, resized to each cut-out
    pub fn with_backdrop_image(mut self, image: Image<Rgba<u8>>) -> Self {
        self.backdrop = Backdrop::Image(image);
        self
    }

    pub fn config(&self) -> &CutoutConfig {
        &self.config
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Downsizes, classifies and composites a decoded image
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - When the image has zero width or height
    /// * `CutoutError::AlphaMask` - When the classifier's mask does not fit the image
    pub fn process_image(&self, image: DynamicImage) -> Result<Image<Rgba<u8>>, CutoutError> {
        let _span = tracing::debug_span!(
            "process_image",
            width = image.width(),
            height = image.height()
        )
        .entered();

        let mut rgba = image.into_rgba8();
        if let Some(max_dimension) = self.config.max_dimension {
            rgba = rgba.fit_within(max_dimension)?;
        }

        let cutout = rgba.remove_background(self.classifier.as_ref())?;
        Ok(self.backdrop.composite(cutout))
    }

    /// Decodes `bytes`, processes the image and encodes the result
    ///
    /// # Errors
    ///
    /// Any error of [`codec::decode`], [`Self::process_image`] or [`codec::encode`].
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<CutoutOutput, CutoutError> {
        let image = codec::decode(bytes, self.config.max_input_bytes)?;
        let result = self.process_image(image)?;
        let (width, height) = result.dimensions();

        let format = self.config.output_format;
        let bytes = codec::encode(&result, format, self.config.jpeg_quality)?;
        tracing::info!(width, height, %format, size = bytes.len(), "background removed");

        Ok(CutoutOutput {
            bytes,
            format,
            width,
            height,
        })
    }
}
