//! Request configuration for cut-out operations

use serde::{Deserialize, Serialize};

use crate::codec::OutputFormat;
use crate::error::CutoutError;
use crate::imageops_cutout::backdrop::{Backdrop, HexColor};
use crate::imageops_cutout::classifier::DEFAULT_TOLERANCE;

/// Longest side an input is downsized to before classification
pub const DEFAULT_MAX_DIMENSION: u32 = 1500;
/// Largest accepted upload, 5 MiB
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
/// JPEG quality used when none is requested
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Options for a single cut-out request
///
/// Every field is optional in the serialized form and falls back to its
/// default, so a partial JSON payload such as `{"backgroundColor": "#ffffff"}`
/// is a complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CutoutConfig {
    /// Per-channel difference below which a pixel counts as background (default 40)
    pub tolerance: u8,
    /// Inputs with a longer side above this are downsized first; `None` disables (default 1500)
    pub max_dimension: Option<u32>,
    /// Uploads larger than this are rejected; `None` disables (default 5 MiB)
    pub max_input_bytes: Option<usize>,
    /// Solid colour placed behind the cut-out; `None` keeps transparency (default)
    pub background_color: Option<HexColor>,
    /// Encoding of the result (default PNG)
    pub output_format: OutputFormat,
    /// JPEG quality in `1..=100` (default 95)
    pub jpeg_quality: u8,
}

impl Default for CutoutConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
            max_input_bytes: Some(DEFAULT_MAX_INPUT_BYTES),
            background_color: None,
            output_format: OutputFormat::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl CutoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: Option<u32>) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: Option<usize>) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn with_background_color(mut self, color: Option<HexColor>) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Checks value ranges
    ///
    /// # Errors
    ///
    /// * `CutoutError::InvalidInput` - For a zero `max_dimension` or
    ///   `max_input_bytes`, or a `jpeg_quality` outside `1..=100`
    pub fn validate(&self) -> Result<(), CutoutError> {
        if self.max_dimension == Some(0) {
            return Err(CutoutError::InvalidInput(
                "maxDimension must be at least 1".to_string(),
            ));
        }
        if self.max_input_bytes == Some(0) {
            return Err(CutoutError::InvalidInput(
                "maxInputBytes must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CutoutError::InvalidInput(format!(
                "jpegQuality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Backdrop described by `background_color`
    pub fn backdrop(&self) -> Backdrop {
        self.background_color
            .map_or(Backdrop::Transparent, Backdrop::from)
    }
}
