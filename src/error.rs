use thiserror::Error;

/// Error type for alpha mask operations
///
/// This error type covers failures that can occur when applying
/// alpha masks to images or replacing an existing alpha channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphaMaskError {
    /// Image and mask dimensions do not match
    ///
    /// This error occurs when attempting to apply an alpha mask
    /// to an image where the dimensions don't align properly.
    #[error("Image and mask dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },
}

/// Error type for cut-out operations
///
/// Every failure surfaced by the classifier, the codec helpers and the
/// pipeline falls into one of these variants so callers can report them
/// distinctly instead of as a single stringified failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CutoutError {
    /// The input cannot be processed as given
    ///
    /// Returned for zero-area images, empty or oversized byte payloads,
    /// malformed colours and out-of-range configuration values.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The input bytes could not be decoded into an image
    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    /// The result could not be encoded into the requested format
    #[error("Failed to encode image: {0}")]
    EncodeFailure(String),

    /// A codec or collaborator needed for the request is not compiled in
    ///
    /// For example decoding WebP input without the `webp` feature.
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Mask application failed
    #[error(transparent)]
    AlphaMask(#[from] AlphaMaskError),
}

impl From<image::ImageError> for CutoutError {
    fn from(error: image::ImageError) -> Self {
        use image::ImageError;

        match error {
            ImageError::Unsupported(err) => Self::DependencyUnavailable(err.to_string()),
            ImageError::Decoding(err) => Self::DecodeFailure(err.to_string()),
            ImageError::Encoding(err) => Self::EncodeFailure(err.to_string()),
            ImageError::Limits(err) => Self::InvalidInput(err.to_string()),
            ImageError::Parameter(err) => Self::InvalidInput(err.to_string()),
            ImageError::IoError(err) => Self::DecodeFailure(err.to_string()),
        }
    }
}
