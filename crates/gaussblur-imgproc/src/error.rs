use gaussblur_image::{ImageError, ImageSize};
use thiserror::Error;

use crate::parallel::ParallelError;

/// Errors raised by the blur operations before any pixel is touched.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel is empty or has an even number of taps.
    #[error("kernel length must be odd and non-zero, got {0}")]
    InvalidKernelLength(usize),

    /// The kernel sigma is not a positive finite number.
    #[error("kernel sigma must be positive and finite, got {0}")]
    InvalidSigma(f32),

    /// The kernel span does not fit in the line it is applied to.
    #[error("kernel span ({span}) does not fit in a line of {len} pixels")]
    KernelTooLarge {
        /// Number of taps of the kernel.
        span: usize,
        /// Length of the line along the convolved axis.
        len: usize,
    },

    /// The destination size does not match the size the pass produces.
    #[error("destination size {actual} does not match the expected {expected}")]
    InvalidImageSize {
        /// Size the pass produces.
        expected: ImageSize,
        /// Size of the destination image.
        actual: ImageSize,
    },

    /// The input image does not have the size the blur was created for.
    #[error("input size {actual} does not match, expected {expected}")]
    InputSizeMismatch {
        /// Size the blur was created for.
        expected: ImageSize,
        /// Size of the given input.
        actual: ImageSize,
    },

    /// Error from the image module.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the parallel execution layer.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
