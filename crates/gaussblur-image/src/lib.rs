#![deny(missing_docs)]
//! Image types for the separable Gaussian blur

/// image representation for the blur passes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize, Rgba8Image};
