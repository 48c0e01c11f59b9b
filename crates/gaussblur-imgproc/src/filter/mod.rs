//! Filter operations
//!
//! This module provides the separable Gaussian blur: the shared convolution
//! primitive, the per-row and per-column passes built on it, image-level passes
//! and the [`GaussBlur`] helper that chains them.

/// Filter kernels
pub mod kernels;
pub use kernels::KernelWeights;

/// Shared 1D convolution primitive
mod convolve;
pub use convolve::*;

/// Per-row and per-column passes
mod passes;
pub use passes::*;

/// Image-level filter operations
mod ops;
pub use ops::*;

/// Gaussian blur bound to an input size
mod gauss_blur;
pub use gauss_blur::*;
