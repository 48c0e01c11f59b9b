#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// error types for the blur operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// module containing parallelization utilities.
pub mod parallel;

pub use error::FilterError;
pub use filter::GaussBlur;
