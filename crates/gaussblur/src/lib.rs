#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use gaussblur_image as image;

#[doc(inline)]
pub use gaussblur_imgproc as imgproc;
