use gaussblur_image::{Image, ImageSize};

use super::convolve::BorderPolicy;
use super::kernels::KernelWeights;
use super::ops::{gaussian_blur, horizontal_blur, horizontal_output_size, vertical_blur};
use crate::error::FilterError;
use crate::parallel::ExecutionStrategy;

/// A Gaussian blur bound to one input size.
///
/// The kernel and the buffer for the horizontal pass are computed once and
/// reused by every call, so blurring a stream of same-sized frames does not
/// reallocate the intermediate image.
///
/// # Examples
///
/// ```
/// use gaussblur_image::{Image, ImageSize};
/// use gaussblur_imgproc::GaussBlur;
///
/// let size = ImageSize { width: 32, height: 24 };
/// let mut blur = GaussBlur::<4>::new(3, size).unwrap();
/// assert_eq!(blur.output_size(), ImageSize { width: 26, height: 18 });
///
/// let input = Image::<u8, 4>::from_size_val(size, 0).unwrap();
/// let output = blur.generate_strict(&input).unwrap();
/// assert_eq!(output.size(), blur.output_size());
/// ```
#[derive(Debug)]
pub struct GaussBlur<const C: usize> {
    kernel: KernelWeights,
    input_size: ImageSize,
    output_size: ImageSize,
    strategy: ExecutionStrategy,
    intermediate: Image<u8, C>,
}

/// A [`GaussBlur`] over RGBA images.
pub type RgbaGaussBlur = GaussBlur<4>;

impl<const C: usize> GaussBlur<C> {
    /// Create a blur of the given radius for images of `size`.
    ///
    /// The kernel is a gaussian with `sigma = radius / 3`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::KernelTooLarge`] if the kernel does not fit in the image.
    pub fn new(radius: usize, size: ImageSize) -> Result<Self, FilterError> {
        Self::with_kernel(KernelWeights::from_radius(radius)?, size)
    }

    /// Create a blur from explicit kernel weights for images of `size`.
    pub fn with_kernel(kernel: KernelWeights, size: ImageSize) -> Result<Self, FilterError> {
        let radius = kernel.radius();
        for len in [size.width, size.height] {
            if len < BorderPolicy::Crop.min_len(radius) {
                return Err(FilterError::KernelTooLarge {
                    span: kernel.span(),
                    len,
                });
            }
        }

        let intermediate_size = horizontal_output_size(size, radius, BorderPolicy::Crop);
        let output_size = ImageSize {
            width: intermediate_size.width,
            height: size.height - 2 * radius,
        };

        log::debug!(
            "gauss blur radius={} input={} output={}",
            radius,
            size,
            output_size
        );

        Ok(Self {
            kernel,
            input_size: size,
            output_size,
            strategy: ExecutionStrategy::default(),
            intermediate: Image::from_size_val(intermediate_size, 0)?,
        })
    }

    /// Set the execution strategy of the passes.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The kernel applied on both axes.
    pub fn kernel(&self) -> &KernelWeights {
        &self.kernel
    }

    /// The size of the images this blur accepts.
    pub fn input_size(&self) -> ImageSize {
        self.input_size
    }

    /// The size of the images returned by [`GaussBlur::generate_strict`].
    pub fn output_size(&self) -> ImageSize {
        self.output_size
    }

    fn check_input(&self, input: &Image<u8, C>) -> Result<(), FilterError> {
        if input.size() != self.input_size {
            return Err(FilterError::InputSizeMismatch {
                expected: self.input_size,
                actual: input.size(),
            });
        }
        Ok(())
    }

    /// Blur `input`, dropping `radius` pixels on every side.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InputSizeMismatch`] if `input` does not have the size
    /// the blur was created for.
    pub fn generate_strict(&mut self, input: &Image<u8, C>) -> Result<Image<u8, C>, FilterError> {
        self.check_input(input)?;

        let strategy = self.strategy.resolve(self.input_size.num_pixels());
        horizontal_blur(
            input,
            &mut self.intermediate,
            &self.kernel,
            BorderPolicy::Crop,
            strategy,
        )?;

        let mut output = Image::from_size_val(self.output_size, 0)?;
        vertical_blur(
            &self.intermediate,
            &mut output,
            &self.kernel,
            BorderPolicy::Crop,
            strategy,
        )?;

        Ok(output)
    }

    /// Blur `input` keeping its size, clamping to the edge pixels.
    pub fn generate_expanded(&self, input: &Image<u8, C>) -> Result<Image<u8, C>, FilterError> {
        self.check_input(input)?;

        let mut output = Image::from_size_val(self.input_size, 0)?;
        gaussian_blur(input, &mut output, &self.kernel, self.strategy)?;

        Ok(output)
    }
}
