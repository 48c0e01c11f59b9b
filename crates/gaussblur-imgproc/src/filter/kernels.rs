use crate::error::FilterError;

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size.max(1) - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// The sigma used when only a radius is given.
///
/// Three sigmas fit in the radius, so the truncated tails carry well under 1% of the weight.
pub fn sigma_from_radius(radius: usize) -> f32 {
    radius as f32 / 3.0
}

/// Round a pixel count up to the next multiple of four.
///
/// Some platforms pad the row pitch of pixel allocations this way; pass the
/// result as the pitch of the `*_with_len` variants to address such buffers.
pub fn aligned_pitch(num_pixels: usize) -> usize {
    num_pixels.div_ceil(4) * 4
}

/// The weights of a 1D convolution kernel with `2 * radius + 1` taps.
///
/// The weights are read-only once built and are shared by every row and
/// column of a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelWeights {
    weights: Vec<f32>,
}

impl KernelWeights {
    /// Wrap raw weights.
    ///
    /// The weights need not be symmetric nor sum to one.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernelLength`] if `weights` is empty or has an even length.
    pub fn new(weights: Vec<f32>) -> Result<Self, FilterError> {
        if weights.len() % 2 == 0 {
            return Err(FilterError::InvalidKernelLength(weights.len()));
        }
        Ok(Self { weights })
    }

    /// Sampled gaussian with the given radius and sigma, normalized to sum one.
    ///
    /// # Examples
    ///
    /// ```
    /// use gaussblur_imgproc::filter::KernelWeights;
    ///
    /// let kernel = KernelWeights::gaussian(2, 1.0).unwrap();
    /// assert_eq!(kernel.span(), 5);
    /// assert!((kernel.as_slice().iter().sum::<f32>() - 1.0).abs() < 1e-6);
    /// ```
    pub fn gaussian(radius: usize, sigma: f32) -> Result<Self, FilterError> {
        if radius == 0 {
            return Ok(Self::identity());
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(FilterError::InvalidSigma(sigma));
        }
        Self::new(gaussian_kernel_1d(radius * 2 + 1, sigma))
    }

    /// Sampled gaussian with `sigma = radius / 3`.
    pub fn from_radius(radius: usize) -> Result<Self, FilterError> {
        Self::gaussian(radius, sigma_from_radius(radius))
    }

    /// The single tap kernel `[1.0]`, which leaves an image unchanged.
    pub fn identity() -> Self {
        Self { weights: vec![1.0] }
    }

    /// Half-width of the kernel.
    pub fn radius(&self) -> usize {
        self.weights.len() / 2
    }

    /// Number of taps, `2 * radius + 1`.
    pub fn span(&self) -> usize {
        self.weights.len()
    }

    /// The weights in tap order.
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(5, 0.5);

        let expected = [
            0.00026386508,
            0.10645077,
            0.78657067,
            0.10645077,
            0.00026386508,
        ];

        for (i, &k) in kernel.iter().enumerate() {
            assert_relative_eq!(k, expected[i], epsilon = 1e-7);
        }
    }

    #[test]
    fn test_kernel_weights_from_radius() -> Result<(), FilterError> {
        let kernel = KernelWeights::from_radius(3)?;
        assert_eq!(kernel.radius(), 3);
        assert_eq!(kernel.span(), 7);
        assert_relative_eq!(kernel.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-6);

        // symmetric and peaked at the center
        let w = kernel.as_slice();
        for i in 0..3 {
            assert_relative_eq!(w[i], w[6 - i], epsilon = 1e-7);
            assert!(w[i] < w[i + 1]);
        }

        // sigma = 1 for radius 3
        let ratio = w[2] / w[3];
        assert_relative_eq!(ratio, (-0.5f32).exp(), epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_kernel_weights_identity() -> Result<(), FilterError> {
        let kernel = KernelWeights::from_radius(0)?;
        assert_eq!(kernel, KernelWeights::identity());
        assert_eq!(kernel.radius(), 0);
        Ok(())
    }

    #[test]
    fn test_kernel_weights_invalid() {
        assert_eq!(
            KernelWeights::new(vec![]),
            Err(FilterError::InvalidKernelLength(0))
        );
        assert_eq!(
            KernelWeights::new(vec![0.5, 0.5]),
            Err(FilterError::InvalidKernelLength(2))
        );
        assert_eq!(
            KernelWeights::gaussian(2, 0.0),
            Err(FilterError::InvalidSigma(0.0))
        );
    }

    #[test]
    fn test_aligned_pitch() {
        assert_eq!(aligned_pitch(0), 0);
        assert_eq!(aligned_pitch(1), 4);
        assert_eq!(aligned_pitch(8), 8);
        assert_eq!(aligned_pitch(9), 12);
    }
}
