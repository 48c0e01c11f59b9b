use gaussblur_image::{Image, ImageSize};

use super::convolve::{accumulate, convolve_line, quantize, BorderPolicy, Line};
use super::kernels::KernelWeights;
use crate::error::FilterError;
use crate::parallel::{for_each_row, ExecutionStrategy};

fn check_line(len: usize, kernel: &KernelWeights, policy: BorderPolicy) -> Result<(), FilterError> {
    if len < policy.min_len(kernel.radius()) {
        return Err(FilterError::KernelTooLarge {
            span: kernel.span(),
            len,
        });
    }
    Ok(())
}

fn check_dst_size(expected: ImageSize, actual: ImageSize) -> Result<(), FilterError> {
    if expected != actual {
        return Err(FilterError::InvalidImageSize { expected, actual });
    }
    Ok(())
}

/// Size of the image produced by a horizontal pass over an image of `size`.
pub fn horizontal_output_size(size: ImageSize, radius: usize, policy: BorderPolicy) -> ImageSize {
    ImageSize {
        width: policy.output_len(size.width, radius),
        height: size.height,
    }
}

/// Size of the image produced by a vertical pass over an image of `size`.
pub fn vertical_output_size(size: ImageSize, radius: usize, policy: BorderPolicy) -> ImageSize {
    ImageSize {
        width: size.width,
        height: policy.output_len(size.height, radius),
    }
}

/// Convolve every row of an image with a 1D kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W', C), where W' is
///   `policy.output_len(W, radius)`.
/// * `kernel` - The kernel weights.
/// * `policy` - How taps past the row ends are handled.
/// * `strategy` - The execution strategy.
pub fn horizontal_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel: &KernelWeights,
    policy: BorderPolicy,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_line(src.width(), kernel, policy)?;

    let dst_size = horizontal_output_size(src.size(), kernel.radius(), policy);
    check_dst_size(dst_size, dst.size())?;

    if dst_size.num_pixels() == 0 {
        return Ok(());
    }

    let strategy = strategy.resolve(src.size().num_pixels());
    log::debug!(
        "horizontal blur {} -> {} span={} policy={:?} strategy={:?}",
        src.size(),
        dst_size,
        kernel.span(),
        policy,
        strategy
    );

    let src_cols = src.cols();
    let src_data = src.as_slice();
    let weights = kernel.as_slice();

    for_each_row(
        dst.as_slice_mut(),
        dst_size.width * C,
        strategy,
        |r, dst_row| {
            convolve_line::<C>(
                src_data,
                Line {
                    base: r * src_cols,
                    step: 1,
                    len: src_cols,
                },
                dst_row,
                Line {
                    base: 0,
                    step: 1,
                    len: dst_size.width,
                },
                weights,
                policy,
            )
        },
    )?;

    Ok(())
}

/// Convolve every column of an image with a 1D kernel.
///
/// The work is split by destination row: each worker owns one output row and
/// reads the `span` source rows under it.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H', W, C), where H' is
///   `policy.output_len(H, radius)`.
/// * `kernel` - The kernel weights.
/// * `policy` - How taps past the column ends are handled.
/// * `strategy` - The execution strategy.
pub fn vertical_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel: &KernelWeights,
    policy: BorderPolicy,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_line(src.height(), kernel, policy)?;

    let dst_size = vertical_output_size(src.size(), kernel.radius(), policy);
    check_dst_size(dst_size, dst.size())?;

    if dst_size.num_pixels() == 0 {
        return Ok(());
    }

    let strategy = strategy.resolve(src.size().num_pixels());
    log::debug!(
        "vertical blur {} -> {} span={} policy={:?} strategy={:?}",
        src.size(),
        dst_size,
        kernel.span(),
        policy,
        strategy
    );

    let (rows, cols) = (src.rows(), src.cols());
    let radius = kernel.radius();
    let src_data = src.as_slice();
    let weights = kernel.as_slice();

    for_each_row(dst.as_slice_mut(), cols * C, strategy, |r, dst_row| {
        let taps = policy.taps(r, rows, radius);
        dst_row
            .chunks_exact_mut(C)
            .enumerate()
            .for_each(|(c, dst_pixel)| {
                let acc = accumulate::<C>(src_data, taps.first * cols + c, cols, weights, taps);
                quantize(&acc, dst_pixel);
            });
    })?;

    Ok(())
}

/// Blur an image keeping only the pixels whose whole window fits in the source.
///
/// Runs a cropped horizontal pass followed by a cropped vertical pass.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H - 2r, W - 2r, C).
/// * `kernel` - The kernel weights, applied on both axes.
/// * `strategy` - The execution strategy.
///
/// # Examples
///
/// ```
/// use gaussblur_image::{Image, ImageSize};
/// use gaussblur_imgproc::filter::{gaussian_blur_strict, KernelWeights};
/// use gaussblur_imgproc::parallel::ExecutionStrategy;
///
/// let src = Image::<u8, 4>::from_size_pixel(ImageSize { width: 8, height: 6 }, [10, 20, 30, 255]).unwrap();
/// let mut dst = Image::<u8, 4>::from_size_val(ImageSize { width: 4, height: 2 }, 0).unwrap();
/// let kernel = KernelWeights::from_radius(2).unwrap();
///
/// gaussian_blur_strict(&src, &mut dst, &kernel, ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(dst.pixel(3, 1).unwrap(), &[10, 20, 30, 255]);
/// ```
pub fn gaussian_blur_strict<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel: &KernelWeights,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    separable_blur(src, dst, kernel, BorderPolicy::Crop, strategy)
}

/// Blur an image keeping its size, clamping to the edge pixels on both axes.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The kernel weights, applied on both axes.
/// * `strategy` - The execution strategy.
pub fn gaussian_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel: &KernelWeights,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    separable_blur(src, dst, kernel, BorderPolicy::ClampEdges, strategy)
}

fn separable_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel: &KernelWeights,
    policy: BorderPolicy,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_line(src.width(), kernel, policy)?;
    check_line(src.height(), kernel, policy)?;

    let tmp_size = horizontal_output_size(src.size(), kernel.radius(), policy);
    let dst_size = vertical_output_size(tmp_size, kernel.radius(), policy);
    check_dst_size(dst_size, dst.size())?;

    // resolve once so that both passes agree on the strategy
    let strategy = strategy.resolve(src.size().num_pixels());

    let mut tmp = Image::<u8, C>::from_size_val(tmp_size, 0)?;
    horizontal_blur(src, &mut tmp, kernel, policy, strategy)?;
    vertical_blur(&tmp, dst, kernel, policy, strategy)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: usize, height: usize) -> ImageSize {
        ImageSize { width, height }
    }

    #[test]
    fn test_horizontal_blur_sizes() -> Result<(), FilterError> {
        let kernel = KernelWeights::from_radius(2)?;
        let src = Image::<u8, 4>::from_size_val(size(9, 3), 0)?;

        for (policy, width) in [
            (BorderPolicy::Crop, 5),
            (BorderPolicy::ClampTrailing, 7),
            (BorderPolicy::ClampEdges, 9),
        ] {
            let mut dst = Image::<u8, 4>::from_size_val(size(width, 3), 1)?;
            horizontal_blur(&src, &mut dst, &kernel, policy, ExecutionStrategy::Serial)?;
            assert!(dst.as_slice().iter().all(|&v| v == 0));
        }
        Ok(())
    }

    #[test]
    fn test_horizontal_blur_invalid_dst() -> Result<(), FilterError> {
        let kernel = KernelWeights::from_radius(1)?;
        let src = Image::<u8, 4>::from_size_val(size(5, 2), 0)?;
        let mut dst = Image::<u8, 4>::from_size_val(size(5, 2), 0)?;

        let res = horizontal_blur(
            &src,
            &mut dst,
            &kernel,
            BorderPolicy::Crop,
            ExecutionStrategy::Serial,
        );
        assert_eq!(
            res,
            Err(FilterError::InvalidImageSize {
                expected: size(3, 2),
                actual: size(5, 2),
            })
        );
        Ok(())
    }

    #[test]
    fn test_vertical_blur_kernel_too_large() -> Result<(), FilterError> {
        let kernel = KernelWeights::from_radius(2)?;
        let src = Image::<u8, 1>::from_size_val(size(10, 4), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val(size(10, 1), 0)?;

        let res = vertical_blur(
            &src,
            &mut dst,
            &kernel,
            BorderPolicy::Crop,
            ExecutionStrategy::Serial,
        );
        assert_eq!(res, Err(FilterError::KernelTooLarge { span: 5, len: 4 }));
        Ok(())
    }

    #[test]
    fn test_vertical_blur_clamp_edges() -> Result<(), FilterError> {
        let kernel = KernelWeights::new(vec![0.25, 0.5, 0.25])?;

        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(size(2, 5), vec![
            10, 0,
            20, 0,
            30, 100,
            40, 0,
            50, 0,
        ])?;
        let mut dst = Image::<u8, 1>::from_size_val(size(2, 5), 0)?;
        vertical_blur(
            &src,
            &mut dst,
            &kernel,
            BorderPolicy::ClampEdges,
            ExecutionStrategy::Parallel,
        )?;

        #[rustfmt::skip]
        assert_eq!(dst.as_slice(), &[
            13, 0,
            20, 25,
            30, 50,
            40, 25,
            48, 0,
        ]);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_strict_impulse() -> Result<(), FilterError> {
        let kernel = KernelWeights::new(vec![0.25, 0.5, 0.25])?;

        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(size(5, 5), vec![
            0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
            0, 0, 160, 0, 0,
            0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ])?;
        let mut dst = Image::<u8, 1>::from_size_val(size(3, 3), 0)?;
        gaussian_blur_strict(&src, &mut dst, &kernel, ExecutionStrategy::Serial)?;

        // outer product of the kernel scaled by the impulse
        #[rustfmt::skip]
        assert_eq!(dst.as_slice(), &[
            10, 20, 10,
            20, 40, 20,
            10, 20, 10,
        ]);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_keeps_size() -> Result<(), FilterError> {
        let kernel = KernelWeights::from_radius(3)?;
        let src = Image::<u8, 4>::from_size_pixel(size(4, 3), [200, 100, 50, 255])?;
        let mut dst = Image::<u8, 4>::from_size_val(size(4, 3), 0)?;

        // the window is wider than the image on both axes
        gaussian_blur(&src, &mut dst, &kernel, ExecutionStrategy::Serial)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_strict_saturates() -> Result<(), FilterError> {
        let kernel = KernelWeights::new(vec![1.0, 1.0, 1.0])?;
        let src = Image::<u8, 4>::from_size_pixel(size(3, 3), [200, 10, 0, 255])?;
        let mut dst = Image::<u8, 4>::from_size_val(size(1, 1), 0)?;

        gaussian_blur_strict(&src, &mut dst, &kernel, ExecutionStrategy::Serial)?;

        // the intermediate pass already saturates the first and last channels
        assert_eq!(dst.as_slice(), &[255, 90, 0, 255]);
        Ok(())
    }
}
