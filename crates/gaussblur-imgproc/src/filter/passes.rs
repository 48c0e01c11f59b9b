//! Per-row and per-column blur passes.
//!
//! Each function handles one row or one column of a flat, row-major buffer with
//! `C` interleaved 8-bit channels per pixel. They do not validate the geometry:
//! the caller sizes the buffers and dispatches one call per row or column,
//! sequentially or in parallel. Calls for different rows (or columns) write
//! disjoint destination pixels.

use super::convolve::{convolve_line, BorderPolicy, Line};
use super::kernels::KernelWeights;

/// Blur one row, dropping `radius` pixels on each side.
///
/// Reads source row `row` of `width` pixels and writes `width - 2 * radius` pixels
/// to destination row `row`, whose pitch is `width - 2 * radius`.
///
/// # Arguments
///
/// * `src` - The source buffer with rows of `width` pixels.
/// * `dst` - The destination buffer with rows of `width - 2 * radius` pixels.
/// * `row` - The row to blur.
/// * `width` - The width of the source rows in pixels.
/// * `kernel` - The kernel weights.
///
/// # Examples
///
/// ```
/// use gaussblur_imgproc::filter::{blur_row_cropped, KernelWeights};
///
/// let kernel = KernelWeights::new(vec![0.25, 0.5, 0.25]).unwrap();
/// let src = [0u8, 0, 100, 0, 0];
/// let mut dst = [0u8; 3];
/// blur_row_cropped::<1>(&src, &mut dst, 0, 5, &kernel);
/// assert_eq!(dst, [25, 50, 25]);
/// ```
pub fn blur_row_cropped<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    row: usize,
    width: usize,
    kernel: &KernelWeights,
) {
    let dst_len = width - 2 * kernel.radius();
    blur_row_cropped_with_len::<C>(src, dst, row, width, width, dst_len, kernel);
}

/// Blur one row with explicit source and destination pitches.
///
/// Reads the `width` pixels of source row `row` starting at pixel `row * src_len`
/// and writes `width - 2 * radius` pixels starting at pixel `row * dst_len`. Output
/// pixel `p` is the weighted sum of source pixels `p ..= p + 2 * radius`. Pixels
/// past `width` in either pitch are neither read nor written.
///
/// PRECONDITION: `width <= src_len` and `width - 2 * radius <= dst_len`.
///
/// # Arguments
///
/// * `src` - The source buffer with rows of `src_len` pixels.
/// * `dst` - The destination buffer with rows of `dst_len` pixels.
/// * `row` - The row to blur.
/// * `width` - The number of valid pixels in the source row.
/// * `src_len` - The pitch of the source rows in pixels.
/// * `dst_len` - The pitch of the destination rows in pixels.
/// * `kernel` - The kernel weights.
pub fn blur_row_cropped_with_len<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    row: usize,
    width: usize,
    src_len: usize,
    dst_len: usize,
    kernel: &KernelWeights,
) {
    convolve_line::<C>(
        src,
        Line {
            base: row * src_len,
            step: 1,
            len: width,
        },
        dst,
        Line {
            base: row * dst_len,
            step: 1,
            len: width - 2 * kernel.radius(),
        },
        kernel.as_slice(),
        BorderPolicy::Crop,
    );
}

/// Blur one row keeping its width.
///
/// Taps that fall before the first or past the last pixel of the row reuse the
/// edge sample, so all `width` destination pixels are defined.
pub fn blur_row_expanded<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    row: usize,
    width: usize,
    kernel: &KernelWeights,
) {
    let line = Line {
        base: row * width,
        step: 1,
        len: width,
    };
    convolve_line::<C>(
        src,
        line,
        dst,
        line,
        kernel.as_slice(),
        BorderPolicy::ClampEdges,
    );
}

/// Blur one row clamping only its trailing edge.
///
/// Writes `width - radius` pixels at a destination pitch of `width - radius`:
/// the first `width - 2 * radius` are the cropped sums, the last `radius` reuse
/// the last source pixel for the taps past the end of the row.
pub fn blur_row_expanded_trailing<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    row: usize,
    width: usize,
    kernel: &KernelWeights,
) {
    let dst_len = width - kernel.radius();
    convolve_line::<C>(
        src,
        Line {
            base: row * width,
            step: 1,
            len: width,
        },
        dst,
        Line {
            base: row * dst_len,
            step: 1,
            len: dst_len,
        },
        kernel.as_slice(),
        BorderPolicy::ClampTrailing,
    );
}

/// Blur one column, dropping `radius` rows at the top and at the bottom.
///
/// Reads `height` pixels down column `column` and writes `height - 2 * radius`
/// pixels down the same column of `dst`. Both buffers have a pitch of `stride`
/// pixels.
///
/// # Examples
///
/// ```
/// use gaussblur_imgproc::filter::{blur_column_cropped, KernelWeights};
///
/// let kernel = KernelWeights::new(vec![0.25, 0.5, 0.25]).unwrap();
/// let src = [0u8, 0, 100, 0, 0];
/// let mut dst = [0u8; 3];
/// blur_column_cropped::<1>(&src, &mut dst, 0, 1, 5, &kernel);
/// assert_eq!(dst, [25, 50, 25]);
/// ```
pub fn blur_column_cropped<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    column: usize,
    stride: usize,
    height: usize,
    kernel: &KernelWeights,
) {
    let dst_len = height - 2 * kernel.radius();
    blur_column_cropped_with_len::<C>(src, dst, column, stride, dst_len, kernel);
}

/// Blur one column writing exactly `dst_len` rows.
///
/// Output row `i` is the weighted sum of source rows `i ..= i + 2 * radius`, so
/// the source column must hold at least `dst_len + 2 * radius` pixels.
pub fn blur_column_cropped_with_len<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    column: usize,
    stride: usize,
    dst_len: usize,
    kernel: &KernelWeights,
) {
    convolve_line::<C>(
        src,
        Line {
            base: column,
            step: stride,
            len: dst_len + 2 * kernel.radius(),
        },
        dst,
        Line {
            base: column,
            step: stride,
            len: dst_len,
        },
        kernel.as_slice(),
        BorderPolicy::Crop,
    );
}
