/// How a 1D pass treats kernel taps that fall outside the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPolicy {
    /// Valid-only convolution: the output is `2 * radius` pixels shorter than the input.
    #[default]
    Crop,
    /// The leading edge is cropped, the trailing `radius` pixels reuse the last
    /// sample for taps past the end: the output is `radius` pixels shorter.
    ClampTrailing,
    /// Clamp-to-edge on both sides: the output has the length of the input.
    ClampEdges,
}

/// Where the taps of one output pixel land on the source line.
///
/// The first `lead` taps reuse the sample at `first`, the next `valid` taps read
/// consecutive samples starting at `first`, and any remaining taps reuse the
/// last sample read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Taps {
    /// Position on the line of the first sample read.
    pub first: usize,
    /// Number of leading taps before the start of the line.
    pub lead: usize,
    /// Number of taps reading inside the line.
    pub valid: usize,
}

impl BorderPolicy {
    /// Number of output pixels for a line of `len` pixels.
    pub fn output_len(&self, len: usize, radius: usize) -> usize {
        match self {
            BorderPolicy::Crop => len.saturating_sub(2 * radius),
            BorderPolicy::ClampTrailing => len.saturating_sub(radius),
            BorderPolicy::ClampEdges => len,
        }
    }

    /// Shortest line the policy produces at least one pixel for.
    pub fn min_len(&self, radius: usize) -> usize {
        match self {
            BorderPolicy::Crop => 2 * radius + 1,
            BorderPolicy::ClampTrailing => radius + 1,
            BorderPolicy::ClampEdges => 1,
        }
    }

    /// The taps of output pixel `p` on a line of `len` pixels.
    ///
    /// PRECONDITION: `p < self.output_len(len, radius)`.
    pub fn taps(&self, p: usize, len: usize, radius: usize) -> Taps {
        // center of the window in source coordinates
        let center = match self {
            BorderPolicy::Crop | BorderPolicy::ClampTrailing => p + radius,
            BorderPolicy::ClampEdges => p,
        };
        let first = center.saturating_sub(radius);
        let last = (center + radius).min(len - 1);
        Taps {
            first,
            lead: radius.saturating_sub(center),
            valid: last - first + 1,
        }
    }
}

/// A run of pixels inside a flat buffer: `len` pixels starting at pixel
/// `base`, `step` pixels apart (1 for a row, the row pitch for a column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Pixel index of the first pixel.
    pub base: usize,
    /// Distance in pixels between consecutive pixels.
    pub step: usize,
    /// Number of pixels.
    pub len: usize,
}

#[inline(always)]
fn unpack<const C: usize>(src: &[u8], pixel: usize) -> [f32; C] {
    let offset = pixel * C;
    let mut color = [0.0f32; C];
    color
        .iter_mut()
        .zip(&src[offset..offset + C])
        .for_each(|(c, &v)| *c = v as f32);
    color
}

#[inline(always)]
fn add_weighted<const C: usize>(acc: &mut [f32; C], color: &[f32; C], weight: f32) {
    acc.iter_mut()
        .zip(color.iter())
        .for_each(|(a, &c)| *a += c * weight);
}

/// Weighted sum of the samples under one kernel window.
///
/// # Arguments
///
/// * `src` - The flat source buffer with `C` channels per pixel.
/// * `first` - Pixel index of the first sample to read.
/// * `step` - Distance in pixels between consecutive samples.
/// * `weights` - The kernel, one weight per tap.
/// * `taps` - How the taps map onto the source, see [`Taps`].
///
/// The edge taps reuse the unpacked color instead of fetching the edge pixel again.
#[inline]
pub fn accumulate<const C: usize>(
    src: &[u8],
    first: usize,
    step: usize,
    weights: &[f32],
    taps: Taps,
) -> [f32; C] {
    let mut acc = [0.0f32; C];
    let mut color = unpack::<C>(src, first);

    let (lead, rest) = weights.split_at(taps.lead);
    let (inside, trail) = rest.split_at(taps.valid);

    for &w in lead {
        add_weighted(&mut acc, &color, w);
    }

    let mut pixel = first;
    for &w in inside {
        color = unpack::<C>(src, pixel);
        add_weighted(&mut acc, &color, w);
        pixel += step;
    }

    for &w in trail {
        add_weighted(&mut acc, &color, w);
    }

    acc
}

/// Round and saturate an accumulated color into 8-bit channels.
#[inline(always)]
pub fn quantize<const C: usize>(acc: &[f32; C], dst: &mut [u8]) {
    dst.iter_mut()
        .zip(acc.iter())
        .for_each(|(d, &a)| *d = a.round().clamp(0.0, 255.0) as u8);
}

/// Convolve one source line into one destination line.
///
/// Writes `dst_line.len` pixels, each once. The caller guarantees that
/// `dst_line.len <= policy.output_len(src_line.len, radius)` and that both lines
/// fit in their buffers; an invalid geometry panics on the slice bounds.
pub fn convolve_line<const C: usize>(
    src: &[u8],
    src_line: Line,
    dst: &mut [u8],
    dst_line: Line,
    weights: &[f32],
    policy: BorderPolicy,
) {
    let radius = weights.len() / 2;

    for p in 0..dst_line.len {
        let taps = policy.taps(p, src_line.len, radius);
        let acc = accumulate::<C>(
            src,
            src_line.base + taps.first * src_line.step,
            src_line.step,
            weights,
            taps,
        );
        let offset = (dst_line.base + p * dst_line.step) * C;
        quantize(&acc, &mut dst[offset..offset + C]);
    }
}
