use rayon::prelude::*;
use thiserror::Error;

/// Number of pixels from which [`ExecutionStrategy::Auto`] goes parallel.
pub const AUTO_PARALLEL_MIN_PIXELS: usize = 100_000;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row length used to partition the destination must be valid.
    #[error("row length must be > 0, got {0}")]
    InvalidRowLength(usize),

    /// The destination is not a whole number of rows.
    #[error("destination length ({0}) is not a multiple of the row length ({1})")]
    SizeMismatch(usize, usize),
}

/// Controls how the rows of a pass are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool, one task per destination row.
    Parallel,

    /// Parallel for images of at least [`AUTO_PARALLEL_MIN_PIXELS`] pixels, serial otherwise.
    #[default]
    Auto,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether the strategy runs in parallel for an image of `num_pixels` pixels.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel | ExecutionStrategy::Fixed(_) => true,
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_MIN_PIXELS,
        }
    }

    /// Replace [`ExecutionStrategy::Auto`] by the concrete strategy for `num_pixels` pixels.
    pub fn resolve(self, num_pixels: usize) -> Self {
        match self {
            ExecutionStrategy::Auto if self.is_parallel(num_pixels) => ExecutionStrategy::Parallel,
            ExecutionStrategy::Auto => ExecutionStrategy::Serial,
            other => other,
        }
    }
}

/// Run `f` once per row of `dst`.
///
/// `dst` is split into consecutive rows of `row_len` elements and `f` receives the
/// row index together with the row. Every row is handed to exactly one call, so
/// the calls can run concurrently without synchronization.
///
/// # Arguments
///
/// * `dst` - The destination buffer.
/// * `row_len` - The number of elements per row (pitch * channels).
/// * `strategy` - The execution strategy. `Auto` is treated as `Parallel`, use
///   [`ExecutionStrategy::resolve`] beforehand to pick by image size.
/// * `f` - The per-row operation.
pub fn for_each_row<T, F>(
    dst: &mut [T],
    row_len: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return Err(ParallelError::InvalidRowLength(row_len));
    }

    if dst.len() % row_len != 0 {
        return Err(ParallelError::SizeMismatch(dst.len(), row_len));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
        }
        ExecutionStrategy::Parallel | ExecutionStrategy::Auto => {
            dst.par_chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_len)
                    .enumerate()
                    .for_each(|(r, row)| f(r, row));
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row_index(strategy: ExecutionStrategy) -> Result<Vec<usize>, ParallelError> {
        let mut dst = vec![0; 6];
        for_each_row(&mut dst, 2, strategy, |r, row| {
            row.iter_mut().for_each(|v| *v = r);
        })?;
        Ok(dst)
    }

    #[test]
    fn test_for_each_row_serial() -> Result<(), ParallelError> {
        assert_eq!(fill_row_index(ExecutionStrategy::Serial)?, vec![0, 0, 1, 1, 2, 2]);
        Ok(())
    }

    #[test]
    fn test_for_each_row_parallel() -> Result<(), ParallelError> {
        assert_eq!(fill_row_index(ExecutionStrategy::Parallel)?, vec![0, 0, 1, 1, 2, 2]);
        assert_eq!(fill_row_index(ExecutionStrategy::Auto)?, vec![0, 0, 1, 1, 2, 2]);
        Ok(())
    }

    #[test]
    fn test_for_each_row_fixed_success() -> Result<(), ParallelError> {
        assert_eq!(fill_row_index(ExecutionStrategy::Fixed(2))?, vec![0, 0, 1, 1, 2, 2]);
        Ok(())
    }

    #[test]
    fn test_for_each_row_fixed_error() {
        let res = fill_row_index(ExecutionStrategy::Fixed(0));
        assert_eq!(res, Err(ParallelError::InvalidThreadCount(0)));
    }

    #[test]
    fn test_for_each_row_invalid_len() {
        let mut dst = vec![0u8; 5];
        let res = for_each_row(&mut dst, 0, ExecutionStrategy::Serial, |_, _| {});
        assert_eq!(res, Err(ParallelError::InvalidRowLength(0)));

        let res = for_each_row(&mut dst, 2, ExecutionStrategy::Serial, |_, _| {});
        assert_eq!(res, Err(ParallelError::SizeMismatch(5, 2)));
    }

    #[test]
    fn test_resolve_auto() {
        let auto = ExecutionStrategy::Auto;
        assert_eq!(auto.resolve(10), ExecutionStrategy::Serial);
        assert_eq!(
            auto.resolve(AUTO_PARALLEL_MIN_PIXELS),
            ExecutionStrategy::Parallel
        );
        assert_eq!(
            ExecutionStrategy::Fixed(3).resolve(10),
            ExecutionStrategy::Fixed(3)
        );
    }
}
