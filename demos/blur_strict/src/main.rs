use argh::FromArgs;
use std::time::Instant;

use gaussblur::{
    image::{Image, ImageSize},
    imgproc::{parallel::ExecutionStrategy, GaussBlur},
};

#[derive(FromArgs)]
/// Blur a synthetic RGBA checkerboard and report the result
struct Args {
    /// width of the synthetic image (default: 640)
    #[argh(option, default = "640")]
    width: usize,

    /// height of the synthetic image (default: 480)
    #[argh(option, default = "480")]
    height: usize,

    /// blur radius in pixels (default: 9)
    #[argh(option, short = 'r', default = "9")]
    radius: usize,

    /// number of worker threads, 0 to run serially (default: use all cores)
    #[argh(option, short = 't')]
    threads: Option<usize>,

    /// keep the input size by clamping to the edge pixels
    #[argh(switch, short = 'e')]
    expanded: bool,
}

/// Checkerboard of 16x16 cells, opaque, one hue per cell column.
fn checkerboard(size: ImageSize) -> Result<Image<u8, 4>, Box<dyn std::error::Error>> {
    let mut data = Vec::with_capacity(size.num_pixels() * 4);
    for y in 0..size.height {
        for x in 0..size.width {
            let on = ((x / 16) + (y / 16)) % 2 == 0;
            let v = if on { 255 } else { 0 };
            data.extend_from_slice(&[v, ((x * 255) / size.width.max(1)) as u8, 255 - v, 255]);
        }
    }
    Ok(Image::new(size, data)?)
}

fn channel_means(image: &Image<u8, 4>) -> [f64; 4] {
    let mut sums = [0u64; 4];
    image.as_slice().chunks_exact(4).for_each(|p| {
        sums.iter_mut().zip(p).for_each(|(s, &v)| *s += v as u64);
    });
    let n = image.size().num_pixels().max(1) as f64;
    sums.map(|s| s as f64 / n)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };

    let strategy = match args.threads {
        None => ExecutionStrategy::Auto,
        Some(0) => ExecutionStrategy::Serial,
        Some(n) => ExecutionStrategy::Fixed(n),
    };

    let input = checkerboard(size)?;
    let mut blur = GaussBlur::<4>::new(args.radius, size)?.with_strategy(strategy);

    let start = Instant::now();
    let output = if args.expanded {
        blur.generate_expanded(&input)?
    } else {
        blur.generate_strict(&input)?
    };
    let elapsed = start.elapsed();

    log::info!(
        "blurred {} -> {} with radius {} in {:?}",
        input.size(),
        output.size(),
        args.radius,
        elapsed
    );

    println!("input  means: {:?}", channel_means(&input));
    println!("output means: {:?}", channel_means(&output));

    Ok(())
}
