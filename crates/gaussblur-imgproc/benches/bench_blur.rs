use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gaussblur_image::{Image, ImageSize};
use gaussblur_imgproc::{
    filter::{gaussian_blur, gaussian_blur_strict, KernelWeights},
    parallel::ExecutionStrategy,
    GaussBlur,
};

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gaussian Blur");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for radius in [1, 3, 6, 12].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * (2 * *radius + 1)) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, radius);

            let size = ImageSize {
                width: *width,
                height: *height,
            };
            let strict_size = ImageSize {
                width: width - 2 * radius,
                height: height - 2 * radius,
            };

            let image = Image::<u8, 4>::from_size_pixel(size, [10, 80, 160, 255]).unwrap();
            let kernel = KernelWeights::from_radius(*radius).unwrap();

            for (name, strategy) in [
                ("strict_serial", ExecutionStrategy::Serial),
                ("strict_parallel", ExecutionStrategy::Parallel),
            ] {
                let output = Image::<u8, 4>::from_size_val(strict_size, 0).unwrap();
                group.bench_with_input(
                    BenchmarkId::new(name, &parameter_string),
                    &(&image, &output),
                    |b, i| {
                        let (src, mut dst) = (i.0, i.1.clone());
                        b.iter(|| {
                            black_box(gaussian_blur_strict(src, &mut dst, &kernel, strategy))
                        })
                    },
                );
            }

            group.bench_with_input(
                BenchmarkId::new("expanded_parallel", &parameter_string),
                &image,
                |b, src| {
                    let mut dst = Image::<u8, 4>::from_size_val(size, 0).unwrap();
                    b.iter(|| {
                        black_box(gaussian_blur(
                            src,
                            &mut dst,
                            &kernel,
                            ExecutionStrategy::Parallel,
                        ))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new("gauss_blur_reused", &parameter_string),
                &image,
                |b, src| {
                    let mut blur = GaussBlur::<4>::new(*radius, size)
                        .unwrap()
                        .with_strategy(ExecutionStrategy::Parallel);
                    b.iter(|| black_box(blur.generate_strict(src)))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_blur);
criterion_main!(benches);
