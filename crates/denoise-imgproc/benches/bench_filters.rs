use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use denoise_image::Image;
use denoise_imgproc::filter::{
    adaptive_median_filter, apply_filter, bilateral_filter, gaussian_filter, mean_filter,
    median_filter, Filter, WindowParams,
};
use denoise_imgproc::noise::{add_noise_with_seed, Noise};

fn noisy_image(width: usize, height: usize) -> Image<u8, 1> {
    let data = (0..width * height)
        .map(|i| ((i % width) * 255 / width) as u8)
        .collect();
    let image = Image::new([width, height].into(), data).unwrap();
    add_noise_with_seed(&image, &Noise::SaltPepper { amount: 10.0 }, Some(0)).unwrap()
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filters");

    for (width, height) in [(256, 224), (512, 448)].iter() {
        for kernel_size in [3, 5, 7].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * *kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            let image = noisy_image(*width, *height);
            let output = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();

            group.bench_with_input(
                BenchmarkId::new("mean_filter", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(mean_filter(src, &mut dst, *kernel_size)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_filter", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(gaussian_filter(src, &mut dst, *kernel_size, 1.5)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("median_filter", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(median_filter(src, &mut dst, *kernel_size)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("adaptive_median_filter", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(adaptive_median_filter(src, &mut dst, *kernel_size)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("bilateral_filter", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(bilateral_filter(src, &mut dst, *kernel_size, 2.0, 30.0)))
                },
            );
        }
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dispatch");

    let gray = noisy_image(512, 448);
    let rgb = Image::<u8, 3>::from_channels(&[gray.clone(), gray.clone(), gray.clone()]).unwrap();
    let filter = Filter::Median(WindowParams { kernel_size: 5 });

    group.bench_function("apply_filter_mono8", |b| {
        b.iter(|| black_box(apply_filter(&gray, &filter)))
    });

    group.bench_function("apply_filter_rgb8", |b| {
        b.iter(|| black_box(apply_filter(&rgb, &filter)))
    });

    group.finish();
}

criterion_group!(benches, bench_filters, bench_dispatch);
criterion_main!(benches);
