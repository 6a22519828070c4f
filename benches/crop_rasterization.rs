// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use iced_core::{Point, Rectangle, Size};
use image_rs::{DynamicImage, Rgba, RgbaImage};
use retouch_lens::domain::editing::DevicePixelRatio;
use retouch_lens::media::{CropRasterizer, CropRequest, ImageBuffer};
use std::hint::black_box;

fn source(width: u32, height: u32) -> ImageBuffer {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    ImageBuffer::from_dynamic_png(&DynamicImage::ImageRgba8(image), "bench").unwrap()
}

fn crop_rasterization_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("crop_rasterization");
    let rasterizer = CropRasterizer::default();
    let image = source(2048, 1536);

    for density in [1.0_f32, 2.0, 3.0] {
        let request = CropRequest {
            selection: Rectangle::new(Point::new(100.0, 80.0), Size::new(400.0, 300.0)),
            rendered: Size::new(1024.0, 768.0),
            density: DevicePixelRatio::new(density),
        };
        group.bench_with_input(BenchmarkId::from_parameter(density), &request, |b, request| {
            b.iter(|| black_box(rasterizer.rasterize(&image, request).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, crop_rasterization_benchmark);
criterion_main!(benches);
