use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use keyboard_api::services::thumbnail::{decode_image, to_bitmap};
use std::io::Cursor;

/// Gradient cover the size of Spotify's largest album art variant.
fn cover(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

fn benchmark_thumbnails(c: &mut Criterion) {
    let square = cover(640, 640);

    let mut jpeg = Cursor::new(Vec::new());
    square
        .write_to(&mut jpeg, image::ImageFormat::Jpeg)
        .expect("Failed to encode JPEG fixture");
    let jpeg = jpeg.into_inner();

    let mut group = c.benchmark_group("thumbnail");

    group.bench_function("square_to_max_size", |b| {
        b.iter(|| to_bitmap(black_box(&square), 320, 320))
    });

    group.bench_function("square_to_wide_strip", |b| {
        b.iter(|| to_bitmap(black_box(&square), 100, 50))
    });

    group.bench_function("decode_jpeg_then_render", |b| {
        b.iter(|| {
            let img = decode_image(black_box(&jpeg)).expect("fixture decodes");
            to_bitmap(&img, 120, 120)
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_thumbnails);
criterion_main!(benches);
