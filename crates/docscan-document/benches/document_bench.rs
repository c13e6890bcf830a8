// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the docscan-document scanning stages: outline
// detection at working resolution and adaptive binarization of a page.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma, Rgb, RgbImage};

use docscan_core::ScanConfig;
use docscan_document::scan::{Binarizer, EdgeExtractor, QuadDetector};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Edge extraction plus quadrilateral detection on a working-height image.
///
/// A light page on a dark background, already at the default working height,
/// so the benchmark measures blur, Canny, dilation, contour tracing and
/// polygon simplification.
fn bench_edges_and_detect(c: &mut Criterion) {
    let config = ScanConfig::default();
    let mut img = RgbImage::from_pixel(360, 500, Rgb([40, 40, 40]));
    for y in 40..460 {
        for x in 50..310 {
            img.put_pixel(x, y, Rgb([235, 235, 235]));
        }
    }
    let extractor = EdgeExtractor::new(&config);
    let detector = QuadDetector::new(&config);

    c.bench_function("edges_and_detect (360x500)", |b| {
        b.iter(|| {
            let edges = extractor.edges_of(black_box(&img));
            black_box(detector.detect(&edges));
        });
    });
}

/// Gaussian local-threshold binarization of a 1240x1754 page (A4 at 150 dpi).
fn bench_binarize(c: &mut Criterion) {
    let page = GrayImage::from_fn(1240, 1754, |x, y| {
        if y % 40 < 3 && x % 9 < 6 {
            Luma([40u8])
        } else {
            Luma([(200 + (x / 20) % 30) as u8])
        }
    });
    let binarizer = Binarizer::new(&ScanConfig::default());

    let mut group = c.benchmark_group("binarize");
    group.sample_size(10);
    group.bench_function("gaussian (1240x1754)", |b| {
        b.iter(|| black_box(binarizer.binarize(black_box(&page))));
    });
    group.finish();
}

criterion_group!(benches, bench_edges_and_detect, bench_binarize);
criterion_main!(benches);
