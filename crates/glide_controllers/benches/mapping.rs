use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glide_controllers::{compute_thumb_geometry, thumb_position_to_offset, AxisDimensions};

fn bench_forward(c: &mut Criterion) {
    let dims = AxisDimensions::new(1234.5, 0.0, 50_000.0, 720.0).unwrap();
    c.bench_function("thumb_geometry", |b| {
        b.iter(|| compute_thumb_geometry(black_box(&dims), black_box(640.0), 40.0, false))
    });
}

fn bench_inverse(c: &mut Criterion) {
    let dims = AxisDimensions::new(0.0, -200.0, 50_000.0, 720.0).unwrap();
    c.bench_function("thumb_position_to_offset_mirrored", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for step in 0..100 {
                acc += thumb_position_to_offset(
                    black_box(step as f64 * 6.0),
                    &dims,
                    640.0,
                    40.0,
                    true,
                );
            }
            acc
        })
    });
}

criterion_group!(benches, bench_forward, bench_inverse);
criterion_main!(benches);
