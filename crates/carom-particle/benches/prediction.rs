use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use carom_particle::{NDIMS, Particle, Restitution, predict_pair};

/// A deterministic cloud of approaching particle pairs.
fn pairs(count: usize) -> Vec<(Particle, Particle)> {
    (0..count)
        .map(|n| {
            let spread = 1.0 + 0.01 * n as f64;
            let mut pos0 = [0.0; NDIMS];
            let mut pos1 = [0.0; NDIMS];
            let mut vel0 = [0.0; NDIMS];
            let mut vel1 = [0.0; NDIMS];
            pos1[0] = 10.0 * spread;
            pos1[1] = 0.5;
            vel0[0] = spread;
            vel1[0] = -spread;
            let particle = |position, velocity| Particle {
                density: 1.0,
                radius: 1.0,
                position,
                velocity,
                time: 0.0,
            };
            (particle(pos0, vel0), particle(pos1, vel1))
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let pairs = pairs(256);
    let restitution = Restitution::default();
    c.bench_function("predict_pair", |b| {
        b.iter(|| {
            for (p0, p1) in &pairs {
                let _ = predict_pair(black_box(p0), black_box(p1), 1e6, restitution);
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
