//! Benchmarks for ephemeris lookups and the ephemeris force.
//!
//! The DE file is synthetic: same header layout and record size scheme as a
//! real file, with only a few records written.
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ephem_forces::{
    constants::G_AU_MSUN_DAY,
    forces::params::{Params, N_EPHEM},
    jpl_ephem::body_ids::Body,
    EphemerisForce, EphemerisResolver, ForceModel, Particle,
};

#[path = "../tests/common/mod.rs"]
mod common;
use common::SyntheticDe;

const BEG: f64 = 2450000.5;
const RECORDS: usize = 16;

fn bench_resolve(c: &mut Criterion) {
    let de = SyntheticDe::new(BEG, BEG + 32.0 * RECORDS as f64, 32.0);
    let file = de.write();
    let resolver = EphemerisResolver::new(&format!("file:{}", file.path().display())).unwrap();
    let mut rng = StdRng::seed_from_u64(0xDE430);

    c.bench_function("resolver/sun_barycentric", |b| {
        b.iter_batched(
            || {
                (0..1_000)
                    .map(|_| BEG + rng.random_range(0.0..32.0 * RECORDS as f64))
                    .collect::<Vec<_>>()
            },
            |epochs| {
                for jde in epochs {
                    let state = resolver.resolve(black_box(jde), Body::Sun, Body::Barycenter);
                    black_box(state.ok());
                }
            },
            BatchSize::LargeInput,
        )
    });

    // Moon relative to Earth needs three slot evaluations per side
    c.bench_function("resolver/moon_geocentric", |b| {
        b.iter(|| {
            let state = resolver.resolve(black_box(BEG + 100.25), Body::Moon, Body::Earth);
            black_box(state.ok());
        })
    });
}

fn bench_force(c: &mut Criterion) {
    let de = SyntheticDe::new(BEG, BEG + 32.0 * RECORDS as f64, 32.0);
    let file = de.write();
    let force = EphemerisForce::new(
        EphemerisResolver::new(&format!("file:{}", file.path().display())).unwrap(),
    )
    .with_time_origin(BEG);

    let mut params = Params::new();
    params.set_int(N_EPHEM, 5);

    let mut rng = StdRng::seed_from_u64(42);
    let particles: Vec<Particle> = (0..1_000)
        .map(|_| {
            Particle::new(
                Vector3::new(
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-0.5..0.5),
                ),
                Vector3::zeros(),
            )
        })
        .collect();

    c.bench_function("ephemeris_force/1000_particles_5_perturbers", |b| {
        b.iter_batched(
            || particles.clone(),
            |mut particles| {
                force
                    .apply(&params, &mut particles, black_box(64.0), G_AU_MSUN_DAY)
                    .unwrap();
                black_box(particles);
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_resolve, bench_force
);
criterion_main!(benches);
