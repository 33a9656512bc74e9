//! Benchmarks for the advancing-front map.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use afmap::algo::parameterize::{advancing_front, AdvancingFrontOptions, TargetDomain};
use afmap::prelude::*;

fn create_grid_disk(n: usize) -> HalfEdgeMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_grid_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("advancing_front_grid");
    group.sample_size(10);

    // Release benches skip the per-move exact re-checks
    let options = AdvancingFrontOptions::default().with_extra_checks(false);
    for n in [4, 8, 16] {
        let mesh = create_grid_disk(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &mesh, |b, mesh| {
            b.iter(|| advancing_front(mesh, &options).unwrap());
        });
    }
    group.finish();
}

fn bench_domains(c: &mut Criterion) {
    let mesh = create_grid_disk(8);
    let mut group = c.benchmark_group("advancing_front_domain");
    group.sample_size(10);

    for domain in [TargetDomain::Circle, TargetDomain::Square, TargetDomain::Star] {
        let options = AdvancingFrontOptions::default()
            .with_domain(domain)
            .with_extra_checks(false);
        group.bench_function(domain.name(), |b| {
            b.iter(|| advancing_front(&mesh, &options).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_grid_sizes, bench_domains);
criterion_main!(benches);
