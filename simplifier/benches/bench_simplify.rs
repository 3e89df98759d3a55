use common::TriMesh;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simplifier::{MeshSimplifier, Placement, SimplifyConfig};

fn simplify_grid(mesh: &TriMesh, placement: Placement) -> usize {
    let mut simplifier =
        MeshSimplifier::from_tri_mesh(mesh, SimplifyConfig { placement }).unwrap();

    simplifier.run(mesh.face_count() / 4);

    simplifier.face_count()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let small = TriMesh::grid(8);
    let large = TriMesh::grid(24);

    c.bench_function("simplify grid 8", |b| {
        b.iter(|| simplify_grid(black_box(&small), Placement::Midpoint))
    });
    c.bench_function("simplify grid 24", |b| {
        b.iter(|| simplify_grid(black_box(&large), Placement::Midpoint))
    });
    c.bench_function("simplify grid 24 optimal", |b| {
        b.iter(|| simplify_grid(black_box(&large), Placement::Optimal))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
