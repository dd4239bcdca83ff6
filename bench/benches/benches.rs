use criterion::{Criterion, criterion_group, criterion_main};
use terrain::{
    Bounds, HeightGrid, TerrainMesh,
    utils::{normalize_heights, to_terrain_image},
};

const SEED: u64 = 2025;
const CORNERS: [f32; 4] = [0.5, 0.9, 0.1, 0.2];

fn bench_grid_generation(c: &mut Criterion) {
    for n in [7u32, 8, 9] {
        let size = (1usize << n) + 1;
        c.bench_function(&format!("HeightGrid::generate {size}x{size}"), |b| {
            b.iter(|| HeightGrid::generate(n, CORNERS, SEED, 1.0).unwrap())
        });
    }
}

fn bench_mesh_build(c: &mut Criterion) {
    let bounds = Bounds::new(-8.0, 8.0, -8.0, 8.0).unwrap();
    for n in [7u32, 8, 9] {
        let grid = HeightGrid::generate(n, CORNERS, SEED, 1.0).unwrap();
        let size = grid.size();
        c.bench_function(&format!("TerrainMesh::build {size}x{size}"), |b| {
            b.iter(|| TerrainMesh::build(&grid, bounds).unwrap())
        });
    }
}

fn bench_full_pipeline(c: &mut Criterion) {
    let bounds = Bounds::new(-8.0, 8.0, -8.0, 8.0).unwrap();
    c.bench_function("generate + normalize + image 257x257", |b| {
        b.iter(|| {
            let mesh = TerrainMesh::generate(8, bounds, CORNERS, SEED, 1.0).unwrap();
            let mut heights: Vec<f32> =
                mesh.positions().chunks_exact(3).map(|p| p[2]).collect();
            normalize_heights(&mut heights);
            let _img = to_terrain_image(&heights);
        })
    });
}

criterion_group!(
    terrain_benchmarks,
    bench_grid_generation,
    bench_mesh_build,
    bench_full_pipeline
);
criterion_main!(terrain_benchmarks);
