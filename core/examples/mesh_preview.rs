use image::{Rgb, RgbImage};
use palette::{Gradient, LinSrgb};
use std::path::Path;
use terrain::utils::lambert;
use terrain::{Bounds, TerrainMesh, normalize3, normalize_heights};

// Render a generated mesh to a PNG, lit with the mesh's own accumulated
// per-vertex normals instead of finite differences over the height map.
fn main() {
    let n = 9; // 513x513 vertices
    let bounds = Bounds::new(-8.0, 8.0, -8.0, 8.0).expect("valid bounds");
    let mesh = TerrainMesh::generate(n, bounds, [0.5, 0.9, 0.1, 0.2], 2025, 1.0)
        .expect("mesh generation failed");
    let size = mesh.grid_size() as usize;

    // The buffers keep raw normal sums; normalize a copy for lighting
    let mut normals = mesh.normals().to_vec();
    normalize3(&mut normals);

    // Heights to [0, 1] for coloring
    let mut heights: Vec<f32> = mesh
        .positions()
        .chunks_exact(3)
        .map(|p| p[2])
        .collect();
    normalize_heights(&mut heights);

    // Color gradient - deep water to beach to grass to rock to snow
    let gradient = Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.0, 0.0, 0.5)), // deep blue
        (0.30, LinSrgb::new(0.8, 0.8, 0.5)), // sand
        (0.50, LinSrgb::new(0.1, 0.6, 0.2)), // green
        (0.75, LinSrgb::new(0.5, 0.4, 0.3)), // rock
        (1.00, LinSrgb::new(1.0, 1.0, 1.0)), // snow
    ]);

    // Light from the north-west, 45 degrees up
    let inv_sqrt3 = 1.0 / 3.0f32.sqrt();
    let light = [-inv_sqrt3, -inv_sqrt3, inv_sqrt3];

    let mut img = RgbImage::new(size as u32, size as u32);
    for row in 0..size {
        for col in 0..size {
            let k = 3 * (row * size + col);
            let normal = [normals[k], normals[k + 1], normals[k + 2]];
            let shade = lambert(normal, light) * 0.5 + 0.5;

            let col_rgb: LinSrgb = gradient.get(heights[row * size + col]);
            let rgb = col_rgb.into_format::<u8>();
            let pixel = Rgb([
                (rgb.red as f32 * shade) as u8,
                (rgb.green as f32 * shade) as u8,
                (rgb.blue as f32 * shade) as u8,
            ]);
            img.put_pixel(col as u32, row as u32, pixel);
        }
    }

    let path = Path::new("mesh_preview.png");
    img.save(path).unwrap();
    println!("Saved shaded mesh preview to {:?}", path);
}
