use image::{GrayImage, Luma, RgbImage};
use terrain::{HeightGrid, normalize_heights, to_terrain_image};

// Dump a 257x257 diamond-square height map as a grayscale PNG and a
// color-ramp PNG, and print the top-left 8x8 corner for a quick look.
fn main() {
    let n = 8; // 2^8 + 1 = 257
    let grid = HeightGrid::generate(n, [0.5, 0.9, 0.1, 0.2], 2025, 1.0)
        .expect("grid generation failed");
    let size = grid.size();

    let mut heights = grid.heights().to_vec();
    normalize_heights(&mut heights);

    let mut gray = GrayImage::new(size as u32, size as u32);
    for row in 0..size {
        for col in 0..size {
            let v = (heights[row * size + col] * 255.0) as u8;
            gray.put_pixel(col as u32, row as u32, Luma([v]));
        }
    }
    gray.save("heightmap_gray.png").unwrap();

    let rgb = to_terrain_image(&heights);
    let img = RgbImage::from_raw(size as u32, size as u32, rgb).expect("buffer size mismatch");
    img.save("heightmap_color.png").unwrap();

    for row in 0..8 {
        for col in 0..8 {
            print!("{:>6.3} ", grid.height(row, col).unwrap());
        }
        println!();
    }
    println!("Saved heightmap_gray.png and heightmap_color.png");
}
