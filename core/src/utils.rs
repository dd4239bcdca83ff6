const GAMMA_CORRECTION: f32 = 1.2;
const WATER_THRESHOLD: f32 = 0.3;
const SAND_THRESHOLD: f32 = 0.4;
const GRASS_THRESHOLD: f32 = 0.6;
const ROCK_THRESHOLD: f32 = 0.8;

// Normalize a flat vec3 buffer (normals) in place. The mesh hands out raw
// accumulated face-normal sums, so consumers call this before any lighting
// math. Zero-length vectors stay zero instead of turning into NaN.
pub fn normalize3(buf: &mut [f32]) {
    for v in buf.chunks_exact_mut(3) {
        let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if len > 1e-12 {
            v[0] /= len;
            v[1] /= len;
            v[2] /= len;
        }
    }
}

// Rescale a flat height buffer into [0, 1] for coloring
pub fn normalize_heights(heights: &mut [f32]) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for &v in heights.iter() {
        min = min.min(v);
        max = max.max(v);
    }

    let range = (max - min).max(0.001); // prevent zero-division
    for v in heights.iter_mut() {
        *v = (*v - min) / range;
        // Gamma curve for contrast boost
        *v = v.powf(GAMMA_CORRECTION);
    }
}

// Linearly interpolate between two RGB triples
fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t) as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t) as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t) as u8,
    ]
}

// Map a height in [0.0, 1.0] to a terrain color
pub fn height_to_rgb(h: f32) -> [u8; 3] {
    match h {
        x if x < WATER_THRESHOLD => {
            let t = x / WATER_THRESHOLD;
            lerp_color([0, 0, 128], [0, 128, 255], t) // deep to shallow water
        }
        x if x < SAND_THRESHOLD => {
            let t = (x - WATER_THRESHOLD) / (SAND_THRESHOLD - WATER_THRESHOLD);
            lerp_color([194, 178, 128], [220, 200, 160], t) // sand
        }
        x if x < GRASS_THRESHOLD => {
            let t = (x - SAND_THRESHOLD) / (GRASS_THRESHOLD - SAND_THRESHOLD);
            lerp_color([34, 139, 34], [50, 205, 50], t) // grass
        }
        x if x < ROCK_THRESHOLD => {
            let t = (x - GRASS_THRESHOLD) / (ROCK_THRESHOLD - GRASS_THRESHOLD);
            lerp_color([128, 128, 128], [192, 192, 192], t) // rock
        }
        x => {
            let t = (x - ROCK_THRESHOLD) / (1.0 - ROCK_THRESHOLD);
            lerp_color([220, 220, 220], [255, 255, 255], t) // snow
        }
    }
}

// Convert a flat height buffer in [0, 1] into an RGB byte buffer
pub fn to_terrain_image(heights: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(heights.len() * 3);
    for &h in heights {
        let [r, g, b] = height_to_rgb(h);
        buf.extend_from_slice(&[r, g, b]);
    }
    buf
}

// Lambertian factor for a unit normal and unit light direction, in [0, 1]
pub fn lambert(normal: [f32; 3], light: [f32; 3]) -> f32 {
    (normal[0] * light[0] + normal[1] * light[1] + normal[2] * light[2]).clamp(0.0, 1.0)
}
