use crate::TerrainError;

// Square lattice of side 2^n + 1 filled by the diamond-square algorithm.
// Heights are stored in a flat row-major buffer, index row * size + col.
#[derive(Debug)]
pub struct HeightGrid {
    size: usize, // 2^n + 1
    heights: Vec<f32>,
}

impl HeightGrid {
    // corners seed (0,0), (0,2^n), (2^n,0), (2^n,2^n) in that order; no later
    // pass ever touches them again.
    // roughness scales the random perturbation, so 0.0 leaves pure neighbor
    // averages (handy for deterministic checks).
    pub fn generate(
        n: u32,
        corners: [f32; 4],
        seed: u64,
        roughness: f32,
    ) -> Result<Self, TerrainError> {
        if !(1..=15).contains(&n) {
            return Err(TerrainError::InvalidDetail(n));
        }
        let max = 1usize << n; // cells per side
        let size = max + 1;
        let mut heights = vec![0.0f32; size * size];

        // Simple xorshift RNG mapped to [0, 1), reproducible from the seed
        let mut x = seed ^ 0xCAFEBABE12345678;
        let mut rand01 = move || {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x >> 11) as f64 / (1u64 << 53) as f64
        };

        heights[0] = corners[0];
        heights[max] = corners[1];
        heights[max * size] = corners[2];
        heights[max * size + max] = corners[3];

        // Step is the current distance between two known points
        let mut d = max;
        for i in 0..n {
            let half = d / 2;
            // Perturbation amplitude halves each pass
            let amp = roughness / (1u64 << (i + 1)) as f32;

            // Diamond step: cell centers, both coordinates odd multiples of half
            for row in (half..size).step_by(d) {
                for col in (half..size).step_by(d) {
                    let avg = (heights[(row - half) * size + (col - half)]
                        + heights[(row - half) * size + (col + half)]
                        + heights[(row + half) * size + (col - half)]
                        + heights[(row + half) * size + (col + half)])
                        / 4.0;
                    heights[row * size + col] = avg + (0.5 - rand01()) as f32 * amp;
                }
            }

            // Square step: edge midpoints, exactly one coordinate an odd
            // multiple of half. Points on the grid border average only the
            // 2 or 3 neighbors that exist.
            for row in (0..size).step_by(half) {
                let start = if row % d == 0 { half } else { 0 };
                for col in (start..size).step_by(d) {
                    let mut sum = 0.0f32;
                    let mut cnt = 0u32;
                    if row >= half {
                        sum += heights[(row - half) * size + col];
                        cnt += 1;
                    }
                    if row + half < size {
                        sum += heights[(row + half) * size + col];
                        cnt += 1;
                    }
                    if col >= half {
                        sum += heights[row * size + (col - half)];
                        cnt += 1;
                    }
                    if col + half < size {
                        sum += heights[row * size + (col + half)];
                        cnt += 1;
                    }
                    heights[row * size + col] = sum / cnt as f32 + (0.5 - rand01()) as f32 * amp;
                }
            }

            d = half;
        }

        Ok(Self { size, heights })
    }

    // Side length of the lattice, 2^n + 1
    pub fn size(&self) -> usize {
        self.size
    }

    // Flat row-major height buffer, length size * size
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn height(&self, row: usize, col: usize) -> Result<f32, TerrainError> {
        if row >= self.size || col >= self.size {
            return Err(TerrainError::OutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        Ok(self.heights[row * self.size + col])
    }
}
