// terrain holds the diamond-square heightfield and its renderable mesh buffers
pub mod grid;
pub mod mesh;
pub mod utils;

pub use grid::HeightGrid;
pub use mesh::{Bounds, TerrainMesh};
pub use utils::{normalize3, normalize_heights, to_terrain_image};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TerrainError {
    // Index buffers are u32, so (2^n+1)^2 must stay below u32::MAX
    #[error("detail exponent must be in 1..=15, got {0}")]
    InvalidDetail(u32),

    #[error("degenerate bounds: x in [{min_x}, {max_x}], y in [{min_y}, {max_y}]")]
    DegenerateBounds {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    },

    #[error("grid index ({row}, {col}) out of range for a {size}x{size} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        size: usize,
    },
}
