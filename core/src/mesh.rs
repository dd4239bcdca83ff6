use crate::TerrainError;
use crate::grid::HeightGrid;

// Rectangular world-space extent the lattice is stretched over.
// Column maps to x and row maps to y:
//   x = min_x + (max_x - min_x) * col / 2^n
//   y = min_y + (max_y - min_y) * row / 2^n
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Result<Self, TerrainError> {
        let b = Self {
            min_x,
            max_x,
            min_y,
            max_y,
        };
        b.validate()?;
        Ok(b)
    }

    // min must be strictly below max on both axes (NaN fails too)
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(self.min_x < self.max_x) || !(self.min_y < self.max_y) {
            return Err(TerrainError::DegenerateBounds {
                min_x: self.min_x,
                max_x: self.max_x,
                min_y: self.min_y,
                max_y: self.max_y,
            });
        }
        Ok(())
    }
}

// Triangle mesh over a heightfield, ready for upload to a renderer.
// All buffers are flat, row-major indexed, and never change after build:
//  - positions: (x, y, height) triples, 3 * size^2 floats
//  - normals: accumulated face normals per vertex, NOT unit length
//  - faces: triangle index triples, two per grid cell
//  - edges: index pairs for wireframe drawing, 3 per triangle, duplicates kept
pub struct TerrainMesh {
    size: usize,
    bounds: Bounds,
    positions: Vec<f32>,
    normals: Vec<f32>,
    faces: Vec<u32>,
    edges: Vec<u32>,
}

impl TerrainMesh {
    // One-shot construction: run diamond-square, then build all buffers.
    pub fn generate(
        n: u32,
        bounds: Bounds,
        corners: [f32; 4],
        seed: u64,
        roughness: f32,
    ) -> Result<Self, TerrainError> {
        bounds.validate()?;
        let grid = HeightGrid::generate(n, corners, seed, roughness)?;
        Self::build(&grid, bounds)
    }

    pub fn build(grid: &HeightGrid, bounds: Bounds) -> Result<Self, TerrainError> {
        bounds.validate()?;
        let size = grid.size();
        let cells = size - 1;
        let dx = (bounds.max_x - bounds.min_x) / cells as f32;
        let dy = (bounds.max_y - bounds.min_y) / cells as f32;

        let mut positions = Vec::with_capacity(3 * size * size);
        for row in 0..size {
            for col in 0..size {
                positions.push(bounds.min_x + dx * col as f32);
                positions.push(bounds.min_y + dy * row as f32);
                positions.push(grid.heights()[row * size + col]);
            }
        }

        // Each cell splits along the same diagonal into two triangles; every
        // face normal is summed into the normals of its three vertices.
        let mut normals = vec![0.0f32; 3 * size * size];
        let mut faces = Vec::with_capacity(6 * cells * cells);
        for i in 0..cells {
            for j in 0..cells {
                let v = (i * size + j) as u32;
                let s = size as u32;

                let (a, b, c) = (v, v + 1, v + s);
                faces.extend_from_slice(&[a, b, c]);
                accumulate_face_normal(&positions, &mut normals, a, b, c);

                let (a, b, c) = (v + 1, v + s + 1, v + s);
                faces.extend_from_slice(&[a, b, c]);
                accumulate_face_normal(&positions, &mut normals, a, b, c);
            }
        }

        // One index pair per triangle edge; edges shared between triangles
        // show up twice, which the wireframe pass does not mind.
        let mut edges = Vec::with_capacity(2 * faces.len());
        for tri in faces.chunks_exact(3) {
            edges.extend_from_slice(&[tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]]);
        }

        Ok(Self {
            size,
            bounds,
            positions,
            normals,
            faces,
            edges,
        })
    }

    // Side length of the vertex lattice, 2^n + 1
    pub fn grid_size(&self) -> u32 {
        self.size as u32
    }

    pub fn vertex_count(&self) -> usize {
        self.size * self.size
    }

    pub fn face_count(&self) -> usize {
        self.faces.len() / 3
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn triangle_indices(&self) -> &[u32] {
        &self.faces
    }

    pub fn edge_indices(&self) -> &[u32] {
        &self.edges
    }

    pub fn position_at(&self, row: usize, col: usize) -> Result<[f32; 3], TerrainError> {
        if row >= self.size || col >= self.size {
            return Err(TerrainError::OutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        let k = 3 * (row * self.size + col);
        Ok([
            self.positions[k],
            self.positions[k + 1],
            self.positions[k + 2],
        ])
    }

    pub fn height_at(&self, row: usize, col: usize) -> Result<f32, TerrainError> {
        Ok(self.position_at(row, col)?[2])
    }
}

// Face normal from the fixed winding: cross(b - a, c - a), which points +z
// for an upward-facing heightfield. A zero-area triangle contributes a zero
// vector, which simply leaves the accumulated sums unchanged.
fn accumulate_face_normal(positions: &[f32], normals: &mut [f32], a: u32, b: u32, c: u32) {
    let at = |idx: u32| {
        let k = 3 * idx as usize;
        [positions[k], positions[k + 1], positions[k + 2]]
    };
    let (pa, pb, pc) = (at(a), at(b), at(c));
    let e1 = [pb[0] - pa[0], pb[1] - pa[1], pb[2] - pa[2]];
    let e2 = [pc[0] - pa[0], pc[1] - pa[1], pc[2] - pa[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    for &idx in &[a, b, c] {
        let k = 3 * idx as usize;
        normals[k] += n[0];
        normals[k + 1] += n[1];
        normals[k + 2] += n[2];
    }
}

#[cfg(test)]
mod tests {
    use super::{Bounds, TerrainMesh};
    use crate::TerrainError;
    use crate::grid::HeightGrid;

    fn bounds() -> Bounds {
        Bounds::new(-1.0, 1.0, -1.0, 1.0).unwrap()
    }

    #[test]
    fn mesh_buffer_counts() {
        for n in 1..=4u32 {
            let m = TerrainMesh::generate(n, bounds(), [0.5; 4], 11, 1.0).unwrap();
            let size = (1usize << n) + 1;
            let cells = size - 1;
            assert_eq!(m.grid_size() as usize, size);
            assert_eq!(m.vertex_count(), size * size);
            assert_eq!(m.positions().len(), 3 * size * size);
            assert_eq!(m.normals().len(), 3 * size * size);
            assert_eq!(m.face_count(), 2 * cells * cells);
            assert_eq!(m.triangle_indices().len(), 3 * m.face_count());
            assert_eq!(m.edge_indices().len(), 6 * m.face_count());
        }
    }

    #[test]
    fn mesh_first_cell_triangulation() {
        let m = TerrainMesh::generate(2, bounds(), [0.5; 4], 11, 1.0).unwrap();
        let s = m.grid_size();
        assert_eq!(&m.triangle_indices()[..6], &[0, 1, s, 1, s + 1, s]);
        // Edge pairs of the first triangle
        assert_eq!(&m.edge_indices()[..6], &[0, 1, 1, s, s, 0]);
    }

    #[test]
    fn mesh_indices_in_range() {
        let m = TerrainMesh::generate(3, bounds(), [0.5; 4], 11, 1.0).unwrap();
        let count = m.vertex_count() as u32;
        assert!(m.triangle_indices().iter().all(|&i| i < count));
        assert!(m.edge_indices().iter().all(|&i| i < count));
    }

    #[test]
    fn mesh_height_matches_position() {
        let grid = HeightGrid::generate(3, [0.5, 0.9, 0.1, 0.2], 2025, 1.0).unwrap();
        let m = TerrainMesh::build(&grid, bounds()).unwrap();
        for row in 0..grid.size() {
            for col in 0..grid.size() {
                let h = m.height_at(row, col).unwrap();
                assert_eq!(h, m.position_at(row, col).unwrap()[2]);
                assert_eq!(h, grid.height(row, col).unwrap());
            }
        }
    }

    #[test]
    fn mesh_world_mapping() {
        let b = Bounds::new(0.0, 4.0, 10.0, 18.0).unwrap();
        let m = TerrainMesh::generate(2, b, [0.5; 4], 11, 1.0).unwrap();
        // col drives x, row drives y, linearly across the bounds
        assert_eq!(&m.position_at(0, 0).unwrap()[..2], &[0.0, 10.0]);
        assert_eq!(&m.position_at(0, 4).unwrap()[..2], &[4.0, 10.0]);
        assert_eq!(&m.position_at(4, 0).unwrap()[..2], &[0.0, 18.0]);
        assert_eq!(&m.position_at(2, 1).unwrap()[..2], &[1.0, 14.0]);
    }

    #[test]
    fn mesh_flat_grid_normals_point_up() {
        // Equal corners and no perturbation give a flat grid: every face
        // normal is (0, 0, dx*dy), so a vertex's z equals dx*dy times the
        // number of incident triangles (1 or 2 at corners, 3 on edges,
        // 6 in the interior).
        let b = Bounds::new(0.0, 2.0, 0.0, 4.0).unwrap();
        let m = TerrainMesh::generate(2, b, [3.0; 4], 5, 0.0).unwrap();
        let size = m.grid_size() as usize;
        let dxdy = (2.0 / 4.0) * (4.0 / 4.0);
        let eps = 1e-5;
        for row in 0..size {
            for col in 0..size {
                let k = 3 * (row * size + col);
                let n = &m.normals()[k..k + 3];
                assert!(n[0].abs() < eps && n[1].abs() < eps);
                let on_row_edge = row == 0 || row == size - 1;
                let on_col_edge = col == 0 || col == size - 1;
                let incident = match (on_row_edge, on_col_edge) {
                    (true, true) => {
                        // one triangle touches (0,0) and (max,max), two touch
                        // the corners on the split diagonal
                        if (row == 0) == (col == 0) { 1.0 } else { 2.0 }
                    }
                    (false, false) => 6.0,
                    _ => 3.0,
                };
                assert!((n[2] - incident * dxdy).abs() < eps, "({row},{col})");
            }
        }
    }

    #[test]
    fn mesh_normals_match_reaccumulation() {
        // No contribution may be lost or double-counted: re-accumulating from
        // the emitted triangle list must reproduce the stored buffer exactly.
        let m = TerrainMesh::generate(3, bounds(), [0.5, 0.9, 0.1, 0.2], 77, 1.0).unwrap();
        let mut expect = vec![0.0f32; m.normals().len()];
        for tri in m.triangle_indices().chunks_exact(3) {
            super::accumulate_face_normal(m.positions(), &mut expect, tri[0], tri[1], tri[2]);
        }
        assert_eq!(m.normals(), &expect[..]);
    }

    #[test]
    fn mesh_determinism() {
        let a = TerrainMesh::generate(4, bounds(), [0.5, 0.9, 0.1, 0.2], 2025, 1.0).unwrap();
        let b = TerrainMesh::generate(4, bounds(), [0.5, 0.9, 0.1, 0.2], 2025, 1.0).unwrap();
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.normals(), b.normals());
        assert_eq!(a.triangle_indices(), b.triangle_indices());
    }

    #[test]
    fn mesh_rejects_degenerate_bounds() {
        assert!(matches!(
            Bounds::new(1.0, 1.0, 0.0, 2.0),
            Err(TerrainError::DegenerateBounds { .. })
        ));
        assert!(Bounds::new(2.0, 1.0, 0.0, 2.0).is_err());
        assert!(Bounds::new(0.0, 1.0, 3.0, 2.0).is_err());
        assert!(Bounds::new(f32::NAN, 1.0, 0.0, 2.0).is_err());
    }

    #[test]
    fn mesh_query_out_of_range() {
        let m = TerrainMesh::generate(1, bounds(), [0.5; 4], 11, 1.0).unwrap();
        assert!(m.position_at(2, 2).is_ok());
        assert!(matches!(
            m.position_at(3, 0),
            Err(TerrainError::OutOfRange { .. })
        ));
        assert!(m.height_at(0, 3).is_err());
    }
}
