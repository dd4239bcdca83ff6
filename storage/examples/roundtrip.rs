use storage::MeshStorage;
use storage::models::{GenParams, TerrainMeshDoc};
use terrain::{Bounds, TerrainMesh};

#[tokio::main]
async fn main() -> mongodb::error::Result<()> {
    // Generate a 257x257 heightfield mesh
    let exponent = 8;
    let bounds = Bounds::new(-4.0, 4.0, -4.0, 4.0).unwrap();
    let corners = [0.5, 0.9, 0.1, 0.2];
    let mesh = TerrainMesh::generate(exponent, bounds, corners, 2025, 1.0).unwrap();
    let size = mesh.grid_size() as usize;

    // Only the heights go into the document
    let heights: Vec<f32> = mesh.positions().chunks_exact(3).map(|p| p[2]).collect();

    let doc = TerrainMeshDoc {
        id: None,
        name: "demo".to_string(),
        seed: 2025,
        params: GenParams {
            exponent,
            roughness: 1.0,
            corners,
            min_x: bounds.min_x,
            max_x: bounds.max_x,
            min_y: bounds.min_y,
            max_y: bounds.max_y,
        },
        height_map: heights,
        grid_size: size as u32,
    };

    let storage = MeshStorage::init("mongodb://localhost:27017", "terrain_db", "meshes").await?;

    // Insert & read back
    storage.create(doc).await?;
    if let Some(found) = storage.read_by_seed(2025).await? {
        println!(
            "Round-trip success: sample [128,128] = {}",
            found.height_map[128 * size + 128]
        );
    } else {
        println!("Document not found!");
    }

    // Clean up
    storage.delete_by_seed(2025).await?;

    Ok(())
}
