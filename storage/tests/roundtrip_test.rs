use storage::MeshStorage;
use storage::models::{GenParams, TerrainMeshDoc};
use terrain::{Bounds, TerrainMesh};
use tokio::runtime::Builder;

#[test]
#[ignore = "requires a running MongoDB at localhost:27017"]
fn test_roundtrip_mesh() {
    // Build a single-threaded Tokio runtime
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build Tokio runtime");

    rt.block_on(async {
        // Generate a small mesh
        let exponent = 6; // 65x65
        let bounds = Bounds::new(-1.0, 1.0, -1.0, 1.0).unwrap();
        let corners = [0.5, 0.9, 0.1, 0.2];
        let mesh = TerrainMesh::generate(exponent, bounds, corners, 42, 1.0).unwrap();
        let size = mesh.grid_size() as usize;
        let heights: Vec<f32> = mesh.positions().chunks_exact(3).map(|p| p[2]).collect();

        let doc = TerrainMeshDoc {
            id: None,
            name: "roundtrip".to_string(),
            seed: 42,
            params: GenParams {
                exponent,
                roughness: 1.0,
                corners,
                min_x: bounds.min_x,
                max_x: bounds.max_x,
                min_y: bounds.min_y,
                max_y: bounds.max_y,
            },
            height_map: heights.clone(),
            grid_size: size as u32,
        };

        let storage = MeshStorage::init("mongodb://localhost:27017", "terrain_db", "meshes")
            .await
            .expect("storage init failed");

        // Insert, read back, assert
        storage.create(doc).await.expect("create failed");
        let found = storage
            .read_by_seed(42)
            .await
            .expect("read failed")
            .expect("doc not found");

        assert_eq!(found.grid_size as usize, size);
        assert_eq!(found.height_map.len(), size * size);
        assert_eq!(found.height_map[size * size / 2], heights[size * size / 2]);
        assert_eq!(found.params.corners, corners);

        // Clean up
        storage.delete_by_seed(42).await.expect("delete failed");
    });
}
