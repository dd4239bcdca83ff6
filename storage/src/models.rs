use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

// Everything needed to regenerate a heightfield mesh from scratch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenParams {
    pub exponent: u32, // grid side is 2^exponent + 1
    pub roughness: f32,
    pub corners: [f32; 4],
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TerrainMeshDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub name: String,
    pub seed: i64,
    pub params: GenParams,
    // Flattened row-major heights: length = grid_size * grid_size.
    // Positions/normals/indices are cheap to rebuild, so only heights persist.
    pub height_map: Vec<f32>,
    pub grid_size: u32,
}
