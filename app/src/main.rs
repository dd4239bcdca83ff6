use std::time::Instant;

use eframe::{App, Frame, NativeOptions, egui, run_native};
use egui::{ColorImage, TextureHandle};
use storage::MeshStorage;
use storage::models::{GenParams, TerrainMeshDoc};
use terrain::utils::{height_to_rgb, lambert};
use terrain::{Bounds, TerrainMesh, normalize3, normalize_heights, to_terrain_image};

const DB_URI: &str = "mongodb://localhost:27017";
const DB_NAME: &str = "terrain_db";
const DB_COLLECTION: &str = "meshes";

// Wireframe overlay gets unreadable (and slow) past this exponent
const WIREFRAME_MAX_EXP: u32 = 5;

struct TerrainApp {
    // generation parameters; grid side is 2^exp + 1
    exp: u32,
    seed: u64,
    roughness: f32,
    corners: [f32; 4],
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,

    show_wireframe: bool,

    // generated mesh + preview texture
    mesh: Option<TerrainMesh>,
    terrain_texture: Option<TextureHandle>,
    last_rgb: Option<Vec<u8>>,
    last_size: usize,

    // timing & status
    last_duration: Option<f32>,
    status_message: String,
}

impl Default for TerrainApp {
    fn default() -> Self {
        Self {
            exp: 7, // 2^7 + 1 = 129
            seed: 2025,
            roughness: 1.0,
            corners: [0.5, 0.9, 0.1, 0.2],
            min_x: -8.0,
            max_x: 8.0,
            min_y: -8.0,
            max_y: 8.0,
            show_wireframe: false,
            mesh: None,
            terrain_texture: None,
            last_rgb: None,
            last_size: 0,
            last_duration: None,
            status_message: String::new(),
        }
    }
}

// Shade the mesh into an RGB buffer: terrain color ramp over normalized
// heights, lit with the mesh's accumulated normal buffer.
fn shade_mesh(mesh: &TerrainMesh) -> Vec<u8> {
    let size = mesh.grid_size() as usize;

    let mut normals = mesh.normals().to_vec();
    normalize3(&mut normals);

    let mut heights: Vec<f32> = mesh.positions().chunks_exact(3).map(|p| p[2]).collect();
    normalize_heights(&mut heights);

    let inv_sqrt3 = 1.0 / 3.0f32.sqrt();
    let light = [-inv_sqrt3, -inv_sqrt3, inv_sqrt3];

    let mut rgb = Vec::with_capacity(3 * size * size);
    for idx in 0..size * size {
        let k = 3 * idx;
        let normal = [normals[k], normals[k + 1], normals[k + 2]];
        let shade = lambert(normal, light) * 0.5 + 0.5;
        let [r, g, b] = height_to_rgb(heights[idx]);
        rgb.extend_from_slice(&[
            (r as f32 * shade) as u8,
            (g as f32 * shade) as u8,
            (b as f32 * shade) as u8,
        ]);
    }
    rgb
}

// Color a stored height map without regenerating the mesh
fn heightmap_to_rgb(height_map: &[f32]) -> Vec<u8> {
    let mut heights = height_map.to_vec();
    normalize_heights(&mut heights);
    to_terrain_image(&heights)
}

impl TerrainApp {
    fn params(&self) -> GenParams {
        GenParams {
            exponent: self.exp,
            roughness: self.roughness,
            corners: self.corners,
            min_x: self.min_x,
            max_x: self.max_x,
            min_y: self.min_y,
            max_y: self.max_y,
        }
    }

    fn generate(&mut self, ctx: &egui::Context) {
        let bounds = match Bounds::new(self.min_x, self.max_x, self.min_y, self.max_y) {
            Ok(b) => b,
            Err(e) => {
                self.status_message = format!("Bad bounds: {e}");
                return;
            }
        };

        let start = Instant::now();
        match TerrainMesh::generate(self.exp, bounds, self.corners, self.seed, self.roughness) {
            Ok(mesh) => {
                let size = mesh.grid_size() as usize;
                let rgb = shade_mesh(&mesh);
                let color_image = ColorImage::from_rgb([size, size], &rgb);
                self.terrain_texture =
                    Some(ctx.load_texture("terrain", color_image, egui::TextureOptions::NEAREST));
                self.last_rgb = Some(rgb);
                self.last_size = size;
                self.mesh = Some(mesh);
                self.last_duration = Some(start.elapsed().as_secs_f32() * 1000.0);
                self.status_message = format!(
                    "Generated in {:.2} ms (seed {})",
                    self.last_duration.unwrap(),
                    self.seed
                );
            }
            Err(e) => {
                self.status_message = format!("Generation failed: {e}");
            }
        }
        ctx.request_repaint();
    }

    fn save_to_db(&mut self) {
        let Some(mesh) = &self.mesh else {
            self.status_message = "Nothing to save yet".into();
            return;
        };
        let heights: Vec<f32> = mesh.positions().chunks_exact(3).map(|p| p[2]).collect();
        let doc = TerrainMeshDoc {
            id: None,
            name: format!("terrain_{}", self.seed),
            seed: self.seed as i64,
            params: self.params(),
            height_map: heights,
            grid_size: mesh.grid_size(),
        };

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        match rt.block_on(MeshStorage::init(DB_URI, DB_NAME, DB_COLLECTION)) {
            Ok(storage) => {
                let res = rt.block_on(storage.create(doc));
                self.status_message = match res {
                    Ok(()) => "Saved to MongoDB".into(),
                    Err(e) => format!("DB error: {e}"),
                };
            }
            Err(e) => {
                self.status_message = format!("DB init error: {e}");
            }
        }
    }

    fn load_from_db(&mut self, ctx: &egui::Context) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        match rt.block_on(MeshStorage::init(DB_URI, DB_NAME, DB_COLLECTION)) {
            Ok(storage) => match rt.block_on(storage.read_by_seed(self.seed as i64)) {
                Ok(Some(doc)) if doc.height_map.len() != (doc.grid_size as usize).pow(2) => {
                    self.status_message =
                        format!("Corrupt document '{}': height map size mismatch", doc.name);
                }
                Ok(Some(doc)) => {
                    let size = doc.grid_size as usize;
                    // Restore the parameters so Generate reproduces the same
                    // mesh, but display straight from the stored heights.
                    let p = doc.params;
                    self.exp = p.exponent;
                    self.roughness = p.roughness;
                    self.corners = p.corners;
                    self.min_x = p.min_x;
                    self.max_x = p.max_x;
                    self.min_y = p.min_y;
                    self.max_y = p.max_y;

                    let rgb = heightmap_to_rgb(&doc.height_map);
                    let color_image = ColorImage::from_rgb([size, size], &rgb);
                    self.terrain_texture = Some(ctx.load_texture(
                        "terrain",
                        color_image,
                        egui::TextureOptions::NEAREST,
                    ));
                    self.last_rgb = Some(rgb);
                    self.last_size = size;
                    // No mesh buffers until the next Generate
                    self.mesh = None;
                    self.show_wireframe = false;
                    self.status_message = format!("Loaded '{}' from MongoDB", doc.name);
                }
                Ok(None) => {
                    self.status_message = "No entry for this seed".into();
                }
                Err(e) => {
                    self.status_message = format!("DB error: {e}");
                }
            },
            Err(e) => {
                self.status_message = format!("DB init error: {e}");
            }
        }
        ctx.request_repaint();
    }

    // Project world (x, y) into the displayed image rectangle
    fn draw_wireframe(&self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(mesh) = &self.mesh else { return };
        let b = mesh.bounds();
        let scale_x = rect.width() / (b.max_x - b.min_x);
        let scale_y = rect.height() / (b.max_y - b.min_y);

        let positions = mesh.positions();
        let to_screen = |idx: u32| {
            let k = 3 * idx as usize;
            egui::pos2(
                rect.left() + (positions[k] - b.min_x) * scale_x,
                rect.top() + (positions[k + 1] - b.min_y) * scale_y,
            )
        };

        let stroke = egui::Stroke::new(0.5, egui::Color32::from_black_alpha(160));
        let painter = ui.painter_at(rect);
        for pair in mesh.edge_indices().chunks_exact(2) {
            painter.line_segment([to_screen(pair[0]), to_screen(pair[1])], stroke);
        }
    }
}

impl App for TerrainApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let size = (1usize << self.exp) + 1;

        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Heightfield Viewer");
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Resolution 2^n+1:");
                ui.add(
                    egui::Slider::new(&mut self.exp, 1..=9)
                        .text(format!("{}×{}", size, size))
                        .step_by(1.0),
                );
            });

            ui.label("Seed");
            ui.add(egui::DragValue::new(&mut self.seed).speed(1.0));

            ui.label("Roughness");
            ui.add(egui::Slider::new(&mut self.roughness, 0.0..=5.0));

            ui.label("Corner seeds");
            ui.horizontal(|ui| {
                for c in &mut self.corners {
                    ui.add(egui::DragValue::new(c).speed(0.05));
                }
            });

            ui.label("Bounds (min/max X, min/max Y)");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut self.min_x).speed(0.1));
                ui.add(egui::DragValue::new(&mut self.max_x).speed(0.1));
            });
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut self.min_y).speed(0.1));
                ui.add(egui::DragValue::new(&mut self.max_y).speed(0.1));
            });

            if self.exp <= WIREFRAME_MAX_EXP {
                ui.checkbox(&mut self.show_wireframe, "Show wireframe");
            } else {
                ui.add_enabled(
                    false,
                    egui::Checkbox::new(&mut self.show_wireframe, "Show wireframe"),
                );
                ui.label(format!("Wireframe needs n ≤ {}", WIREFRAME_MAX_EXP));
            }

            ui.separator();

            if ui.button("Generate Terrain").clicked() {
                self.generate(ctx);
            }

            if ui.button("Save PNG…").clicked() {
                if let Some(rgb) = &self.last_rgb {
                    let picked = rfd::FileDialog::new()
                        .set_file_name(format!("terrain_{}.png", self.seed))
                        .save_file();
                    if let Some(path) = picked {
                        let res = image::save_buffer(
                            &path,
                            rgb,
                            self.last_size as u32,
                            self.last_size as u32,
                            image::ColorType::Rgb8,
                        );
                        self.status_message = match res {
                            Ok(()) => format!("Saved {}", path.display()),
                            Err(e) => format!("PNG error: {e}"),
                        };
                    }
                } else {
                    self.status_message = "Nothing to save yet".into();
                }
            }

            if ui.button("Save to DB…").clicked() {
                self.save_to_db();
            }

            if ui.button("Load from DB…").clicked() {
                self.load_from_db(ctx);
            }

            ui.separator();
            ui.label(&self.status_message);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tex) = &self.terrain_texture {
                let available = ui.available_size();
                let side = available.x.min(available.y);
                let response = ui.image((tex.id(), egui::vec2(side, side)));
                if self.show_wireframe && self.exp <= WIREFRAME_MAX_EXP {
                    self.draw_wireframe(ui, response.rect);
                }
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Generate Terrain” to start");
                });
            }
        });
    }
}


fn main() {
    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    run_native(
        "Fractal Heightfield Viewer",
        opts,
        Box::new(|_cc| Ok(Box::new(TerrainApp::default()))),
    )
    .unwrap();
}
