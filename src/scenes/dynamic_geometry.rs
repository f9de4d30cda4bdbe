use anyhow::Result;
use glam::{Mat4, Vec2, Vec3, Vec4};
use log::{info, warn};

use super::{load_shader, load_textures, Scene, EMBEDDED_SHADER};
use crate::renderer_engine::{
    BatchConfig, Device, FrameStats, QuadBatch, QuadDescriptor, Renderer, Shader, TextureSlots,
};

/// Slot de texture du quad `k` (motif répété au-delà de 5 quads).
pub const SLOT_PATTERN: [u32; 5] = [0, 1, 2, 2, 1];

/// Quads déplaçables dessinés en un seul draw call, reconstruits à chaque frame.
pub struct DynamicGeometryScene {
    batch: QuadBatch,
    shader: Shader,
    textures: TextureSlots,

    projection: Mat4,
    view: Mat4,
    pub translation: Vec3,

    pub positions: Vec<Vec2>,
    quad_count: usize,
    edge: f32,
    color: Vec4,

    /// Descripteurs de la frame courante, réutilisés d'une frame à l'autre.
    descriptors: Vec<QuadDescriptor>,
    slot_clamp_reported: bool,
    last_stats: FrameStats,
}

impl DynamicGeometryScene {
    pub fn new(device: &mut dyn Device, config: &BatchConfig) -> Result<Self> {
        let mut shader = load_shader(device, &config.shader_path, EMBEDDED_SHADER)?;
        shader.bind(device);
        shader.set_uniform_1iv(device, "u_Textures", &TextureSlots::sampler_indices());

        let textures = match load_textures(device, &config.texture_paths) {
            Ok(textures) => textures,
            Err(e) => {
                shader.destroy(device);
                return Err(e);
            }
        };

        let batch = match QuadBatch::new(device, config.max_quads) {
            Ok(batch) => batch,
            Err(e) => {
                shader.destroy(device);
                textures.destroy(device);
                return Err(e.into());
            }
        };

        let positions = config.quad_positions();
        let quad_count = config.quad_count.min(positions.len());
        info!(
            "Dynamic geometry: {} positions, {} textures, {} quads shown",
            positions.len(),
            textures.len(),
            quad_count
        );

        Ok(Self {
            batch,
            shader,
            textures,
            projection: config.projection.matrix(),
            view: Mat4::IDENTITY,
            translation: Vec3::new(200.0, 200.0, 0.0),
            descriptors: Vec::with_capacity(positions.len()),
            positions,
            quad_count,
            edge: config.quad_edge,
            color: config.quad_color(),
            slot_clamp_reported: false,
            last_stats: FrameStats::default(),
        })
    }

    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    /// Nombre de quads affichés, borné par le nombre de positions.
    pub fn set_quad_count(&mut self, count: usize) {
        self.quad_count = count.min(self.positions.len());
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * Mat4::from_translation(self.translation)
    }

    /// Descripteurs de la frame : un par quad affiché.
    pub fn quad_descriptors(&mut self) -> &[QuadDescriptor] {
        self.refresh_descriptors();
        &self.descriptors
    }

    fn refresh_descriptors(&mut self) {
        let last_slot = (self.textures.len().max(1) - 1) as u32;
        let mut clamped = false;

        self.descriptors.clear();
        for (k, position) in self.positions.iter().take(self.quad_count).enumerate() {
            let wanted = SLOT_PATTERN[k % SLOT_PATTERN.len()];
            clamped |= wanted > last_slot;
            self.descriptors.push(QuadDescriptor::new(
                *position,
                self.edge,
                self.color,
                wanted.min(last_slot),
            ));
        }

        if clamped && !self.slot_clamp_reported {
            warn!(
                "Only {} textures loaded: higher texture slots fall back to slot {}",
                self.textures.len(),
                last_slot
            );
            self.slot_clamp_reported = true;
        }
    }
}

impl Scene for DynamicGeometryScene {
    fn name(&self) -> &'static str {
        "Batch Rendering - Dynamic Geometry"
    }

    fn on_render(&mut self, device: &mut dyn Device, renderer: &Renderer) -> Result<()> {
        self.refresh_descriptors();
        let mvp = self.mvp();
        self.last_stats = self.batch.render_frame(
            device,
            renderer,
            &mut self.shader,
            &self.textures,
            &self.descriptors,
            &mvp,
        )?;
        Ok(())
    }

    fn on_imgui_render(&mut self, ui: &imgui::Ui) {
        ui.slider("x_slider", 0.0, 960.0, &mut self.translation.x);
        ui.slider("y_slider", 0.0, 540.0, &mut self.translation.y);

        for (k, position) in self.positions.iter_mut().enumerate() {
            let mut xy = position.to_array();
            if imgui::Drag::new(format!("Quad {} Position", k + 1))
                .speed(0.5)
                .build_array(ui, &mut xy)
            {
                *position = Vec2::from(xy);
            }
        }

        let mut count = self.quad_count as i32;
        if ui.slider("Quad Count", 0, self.positions.len() as i32, &mut count) {
            self.set_quad_count(count.max(0) as usize);
        }

        let framerate = ui.io().framerate;
        ui.text(format!(
            "Application average {:.3} ms/frame ({:.1} FPS)",
            1000.0 / framerate.max(f32::EPSILON),
            framerate
        ));
        ui.text(format!(
            "Batch: {} quads, {} vertices, {} indices{}",
            self.last_stats.quads,
            self.last_stats.vertices,
            self.last_stats.indices,
            if self.last_stats.clamped { " (clamped)" } else { "" }
        ));
    }

    fn destroy(self: Box<Self>, device: &mut dyn Device) {
        let scene = *self;
        scene.batch.destroy(device);
        scene.shader.destroy(device);
        scene.textures.destroy(device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer_engine::{RecordingDevice, Texture, MAX_TEXTURE_SLOTS};
    use glam::vec2;

    fn config() -> BatchConfig {
        BatchConfig {
            texture_paths: Vec::new(),
            shader_path: "does/not/exist.shader".to_string(),
            ..BatchConfig::default()
        }
    }

    #[test]
    fn test_defaults_follow_configuration() {
        let mut device = RecordingDevice::new();
        let mut scene = DynamicGeometryScene::new(&mut device, &config()).unwrap();

        assert_eq!(scene.quad_count(), 2);
        let quads = scene.quad_descriptors();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].position, vec2(-50.0, -50.0));
        assert_eq!(quads[1].position, vec2(70.0, -50.0));
        assert_eq!(quads[0].color, Vec4::new(0.55, 0.12, 0.67, 1.0));
    }

    #[test]
    fn test_sampler_array_is_initialised() {
        let mut device = RecordingDevice::new();
        let scene = DynamicGeometryScene::new(&mut device, &config()).unwrap();
        assert_eq!(
            device.uniform(scene.shader.id(), "u_Textures"),
            Some(&crate::renderer_engine::UniformValue::IntArray(
                (0..MAX_TEXTURE_SLOTS as i32).collect()
            ))
        );
    }

    #[test]
    fn test_slots_follow_pattern_when_textures_are_available() {
        let mut device = RecordingDevice::new();
        let mut scene = DynamicGeometryScene::new(&mut device, &config()).unwrap();
        for _ in 0..2 {
            scene.textures.push(Texture::checkerboard(&mut device)).unwrap();
        }
        scene.set_quad_count(5);

        let slots: Vec<u32> = scene.quad_descriptors().iter().map(|q| q.texture_slot).collect();
        assert_eq!(slots, SLOT_PATTERN.to_vec());
    }

    #[test]
    fn test_slots_are_clamped_to_loaded_textures() {
        let mut device = RecordingDevice::new();
        let mut scene = DynamicGeometryScene::new(&mut device, &config()).unwrap();
        scene.set_quad_count(5);

        // Une seule texture (damier) : tout retombe sur le slot 0
        assert!(scene.quad_descriptors().iter().all(|q| q.texture_slot == 0));
    }

    #[test]
    fn test_quad_count_is_bounded_by_positions() {
        let mut device = RecordingDevice::new();
        let mut scene = DynamicGeometryScene::new(&mut device, &config()).unwrap();
        scene.set_quad_count(42);
        assert_eq!(scene.quad_count(), 5);
        scene.set_quad_count(0);
        assert!(scene.quad_descriptors().is_empty());
    }

    #[test]
    fn test_mvp_applies_translation() {
        let mut device = RecordingDevice::new();
        let mut scene = DynamicGeometryScene::new(&mut device, &config()).unwrap();
        scene.translation = Vec3::ZERO;
        let origin = scene.mvp() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.x + 1.0).abs() < 1e-5);

        scene.translation = Vec3::new(480.0, 270.0, 0.0);
        let center = scene.mvp() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(center.x.abs() < 1e-5 && center.y.abs() < 1e-5);
    }

    #[test]
    fn test_render_draws_visible_quads_once() {
        let mut device = RecordingDevice::new();
        let mut scene = DynamicGeometryScene::new(&mut device, &config()).unwrap();
        scene.set_quad_count(3);

        scene.on_render(&mut device, &Renderer::new()).unwrap();

        let draws = device.draw_calls();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].index_count, 18);
        assert_eq!(scene.last_stats().quads, 3);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut device = RecordingDevice::new();
        let scene = DynamicGeometryScene::new(&mut device, &config()).unwrap();
        let program = scene.shader.id();
        Box::new(scene).destroy(&mut device);

        assert!(!device.is_live_program(program));
        assert_eq!(device.live_texture_count(), 0);
    }
}
