use batch_renderer::renderer_engine::{
    parse_shader, FrameStats, QuadBatch, QuadDescriptor, RecordingDevice, Renderer, Shader,
    Texture, TextureSlots, Vertex,
};
use glam::{vec2, Mat4, Vec4};
use std::path::PathBuf;

#[allow(unused)]
pub const TEST_SHADER: &str =
    "#shader vertex\n#version 330 core\nvoid main() {}\n#shader fragment\n#version 330 core\nvoid main() {}\n";

#[allow(unused)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Chemin d'un fichier sous `assets/`.
#[allow(unused)]
pub fn asset(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(relative)
}

/// `n` quads d'arête `edge` alignés sur l'axe x, espacés de `step`.
#[allow(unused)]
pub fn quad_row(n: usize, edge: f32, step: f32) -> Vec<QuadDescriptor> {
    (0..n)
        .map(|k| QuadDescriptor::new(vec2(k as f32 * step, 0.0), edge, Vec4::ONE, 0))
        .collect()
}

/// Relit un buffer de sommets enregistré par le device.
#[allow(unused)]
pub fn decode_vertices(bytes: &[u8]) -> Vec<Vertex> {
    bytes
        .chunks_exact(std::mem::size_of::<Vertex>())
        .map(bytemuck::pod_read_unaligned::<Vertex>)
        .collect()
}

/// Batch complet branché sur un `RecordingDevice`.
#[allow(unused)]
pub struct BatchHarness {
    pub device: RecordingDevice,
    pub renderer: Renderer,
    pub batch: QuadBatch,
    pub shader: Shader,
    pub textures: TextureSlots,
}

#[allow(unused)]
impl BatchHarness {
    pub fn new(max_quads: usize, texture_count: usize) -> Self {
        init_logger();
        let mut device = RecordingDevice::new();
        let batch = QuadBatch::new(&mut device, max_quads).expect("batch allocation");
        let shader =
            Shader::from_source(&mut device, "test", &parse_shader(TEST_SHADER)).expect("shader");
        let mut textures = TextureSlots::new();
        for _ in 0..texture_count {
            textures
                .push(Texture::checkerboard(&mut device))
                .expect("texture slot");
        }
        device.clear_calls();
        Self {
            device,
            renderer: Renderer::new(),
            batch,
            shader,
            textures,
        }
    }

    pub fn render(&mut self, quads: &[QuadDescriptor]) -> FrameStats {
        self.batch
            .render_frame(
                &mut self.device,
                &self.renderer,
                &mut self.shader,
                &self.textures,
                quads,
                &Mat4::IDENTITY,
            )
            .expect("render_frame")
    }
}
