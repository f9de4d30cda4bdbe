use anyhow::Result;
use glam::{Mat4, Vec3, Vec4};
use log::info;

use super::{load_shader, load_textures, Scene, EMBEDDED_COLOR_SHADER, EMBEDDED_SHADER};
use crate::renderer_engine::{
    generate_indices, make_quad, BatchConfig, Device, IndexBuffer, Renderer, Shader, TextureSlots,
    VertexArray, VertexBuffer, VertexBufferLayout, Vertex,
};

/// Couleur uniforme de la variante `Colors`.
pub const STATIC_QUAD_COLOR: [f32; 4] = [0.65, 0.08, 0.58, 1.0];

/// Deux quads côte à côte, positions seules (`x y`).
pub const COLOR_QUAD_POSITIONS: [[f32; 2]; 8] = [
    [-50.0, -50.0],
    [50.0, -50.0],
    [50.0, 50.0],
    [-50.0, 50.0],
    [70.0, -50.0],
    [170.0, -50.0],
    [170.0, 50.0],
    [70.0, 50.0],
];

const TEXTURED_QUAD_XS: [f32; 3] = [-50.0, 70.0, 190.0];
const TEXTURED_QUAD_COLORS: [[f32; 4]; 3] = [
    [0.18, 0.95, 0.55, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [0.18, 0.95, 0.55, 1.0],
];

/// Géométrie de la scène statique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticVariant {
    /// Sommets position seule, couleur passée en uniform.
    Colors,
    /// Sommets complets, une texture par quad.
    Textures,
}

impl StaticVariant {
    pub fn label(self) -> &'static str {
        match self {
            StaticVariant::Colors => "Batch Rendering - Colors",
            StaticVariant::Textures => "Batch Rendering - Textures",
        }
    }
}

/// Quads envoyés une seule fois au GPU, redessinés à chaque frame en un draw call.
pub struct StaticBatchScene {
    variant: StaticVariant,
    vao: VertexArray,
    vbo: VertexBuffer,
    ibo: IndexBuffer,
    shader: Shader,
    textures: TextureSlots,

    projection: Mat4,
    pub translation: Vec3,
}

impl StaticBatchScene {
    pub fn new(device: &mut dyn Device, config: &BatchConfig, variant: StaticVariant) -> Result<Self> {
        let (shader, textures) = match variant {
            StaticVariant::Colors => {
                let mut shader =
                    load_shader(device, &config.color_shader_path, EMBEDDED_COLOR_SHADER)?;
                shader.bind(device);
                shader.set_uniform_4f(device, "u_Color", STATIC_QUAD_COLOR);
                (shader, TextureSlots::new())
            }
            StaticVariant::Textures => {
                let mut shader = load_shader(device, &config.shader_path, EMBEDDED_SHADER)?;
                shader.bind(device);
                shader.set_uniform_1iv(device, "u_Textures", &TextureSlots::sampler_indices());
                match load_textures(device, &config.texture_paths) {
                    Ok(textures) => (shader, textures),
                    Err(e) => {
                        shader.destroy(device);
                        return Err(e);
                    }
                }
            }
        };

        let vao = VertexArray::new(device);
        let uploaded = match variant {
            StaticVariant::Colors => {
                let mut layout = VertexBufferLayout::new();
                layout.push::<f32>(2);
                VertexBuffer::from_vertices(device, &COLOR_QUAD_POSITIONS).map(|vbo| (vbo, layout, 2))
            }
            StaticVariant::Textures => {
                let vertices = textured_quads(textures.len());
                VertexBuffer::from_vertices(device, &vertices)
                    .map(|vbo| (vbo, Vertex::layout(), TEXTURED_QUAD_XS.len()))
            }
        };
        let (vbo, layout, quad_count) = match uploaded {
            Ok(uploaded) => uploaded,
            Err(e) => {
                vao.destroy(device);
                shader.destroy(device);
                textures.destroy(device);
                return Err(e.into());
            }
        };
        vao.add_buffer(device, &vbo, &layout);

        let ibo = match IndexBuffer::from_indices(device, &generate_indices(quad_count)) {
            Ok(ibo) => ibo,
            Err(e) => {
                vao.destroy(device);
                vbo.destroy(device);
                shader.destroy(device);
                textures.destroy(device);
                return Err(e.into());
            }
        };

        info!(
            "{}: {} quads uploaded once, {} textures",
            variant.label(),
            quad_count,
            textures.len()
        );

        Ok(Self {
            variant,
            vao,
            vbo,
            ibo,
            shader,
            textures,
            projection: config.projection.matrix(),
            translation: Vec3::new(200.0, 200.0, 0.0),
        })
    }

    pub fn mvp(&self) -> Mat4 {
        self.projection * Mat4::from_translation(self.translation)
    }
}

/// Trois quads texturés ; le slot du quad `k` est borné aux textures chargées.
fn textured_quads(texture_count: usize) -> Vec<Vertex> {
    let last_slot = (texture_count.max(1) - 1) as u32;
    TEXTURED_QUAD_XS
        .iter()
        .zip(TEXTURED_QUAD_COLORS)
        .enumerate()
        .flat_map(|(k, (&x, color))| {
            make_quad(x, -50.0, 100.0, Vec4::from(color), (k as u32).min(last_slot))
        })
        .collect()
}

impl Scene for StaticBatchScene {
    fn name(&self) -> &'static str {
        self.variant.label()
    }

    fn on_render(&mut self, device: &mut dyn Device, renderer: &Renderer) -> Result<()> {
        self.textures.bind_all(device);
        self.shader.bind(device);
        let mvp = self.mvp();
        self.shader.set_uniform_mat4(device, "u_MVP", &mvp);
        renderer.draw(device, &self.vao, &self.ibo, &self.shader, self.ibo.count());
        Ok(())
    }

    fn on_imgui_render(&mut self, ui: &imgui::Ui) {
        ui.slider("x_slider", 0.0, 960.0, &mut self.translation.x);
        ui.slider("y_slider", 0.0, 540.0, &mut self.translation.y);

        let framerate = ui.io().framerate;
        ui.text(format!(
            "Application average {:.3} ms/frame ({:.1} FPS)",
            1000.0 / framerate.max(f32::EPSILON),
            framerate
        ));
    }

    fn destroy(self: Box<Self>, device: &mut dyn Device) {
        let scene = *self;
        scene.vao.destroy(device);
        scene.vbo.destroy(device);
        scene.ibo.destroy(device);
        scene.shader.destroy(device);
        scene.textures.destroy(device);
    }
}
