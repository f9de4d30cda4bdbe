use anyhow::Result;
use glam::Mat4;
use log::{debug, info, warn};
use std::fmt;

use super::buffer::{BufferError, IndexBuffer, VertexBuffer};
use super::device::Device;
use super::indices::{batch_capacity, CapacityError};
use super::renderer::Renderer;
use super::scratch::FrameScratch;
use super::shader::Shader;
use super::texture::TextureSlots;
use super::types::{QuadDescriptor, Vertex};
use super::vertex_array::VertexArray;

/// Fréquence (en frames) du dump des statistiques du batch.
const STATS_LOG_INTERVAL: u64 = 300;

/// Bilan d'une frame du batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub quads: usize,
    pub vertices: usize,
    pub indices: usize,
    /// Des quads ont été ignorés faute de place.
    pub clamped: bool,
}

/// Échec de création d'un batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchError {
    /// `max_quads` n'est pas adressable par des indices `u32`.
    Capacity(CapacityError),
    Buffer(BufferError),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Capacity(e) => write!(f, "invalid batch size: {}", e),
            BatchError::Buffer(e) => write!(f, "batch allocation failed: {}", e),
        }
    }
}

impl std::error::Error for BatchError {}

impl From<CapacityError> for BatchError {
    fn from(e: CapacityError) -> Self {
        BatchError::Capacity(e)
    }
}

impl From<BufferError> for BatchError {
    fn from(e: BufferError) -> Self {
        BatchError::Buffer(e)
    }
}

/// Batch de quads : un vertex buffer et un index buffer dynamiques partagés,
/// réécrits intégralement à chaque frame puis dessinés en un seul draw call.
#[derive(Debug)]
pub struct QuadBatch {
    vao: VertexArray,
    vbo: VertexBuffer,
    ibo: IndexBuffer,
    scratch: FrameScratch,
    frame_index: u64,
    was_clamped: bool,
}

impl QuadBatch {
    /// Alloue les buffers pour `max_quads` quads (4 sommets, 6 indices chacun).
    ///
    /// La capacité est validée avant tout appel au device.
    pub fn new<D: Device + ?Sized>(device: &mut D, max_quads: usize) -> Result<Self, BatchError> {
        let (max_vertices, max_indices) = batch_capacity(max_quads)?;

        let vao = VertexArray::new(device);
        let vbo = match VertexBuffer::dynamic::<Vertex, _>(device, max_vertices) {
            Ok(vbo) => vbo,
            Err(e) => {
                vao.destroy(device);
                return Err(e.into());
            }
        };
        vao.add_buffer(device, &vbo, &Vertex::layout());
        let ibo = match IndexBuffer::dynamic(device, max_indices) {
            Ok(ibo) => ibo,
            Err(e) => {
                vao.destroy(device);
                vbo.destroy(device);
                return Err(e.into());
            }
        };

        info!(
            "🧱 Quad batch ready: {} quads ({} vertices / {} indices)",
            max_quads,
            vbo.capacity(),
            ibo.capacity()
        );

        Ok(Self {
            vao,
            vbo,
            ibo,
            scratch: FrameScratch::with_capacity(max_quads),
            frame_index: 0,
            was_clamped: false,
        })
    }

    pub fn max_quads(&self) -> usize {
        self.scratch.max_quads()
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vbo
    }

    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.ibo
    }

    /// Synthétise, envoie et dessine `quads` en un seul draw call.
    ///
    /// Au-delà de `max_quads`, seuls les premiers quads sont dessinés (warning à
    /// l'entrée dans cet état). Aucun draw call n'est émis pour zéro quad.
    pub fn render_frame<D: Device + ?Sized>(
        &mut self,
        device: &mut D,
        renderer: &Renderer,
        shader: &mut Shader,
        textures: &TextureSlots,
        quads: &[QuadDescriptor],
        mvp: &Mat4,
    ) -> Result<FrameStats> {
        self.frame_index += 1;

        let max_quads = self.max_quads();
        let clamped = quads.len() > max_quads;
        if clamped && !self.was_clamped {
            warn!(
                "⚠️ {} quads requested but the batch holds {}: extra quads are dropped",
                quads.len(),
                max_quads
            );
        }
        self.was_clamped = clamped;
        let quads = &quads[..quads.len().min(max_quads)];

        self.scratch.fill(quads)?;
        let stats = FrameStats {
            quads: self.scratch.quad_count(),
            vertices: self.scratch.vertices().len(),
            indices: self.scratch.indices().len(),
            clamped,
        };

        if self.frame_index % STATS_LOG_INTERVAL == 0 {
            debug!("Batch frame #{}: {:?}", self.frame_index, stats);
        }

        if stats.quads == 0 {
            return Ok(stats);
        }

        self.vbo.update(device, self.scratch.vertices())?;
        self.ibo.update(device, self.scratch.indices())?;

        textures.bind_all(device);
        shader.bind(device);
        shader.set_uniform_mat4(device, "u_MVP", mvp);

        renderer.draw(device, &self.vao, &self.ibo, shader, stats.indices);
        Ok(stats)
    }

    pub fn destroy<D: Device + ?Sized>(self, device: &mut D) {
        self.vao.destroy(device);
        self.vbo.destroy(device);
        self.ibo.destroy(device);
    }
}
