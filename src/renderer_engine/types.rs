use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use super::layout::VertexBufferLayout;

/// Sommet envoyé au GPU par le batch de quads.
///
/// # Layout mémoire GPU
///
/// | Location | Type    | Champ        | Offset |
/// |:--------:|:--------|:-------------|-------:|
/// | `0`      | `vec2`  | `position`   | 0      |
/// | `1`      | `vec4`  | `color`      | 8      |
/// | `2`      | `vec2`  | `tex_coords` | 24     |
/// | `3`      | `float` | `tex_index`  | 32     |
///
/// **Stride total** : `9 × f32 = 36 octets`
#[repr(C)] // garantit un layout C-compatible pour l'envoi GPU
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    /// RGBA, composantes dans [0, 1].
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
    /// Indice dans le tableau de samplers `u_Textures` du fragment shader.
    pub tex_index: f32,
}

impl Vertex {
    /// Layout correspondant exactement aux champs de `Vertex`.
    pub fn layout() -> VertexBufferLayout {
        let mut layout = VertexBufferLayout::new();
        layout
            .push::<f32>(2) // x y
            .push::<f32>(4) // r g b a
            .push::<f32>(2) // u v
            .push::<f32>(1); // tex index
        layout
    }
}

/// Description d'un quad pour la frame courante.
///
/// Fournie par l'appelant (UI de debug) à chaque frame, consommée immédiatement
/// par le synthétiseur, jamais conservée.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadDescriptor {
    /// Coin bas-gauche.
    pub position: Vec2,
    pub edge: f32,
    pub color: Vec4,
    pub texture_slot: u32,
}

impl QuadDescriptor {
    pub fn new(position: Vec2, edge: f32, color: Vec4, texture_slot: u32) -> Self {
        Self {
            position,
            edge,
            color,
            texture_slot,
        }
    }
}
