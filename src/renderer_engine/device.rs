use gl::types::GLenum;

/// Catégorie de buffer GPU (détermine le point de binding OpenGL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// `GL_ARRAY_BUFFER` : données de sommets.
    Vertex,
    /// `GL_ELEMENT_ARRAY_BUFFER` : indices.
    Index,
}

impl BufferTarget {
    pub fn gl_enum(self) -> GLenum {
        match self {
            BufferTarget::Vertex => gl::ARRAY_BUFFER,
            BufferTarget::Index => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Fréquence de mise à jour annoncée au driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Écrit une fois, lu souvent (`GL_STATIC_DRAW`).
    Static,
    /// Réécrit partiellement à chaque frame (`GL_DYNAMIC_DRAW`).
    Dynamic,
}

impl BufferUsage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            BufferUsage::Static => gl::STATIC_DRAW,
            BufferUsage::Dynamic => gl::DYNAMIC_DRAW,
        }
    }
}

/// Type scalaire d'un attribut de sommet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribType {
    F32,
    U32,
    U8,
}

impl AttribType {
    pub fn size_in_bytes(self) -> u32 {
        match self {
            AttribType::F32 => 4,
            AttribType::U32 => 4,
            AttribType::U8 => 1,
        }
    }

    pub fn gl_enum(self) -> GLenum {
        match self {
            AttribType::F32 => gl::FLOAT,
            AttribType::U32 => gl::UNSIGNED_INT,
            AttribType::U8 => gl::UNSIGNED_BYTE,
        }
    }
}

/// Description complète d'un `glVertexAttribPointer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribPointer {
    pub index: u32,
    pub count: u32,
    pub ty: AttribType,
    pub normalized: bool,
    pub stride: u32,
    pub offset: u32,
}

/// Contexte GPU explicite.
///
/// Tout l'état global d'OpenGL (buffer lié, programme actif, texture par unité)
/// transite par cette interface : un composant qui a besoin qu'un objet soit lié
/// le lie lui-même via `&mut D`, ce qui rend les dépendances d'ordre d'appel
/// visibles dans les signatures.
///
/// Les appels ne retournent pas d'erreur : comme en OpenGL, les erreurs sont
/// déposées dans un état interrogé par [`Device::poll_error`] (voir `gl_call!`).
///
/// Implémentations :
/// - [`GlDevice`](super::gl_device::GlDevice) : vrai contexte OpenGL 3.3+.
/// - `RecordingDevice` : double de test en mémoire (feature `test_helpers`).
pub trait Device {
    /// Dépile la prochaine erreur en attente (`glGetError`), `None` si aucune.
    fn poll_error(&mut self) -> Option<GLenum>;

    // --- Buffers ---
    fn create_buffer(&mut self) -> u32;
    /// `id == 0` délie le point de binding.
    fn bind_buffer(&mut self, target: BufferTarget, id: u32);
    /// (Ré)alloue le buffer actuellement lié sur `target`.
    fn buffer_data(
        &mut self,
        target: BufferTarget,
        size_in_bytes: usize,
        data: Option<&[u8]>,
        usage: BufferUsage,
    );
    /// Réécrit une plage du buffer lié sans réallocation.
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]);
    fn delete_buffer(&mut self, id: u32);

    // --- Vertex arrays ---
    fn create_vertex_array(&mut self) -> u32;
    fn bind_vertex_array(&mut self, id: u32);
    fn enable_vertex_attrib(&mut self, index: u32);
    fn vertex_attrib_pointer(&mut self, attrib: &AttribPointer);
    fn delete_vertex_array(&mut self, id: u32);

    // --- Textures ---
    fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> u32;
    fn bind_texture_unit(&mut self, slot: u32, texture: u32);
    fn delete_texture(&mut self, id: u32);

    // --- Programmes ---
    fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<u32, String>;
    fn use_program(&mut self, id: u32);
    fn delete_program(&mut self, id: u32);
    /// `-1` si l'uniform n'existe pas (ou a été éliminé par le compilateur GLSL).
    fn uniform_location(&mut self, program: u32, name: &str) -> i32;
    fn uniform_1i(&mut self, location: i32, value: i32);
    fn uniform_1iv(&mut self, location: i32, values: &[i32]);
    fn uniform_4f(&mut self, location: i32, value: [f32; 4]);
    fn uniform_mat4(&mut self, location: i32, value: &[f32; 16]);

    // --- Dessin ---
    /// `glViewport` ; largeur ou hauteur négative : `GL_INVALID_VALUE`.
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&mut self, rgba: [f32; 4]);
    fn clear(&mut self);
    /// `glDrawElements(GL_TRIANGLES, index_count, GL_UNSIGNED_INT, 0)`.
    fn draw_indexed_triangles(&mut self, index_count: usize);
}
