//! Device en mémoire, sans contexte OpenGL.
//!
//! Reproduit le sous-ensemble de la sémantique OpenGL utilisé par le batch :
//! contenu des buffers, bindings courants, unités de texture, uniforms, draw calls.
//! Les usages invalides lèvent les mêmes codes d'erreur que le driver
//! (`GL_INVALID_VALUE`, `GL_INVALID_OPERATION`), consultables via `poll_error`.
use gl::types::GLenum;
use std::collections::{HashMap, HashSet, VecDeque};

use super::device::{AttribPointer, BufferTarget, BufferUsage, Device};

/// Journal des appels reçus par le device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateBuffer(u32),
    BindBuffer(BufferTarget, u32),
    BufferData {
        target: BufferTarget,
        size_in_bytes: usize,
        seeded: bool,
        usage: BufferUsage,
    },
    BufferSubData {
        target: BufferTarget,
        offset: usize,
        len: usize,
    },
    DeleteBuffer(u32),
    CreateVertexArray(u32),
    BindVertexArray(u32),
    EnableVertexAttrib(u32),
    VertexAttribPointer(AttribPointer),
    DeleteVertexArray(u32),
    CreateTexture { id: u32, width: u32, height: u32 },
    BindTextureUnit { slot: u32, texture: u32 },
    DeleteTexture(u32),
    CreateProgram(u32),
    UseProgram(u32),
    DeleteProgram(u32),
    Uniform { location: i32, value: UniformValue },
    Viewport([i32; 4]),
    ClearColor([f32; 4]),
    Clear,
    DrawIndexed(DrawCall),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    IntArray(Vec<i32>),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

/// État capturé au moment d'un `draw_indexed_triangles`.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub index_count: usize,
    pub program: u32,
    pub vertex_array: u32,
    pub index_buffer: u32,
    /// Les `index_count` premiers indices lus dans le buffer d'indices lié.
    pub indices: Vec<u32>,
    /// Unités de texture actives (slot, texture) triées par slot.
    pub texture_units: Vec<(u32, u32)>,
}

#[derive(Debug, Default)]
struct RecordedBuffer {
    data: Vec<u8>,
    usage: Option<BufferUsage>,
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    next_id: u32,
    calls: Vec<DeviceCall>,

    buffers: HashMap<u32, RecordedBuffer>,
    bound_buffers: HashMap<BufferTarget, u32>,

    vertex_arrays: HashMap<u32, Vec<AttribPointer>>,
    enabled_attribs: HashMap<u32, Vec<u32>>,
    bound_vertex_array: u32,

    textures: HashMap<u32, (u32, u32)>,
    texture_units: HashMap<u32, u32>,

    programs: HashSet<u32>,
    bound_program: u32,
    uniform_locations: HashMap<(u32, String), i32>,
    uniforms: HashMap<(u32, i32), UniformValue>,
    missing_uniforms: Vec<String>,
    failing_program: Option<String>,

    viewport: [i32; 4],
    clear_color: [f32; 4],
    pending_errors: VecDeque<GLenum>,
    raised_errors: Vec<GLenum>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dépose une erreur comme si le driver l'avait levée.
    pub fn inject_error(&mut self, code: GLenum) {
        self.raise(code);
    }

    /// Le prochain `create_program` échouera avec ce message.
    pub fn fail_next_program(&mut self, message: impl Into<String>) {
        self.failing_program = Some(message.into());
    }

    /// L'uniform `name` sera introuvable (`location == -1`) dans tous les programmes.
    pub fn hide_uniform(&mut self, name: impl Into<String>) {
        self.missing_uniforms.push(name.into());
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Toutes les erreurs levées depuis la création (consommées ou non).
    pub fn raised_errors(&self) -> &[GLenum] {
        &self.raised_errors
    }

    pub fn count_calls(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn draw_calls(&self) -> Vec<&DrawCall> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::DrawIndexed(draw) => Some(draw),
                _ => None,
            })
            .collect()
    }

    pub fn buffer_contents(&self, id: u32) -> Option<&[u8]> {
        self.buffers.get(&id).map(|b| b.data.as_slice())
    }

    pub fn buffer_usage(&self, id: u32) -> Option<BufferUsage> {
        self.buffers.get(&id).and_then(|b| b.usage)
    }

    pub fn is_live_buffer(&self, id: u32) -> bool {
        self.buffers.contains_key(&id)
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> u32 {
        self.bound_buffers.get(&target).copied().unwrap_or(0)
    }

    pub fn bound_vertex_array(&self) -> u32 {
        self.bound_vertex_array
    }

    pub fn vertex_array_attribs(&self, id: u32) -> Option<&[AttribPointer]> {
        self.vertex_arrays.get(&id).map(|a| a.as_slice())
    }

    pub fn enabled_attribs(&self, id: u32) -> Option<&[u32]> {
        self.enabled_attribs.get(&id).map(|a| a.as_slice())
    }

    pub fn is_live_program(&self, id: u32) -> bool {
        self.programs.contains(&id)
    }

    pub fn texture_size(&self, id: u32) -> Option<(u32, u32)> {
        self.textures.get(&id).copied()
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn bound_texture(&self, slot: u32) -> u32 {
        self.texture_units.get(&slot).copied().unwrap_or(0)
    }

    /// `[x, y, width, height]` du dernier viewport accepté.
    pub fn viewport(&self) -> [i32; 4] {
        self.viewport
    }

    pub fn current_clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Valeur d'un uniform par nom, telle que positionnée sur `program`.
    pub fn uniform(&self, program: u32, name: &str) -> Option<&UniformValue> {
        let location = self
            .uniform_locations
            .get(&(program, name.to_string()))
            .copied()?;
        self.uniforms.get(&(program, location))
    }

    fn raise(&mut self, code: GLenum) {
        self.pending_errors.push_back(code);
        self.raised_errors.push(code);
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn set_uniform(&mut self, location: i32, value: UniformValue) {
        self.calls.push(DeviceCall::Uniform {
            location,
            value: value.clone(),
        });
        // Comme OpenGL : location -1 ignorée silencieusement
        if location == -1 {
            return;
        }
        if self.bound_program == 0 {
            self.raise(gl::INVALID_OPERATION);
            return;
        }
        self.uniforms.insert((self.bound_program, location), value);
    }

    fn read_indices(&self, index_count: usize) -> Option<Vec<u32>> {
        let ibo = self.bound_buffer(BufferTarget::Index);
        let data = &self.buffers.get(&ibo)?.data;
        let needed = index_count.checked_mul(std::mem::size_of::<u32>())?;
        if needed > data.len() {
            return None;
        }
        Some(
            data[..needed]
                .chunks_exact(4)
                .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }
}

impl Device for RecordingDevice {
    fn poll_error(&mut self) -> Option<GLenum> {
        self.pending_errors.pop_front()
    }

    fn create_buffer(&mut self) -> u32 {
        let id = self.alloc_id();
        self.buffers.insert(id, RecordedBuffer::default());
        self.calls.push(DeviceCall::CreateBuffer(id));
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: u32) {
        self.calls.push(DeviceCall::BindBuffer(target, id));
        if id != 0 && !self.buffers.contains_key(&id) {
            self.raise(gl::INVALID_VALUE);
            return;
        }
        self.bound_buffers.insert(target, id);
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        size_in_bytes: usize,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) {
        self.calls.push(DeviceCall::BufferData {
            target,
            size_in_bytes,
            seeded: data.is_some(),
            usage,
        });
        let id = self.bound_buffer(target);
        let Some(buffer) = self.buffers.get_mut(&id) else {
            self.raise(gl::INVALID_OPERATION);
            return;
        };
        // Contenu initial indéfini : on le matérialise par des zéros
        let mut storage = vec![0u8; size_in_bytes];
        if let Some(seed) = data {
            let n = seed.len().min(size_in_bytes);
            storage[..n].copy_from_slice(&seed[..n]);
        }
        buffer.data = storage;
        buffer.usage = Some(usage);
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.calls.push(DeviceCall::BufferSubData {
            target,
            offset,
            len: data.len(),
        });
        let id = self.bound_buffer(target);
        let Some(buffer) = self.buffers.get_mut(&id) else {
            self.raise(gl::INVALID_OPERATION);
            return;
        };
        match offset.checked_add(data.len()) {
            Some(end) if end <= buffer.data.len() => {
                buffer.data[offset..end].copy_from_slice(data);
            }
            _ => self.raise(gl::INVALID_VALUE),
        }
    }

    fn delete_buffer(&mut self, id: u32) {
        self.calls.push(DeviceCall::DeleteBuffer(id));
        self.buffers.remove(&id);
        self.bound_buffers.retain(|_, bound| *bound != id);
    }

    fn create_vertex_array(&mut self) -> u32 {
        let id = self.alloc_id();
        self.vertex_arrays.insert(id, Vec::new());
        self.enabled_attribs.insert(id, Vec::new());
        self.calls.push(DeviceCall::CreateVertexArray(id));
        id
    }

    fn bind_vertex_array(&mut self, id: u32) {
        self.calls.push(DeviceCall::BindVertexArray(id));
        if id != 0 && !self.vertex_arrays.contains_key(&id) {
            self.raise(gl::INVALID_OPERATION);
            return;
        }
        self.bound_vertex_array = id;
    }

    fn enable_vertex_attrib(&mut self, index: u32) {
        self.calls.push(DeviceCall::EnableVertexAttrib(index));
        match self.enabled_attribs.get_mut(&self.bound_vertex_array) {
            Some(enabled) if !enabled.contains(&index) => enabled.push(index),
            Some(_) => {}
            None => self.raise(gl::INVALID_OPERATION),
        }
    }

    fn vertex_attrib_pointer(&mut self, attrib: &AttribPointer) {
        self.calls.push(DeviceCall::VertexAttribPointer(*attrib));
        if !(1..=4).contains(&attrib.count) {
            self.raise(gl::INVALID_VALUE);
            return;
        }
        if self.bound_buffer(BufferTarget::Vertex) == 0 {
            self.raise(gl::INVALID_OPERATION);
            return;
        }
        match self.vertex_arrays.get_mut(&self.bound_vertex_array) {
            Some(attribs) => {
                attribs.retain(|a| a.index != attrib.index);
                attribs.push(*attrib);
            }
            None => self.raise(gl::INVALID_OPERATION),
        }
    }

    fn delete_vertex_array(&mut self, id: u32) {
        self.calls.push(DeviceCall::DeleteVertexArray(id));
        self.vertex_arrays.remove(&id);
        self.enabled_attribs.remove(&id);
        if self.bound_vertex_array == id {
            self.bound_vertex_array = 0;
        }
    }

    fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> u32 {
        let id = self.alloc_id();
        self.calls.push(DeviceCall::CreateTexture { id, width, height });
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            self.raise(gl::INVALID_VALUE);
        }
        self.textures.insert(id, (width, height));
        id
    }

    fn bind_texture_unit(&mut self, slot: u32, texture: u32) {
        self.calls.push(DeviceCall::BindTextureUnit { slot, texture });
        if texture != 0 && !self.textures.contains_key(&texture) {
            self.raise(gl::INVALID_OPERATION);
            return;
        }
        self.texture_units.insert(slot, texture);
    }

    fn delete_texture(&mut self, id: u32) {
        self.calls.push(DeviceCall::DeleteTexture(id));
        self.textures.remove(&id);
        self.texture_units.retain(|_, bound| *bound != id);
    }

    fn create_program(&mut self, _vertex_src: &str, _fragment_src: &str) -> Result<u32, String> {
        if let Some(message) = self.failing_program.take() {
            return Err(message);
        }
        let id = self.alloc_id();
        self.programs.insert(id);
        self.calls.push(DeviceCall::CreateProgram(id));
        Ok(id)
    }

    fn use_program(&mut self, id: u32) {
        self.calls.push(DeviceCall::UseProgram(id));
        if id != 0 && !self.programs.contains(&id) {
            self.raise(gl::INVALID_VALUE);
            return;
        }
        self.bound_program = id;
    }

    fn delete_program(&mut self, id: u32) {
        self.calls.push(DeviceCall::DeleteProgram(id));
        self.programs.remove(&id);
        if self.bound_program == id {
            self.bound_program = 0;
        }
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> i32 {
        if !self.programs.contains(&program) {
            self.raise(gl::INVALID_VALUE);
            return -1;
        }
        if self.missing_uniforms.iter().any(|m| m == name) {
            return -1;
        }
        let next = self.uniform_locations.len() as i32;
        *self
            .uniform_locations
            .entry((program, name.to_string()))
            .or_insert(next)
    }

    fn uniform_1i(&mut self, location: i32, value: i32) {
        self.set_uniform(location, UniformValue::Int(value));
    }

    fn uniform_1iv(&mut self, location: i32, values: &[i32]) {
        self.set_uniform(location, UniformValue::IntArray(values.to_vec()));
    }

    fn uniform_4f(&mut self, location: i32, value: [f32; 4]) {
        self.set_uniform(location, UniformValue::Vec4(value));
    }

    fn uniform_mat4(&mut self, location: i32, value: &[f32; 16]) {
        self.set_uniform(location, UniformValue::Mat4(*value));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(DeviceCall::Viewport([x, y, width, height]));
        if width < 0 || height < 0 {
            self.raise(gl::INVALID_VALUE);
            return;
        }
        self.viewport = [x, y, width, height];
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        self.calls.push(DeviceCall::ClearColor(rgba));
        self.clear_color = rgba;
    }

    fn clear(&mut self) {
        self.calls.push(DeviceCall::Clear);
    }

    fn draw_indexed_triangles(&mut self, index_count: usize) {
        if self.bound_program == 0 || self.bound_vertex_array == 0 {
            self.raise(gl::INVALID_OPERATION);
        }
        let indices = match self.read_indices(index_count) {
            Some(indices) => indices,
            None => {
                self.raise(gl::INVALID_OPERATION);
                Vec::new()
            }
        };
        let mut texture_units: Vec<(u32, u32)> = self
            .texture_units
            .iter()
            .filter(|(_, tex)| **tex != 0)
            .map(|(slot, tex)| (*slot, *tex))
            .collect();
        texture_units.sort_unstable();

        self.calls.push(DeviceCall::DrawIndexed(DrawCall {
            index_count,
            program: self.bound_program,
            vertex_array: self.bound_vertex_array,
            index_buffer: self.bound_buffer(BufferTarget::Index),
            indices,
            texture_units,
        }));
    }
}
