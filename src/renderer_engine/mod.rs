pub mod device;
pub use self::device::{AttribPointer, AttribType, BufferTarget, BufferUsage, Device};
pub mod gl_device;
pub use self::gl_device::GlDevice;
#[cfg(any(test, feature = "test_helpers"))]
pub mod recording_device;
#[cfg(any(test, feature = "test_helpers"))]
pub use self::recording_device::{DeviceCall, DrawCall, RecordingDevice, UniformValue};
pub mod gl_check;
pub use self::gl_check::gl_error_name;

pub mod buffer;
pub use self::buffer::{BufferError, GpuBuffer, IndexBuffer, VertexBuffer};
pub mod layout;
pub use self::layout::{LayoutType, VertexBufferElement, VertexBufferLayout};
pub mod vertex_array;
pub use self::vertex_array::VertexArray;

pub mod types;
pub use self::types::{QuadDescriptor, Vertex};
pub mod quad;
pub use self::quad::{make_quad, make_quad_from};
pub mod indices;
pub use self::indices::{
    batch_capacity, checked_generate_indices, generate_indices, CapacityError, MAX_INDEXABLE_QUADS,
};
pub mod scratch;
pub use self::scratch::FrameScratch;

pub mod shader;
pub use self::shader::{load_shader_file, parse_shader, Shader, ShaderProgramSource};
pub mod texture;
pub use self::texture::{Texture, TextureSlots, MAX_TEXTURE_SLOTS};

pub mod renderer;
pub use self::renderer::Renderer;
pub mod batch;
pub use self::batch::{BatchError, FrameStats, QuadBatch};

pub mod config;
pub use self::config::BatchConfig;

pub mod tools;
pub use self::tools::show_opengl_context_info;
