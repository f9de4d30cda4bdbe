use super::buffer::VertexBuffer;
use super::device::Device;
use super::layout::VertexBufferLayout;
use crate::gl_call;

/// Vertex Array Object : mémorise quel buffer alimente quels attributs.
#[derive(Debug)]
pub struct VertexArray {
    id: u32,
}

impl VertexArray {
    pub fn new<D: Device + ?Sized>(device: &mut D) -> Self {
        let id = gl_call!(device, device.create_vertex_array());
        gl_call!(device, device.bind_vertex_array(id));
        Self { id }
    }

    /// Attache `vbo` et déclare ses attributs selon `layout`.
    ///
    /// Laisse le VAO et le VBO liés.
    pub fn add_buffer<D: Device + ?Sized>(
        &self,
        device: &mut D,
        vbo: &VertexBuffer,
        layout: &VertexBufferLayout,
    ) {
        self.bind(device);
        vbo.bind(device);

        for attrib in layout.attrib_pointers() {
            gl_call!(device, device.enable_vertex_attrib(attrib.index));
            gl_call!(device, device.vertex_attrib_pointer(&attrib));
        }
    }

    pub fn bind<D: Device + ?Sized>(&self, device: &mut D) {
        gl_call!(device, device.bind_vertex_array(self.id));
    }

    pub fn unbind<D: Device + ?Sized>(&self, device: &mut D) {
        gl_call!(device, device.bind_vertex_array(0));
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn destroy<D: Device + ?Sized>(self, device: &mut D) {
        gl_call!(device, device.delete_vertex_array(self.id));
    }
}
