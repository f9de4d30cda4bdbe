use super::buffer::IndexBuffer;
use super::device::Device;
use super::shader::Shader;
use super::vertex_array::VertexArray;
use crate::gl_call;

/// Exécute les draw calls indexés.
///
/// Sans état : chaque appel relie lui-même programme, VAO et index buffer,
/// quel que soit ce qu'un autre composant a laissé lié.
#[derive(Debug, Default, Clone, Copy)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn clear<D: Device + ?Sized>(&self, device: &mut D, color: [f32; 4]) {
        gl_call!(device, device.clear_color(color));
        gl_call!(device, device.clear());
    }

    /// Zone de rendu couvrant tout le framebuffer `width × height`.
    pub fn viewport<D: Device + ?Sized>(&self, device: &mut D, width: i32, height: i32) {
        gl_call!(device, device.viewport(0, 0, width, height));
    }

    /// Dessine `index_count` indices de `ibo` (triangles).
    ///
    /// `index_count` doit rester ≤ `ibo.capacity()` ; au-delà c'est le device qui
    /// signale l'erreur.
    pub fn draw<D: Device + ?Sized>(
        &self,
        device: &mut D,
        vao: &VertexArray,
        ibo: &IndexBuffer,
        shader: &Shader,
        index_count: usize,
    ) {
        shader.bind(device);
        vao.bind(device);
        ibo.bind(device);
        gl_call!(device, device.draw_indexed_triangles(index_count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer_engine::buffer::VertexBuffer;
    use crate::renderer_engine::recording_device::{DeviceCall, RecordingDevice};
    use crate::renderer_engine::shader::parse_shader;
    use crate::renderer_engine::types::Vertex;

    const SOURCE: &str = "#shader vertex\nvoid main() {}\n#shader fragment\nvoid main() {}\n";

    #[test]
    fn test_clear_sets_color_then_clears() {
        let mut device = RecordingDevice::new();
        Renderer::new().clear(&mut device, [0.1, 0.2, 0.3, 1.0]);

        assert_eq!(
            device.calls(),
            &[DeviceCall::ClearColor([0.1, 0.2, 0.3, 1.0]), DeviceCall::Clear]
        );
    }

    #[test]
    fn test_viewport_covers_whole_framebuffer() {
        let mut device = RecordingDevice::new();
        Renderer::new().viewport(&mut device, 1920, 1080);

        assert_eq!(device.calls(), &[DeviceCall::Viewport([0, 0, 1920, 1080])]);
        assert_eq!(device.viewport(), [0, 0, 1920, 1080]);
        assert!(device.raised_errors().is_empty());
    }

    #[test]
    fn test_negative_viewport_is_reported_not_fatal() {
        let mut device = RecordingDevice::new();
        let renderer = Renderer::new();
        renderer.viewport(&mut device, 960, 540);
        renderer.viewport(&mut device, -1, 540);

        assert_eq!(device.raised_errors(), &[gl::INVALID_VALUE]);
        assert_eq!(device.viewport(), [0, 0, 960, 540]);
    }

    #[test]
    fn test_draw_rebinds_everything_it_needs() {
        let mut device = RecordingDevice::new();
        let shader = Shader::from_source(&mut device, "test", &parse_shader(SOURCE)).unwrap();
        let vao = VertexArray::new(&mut device);
        let vbo = VertexBuffer::dynamic::<Vertex, _>(&mut device, 4).unwrap();
        vao.add_buffer(&mut device, &vbo, &Vertex::layout());
        let ibo = IndexBuffer::from_indices(&mut device, &[0, 1, 2, 2, 3, 0]).unwrap();

        // Etat global volontairement délié
        vao.unbind(&mut device);
        ibo.unbind(&mut device);
        shader.unbind(&mut device);

        Renderer::new().draw(&mut device, &vao, &ibo, &shader, 6);

        let draws = device.draw_calls();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].program, shader.id());
        assert_eq!(draws[0].vertex_array, vao.id());
        assert_eq!(draws[0].index_buffer, ibo.buffer().id());
        assert_eq!(draws[0].indices, vec![0, 1, 2, 2, 3, 0]);
        assert!(device.raised_errors().is_empty());
    }

    #[test]
    fn test_draw_past_index_buffer_is_reported_not_fatal() {
        let mut device = RecordingDevice::new();
        let shader = Shader::from_source(&mut device, "test", &parse_shader(SOURCE)).unwrap();
        let vao = VertexArray::new(&mut device);
        let ibo = IndexBuffer::from_indices(&mut device, &[0, 1, 2]).unwrap();

        Renderer::new().draw(&mut device, &vao, &ibo, &shader, 6);

        assert_eq!(device.raised_errors(), &[gl::INVALID_OPERATION]);
        assert_eq!(device.draw_calls().len(), 1);
    }
}
