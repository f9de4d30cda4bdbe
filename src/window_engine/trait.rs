use anyhow::Result;
use imgui_glfw_rs::glfw;

use crate::renderer_engine::config::WindowConfig;
use crate::renderer_engine::tools::GlContextInfo;

pub type WindowEvents = glfw::GlfwReceiver<(f64, glfw::WindowEvent)>;

pub struct ImguiSystem {
    pub context: imgui::Context,
    pub glfw: imgui_glfw_rs::ImguiGLFW,
}

/// Fenêtre + contexte OpenGL 3.3 core + contexte imgui.
pub trait WindowEngine {
    fn init(config: &WindowConfig) -> Result<Self>
    where
        Self: Sized;

    fn poll_events(&mut self);
    fn swap_buffers(&mut self);
    fn should_close(&self) -> bool;
    fn set_should_close(&mut self, value: bool);
    fn get_size(&self) -> (i32, i32);
    fn get_events(&self) -> &WindowEvents;
    fn get_imgui_system_mut(&mut self) -> &mut ImguiSystem;
    fn context_info(&self) -> &GlContextInfo;

    // Helper method to get both window and imgui system for rendering
    fn get_window_and_imgui_mut(&mut self) -> (&mut glfw::PWindow, &mut ImguiSystem);
}
