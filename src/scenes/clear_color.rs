use anyhow::Result;

use super::Scene;
use crate::renderer_engine::{Device, Renderer};

pub struct ClearColorScene {
    pub clear_color: [f32; 4],
}

impl Default for ClearColorScene {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.23, 0.29, 1.0],
        }
    }
}

impl ClearColorScene {
    /// Scène initialisée avec la couleur de fond configurée.
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self { clear_color }
    }
}

impl Scene for ClearColorScene {
    fn name(&self) -> &'static str {
        "Clear Color"
    }

    fn on_render(&mut self, device: &mut dyn Device, renderer: &Renderer) -> Result<()> {
        renderer.clear(device, self.clear_color);
        Ok(())
    }

    fn on_imgui_render(&mut self, ui: &imgui::Ui) {
        ui.color_edit4("Clear Color", &mut self.clear_color);
    }

    fn destroy(self: Box<Self>, _device: &mut dyn Device) {}
}
