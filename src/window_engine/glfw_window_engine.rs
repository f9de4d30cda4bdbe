use super::r#trait::{ImguiSystem, WindowEngine, WindowEvents};
use anyhow::{anyhow, Result};
use glfw::Context;
use imgui::Context as ImContext;
use imgui_glfw_rs::glfw;
use imgui_glfw_rs::ImguiGLFW;
use log::info;

use crate::renderer_engine::config::WindowConfig;
use crate::renderer_engine::tools::{setup_opengl_debug, show_opengl_context_info, GlContextInfo};

pub struct GlfwWindowEngine {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: WindowEvents,
    imgui_system: ImguiSystem,
    context_info: GlContextInfo,
}

impl WindowEngine for GlfwWindowEngine {
    fn init(config: &WindowConfig) -> Result<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|_| anyhow!("Impossible d'initialiser GLFW"))?;

        glfw.window_hint(glfw::WindowHint::ContextVersionMajor(3));
        glfw.window_hint(glfw::WindowHint::ContextVersionMinor(3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(
            glfw::OpenGlProfileHint::Core,
        ));
        #[cfg(target_os = "macos")]
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));

        let (mut window, events) = glfw
            .create_window(
                config.width,
                config.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or_else(|| anyhow!("Erreur création fenêtre GLFW '{}'", config.title))?;

        window.make_current();
        window.set_key_polling(true);
        window.set_char_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_mouse_button_polling(true);
        window.set_scroll_polling(true);
        // Synchronisé sur le vsync
        glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

        info!("✅ OpenGL context ready for '{}'", config.title);

        // load OpenGL function pointers
        gl::load_with(|s| window.get_proc_address(s) as *const _);

        let context_info = unsafe {
            let context_info = show_opengl_context_info();
            setup_opengl_debug();
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
            context_info
        };

        let mut imgui = ImContext::create();
        imgui.set_ini_filename(None);
        imgui.style_mut().use_dark_colors();

        let imgui_glfw = ImguiGLFW::new(&mut imgui, &mut window);

        Ok(Self {
            glfw,
            window,
            events,
            imgui_system: ImguiSystem {
                context: imgui,
                glfw: imgui_glfw,
            },
            context_info,
        })
    }

    fn poll_events(&mut self) {
        self.glfw.poll_events();
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn set_should_close(&mut self, value: bool) {
        self.window.set_should_close(value);
    }

    fn get_size(&self) -> (i32, i32) {
        self.window.get_size()
    }

    fn get_events(&self) -> &WindowEvents {
        &self.events
    }

    fn get_imgui_system_mut(&mut self) -> &mut ImguiSystem {
        &mut self.imgui_system
    }

    fn context_info(&self) -> &GlContextInfo {
        &self.context_info
    }

    fn get_window_and_imgui_mut(&mut self) -> (&mut glfw::PWindow, &mut ImguiSystem) {
        (&mut self.window, &mut self.imgui_system)
    }
}
