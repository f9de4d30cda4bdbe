use crate::renderer_engine::{BatchConfig, GlDevice, Renderer};
use crate::scenes::{MenuRequest, SceneMenu, MENU_CLEAR_COLOR};
use crate::window_engine::WindowEngine;
use glfw::{Action, Key};
use imgui_glfw_rs::glfw;
use log::{error, info};
use std::time::{Duration, Instant};

/// Intervalle entre deux logs de FPS.
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Boucle principale : événements, scène courante, UI de debug, présentation.
pub struct App<W: WindowEngine> {
    window_engine: W,
    device: GlDevice,
    renderer: Renderer,
    menu: SceneMenu,
    config: BatchConfig,

    frames: u64,
    last_time: Instant,
    last_log: Instant,
    frames_since_log: u32,
    first_frame: bool,
}

impl<W: WindowEngine> App<W> {
    /// `window_engine` doit avoir rendu son contexte OpenGL courant.
    pub fn new(window_engine: W, config: BatchConfig) -> Self {
        // SAFETY: WindowEngine::init crée le contexte et charge les pointeurs GL
        let device = unsafe { GlDevice::new() };
        Self {
            window_engine,
            device,
            renderer: Renderer::new(),
            menu: SceneMenu::new(),
            config,
            frames: 0,
            last_time: Instant::now(),
            last_log: Instant::now(),
            frames_since_log: 0,
            first_frame: true,
        }
    }

    /// Ouvre directement une scène au démarrage.
    pub fn open(&mut self, request: MenuRequest) {
        self.menu.request(request);
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        while self.step() {}
        Ok(())
    }

    pub fn step(&mut self) -> bool {
        if self.window_engine.should_close() {
            return false;
        }

        self.window_engine.poll_events();

        // Collect events into a Vec to avoid borrow checker issues
        let events: Vec<_> = glfw::flush_messages(self.window_engine.get_events()).collect();
        for (_, event) in events {
            match event {
                glfw::WindowEvent::FramebufferSize(w, h) => {
                    self.renderer.viewport(&mut self.device, w, h);
                }
                glfw::WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                    self.window_engine.set_should_close(true);
                }
                _ => {}
            }
            let imgui_system = self.window_engine.get_imgui_system_mut();
            imgui_system
                .glfw
                .handle_event(&mut imgui_system.context, &event);
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last_time).as_secs_f32();
        self.last_time = now;
        self.frames += 1;
        self.frames_since_log += 1;

        self.renderer.clear(&mut self.device, MENU_CLEAR_COLOR);
        self.menu.on_update(delta);
        if let Err(e) = self.menu.on_render(&mut self.device, &self.renderer) {
            error!("Scene render failed: {:#}", e);
            self.menu.request(MenuRequest::Back);
        }

        {
            let (window, imgui_system) = self.window_engine.get_window_and_imgui_mut();
            let ui = imgui_system.glfw.frame(window, &mut imgui_system.context);
            self.menu.on_imgui_render(ui);
            // Get references again after draw
            let (win, sys) = self.window_engine.get_window_and_imgui_mut();
            sys.glfw.draw(&mut sys.context, win);
        }

        self.window_engine.swap_buffers();

        if let Err(e) = self.menu.apply_pending(&mut self.device, &self.config) {
            error!("Cannot open scene: {:#}", e);
        }

        if self.last_log.elapsed() >= FPS_LOG_INTERVAL {
            let fps = self.frames_since_log as f32 / self.last_log.elapsed().as_secs_f32();
            info!("Frame #{}: {:.1} FPS (moyenne sur {:?})", self.frames, fps, FPS_LOG_INTERVAL);
            self.frames_since_log = 0;
            self.last_log = Instant::now();
        }

        if self.first_frame {
            info!("🚀 First frame rendered");
            self.first_frame = false;
        }

        true
    }

    pub fn close(&mut self) {
        self.menu.close(&mut self.device);
        info!("👋 Closed after {} frames", self.frames);
    }
}
