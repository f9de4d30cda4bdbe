//! Scènes pilotées frame par frame, sélectionnées depuis un menu.
//!
//! Chaque scène reçoit dans l'ordre : `on_update(dt)`, `on_render(device)`, puis
//! `on_imgui_render(ui)` pendant la frame imgui.
use anyhow::Result;
use log::{info, warn};

use crate::renderer_engine::{
    parse_shader, BatchConfig, Device, Renderer, Shader, Texture, TextureSlots, MAX_TEXTURE_SLOTS,
};

pub mod clear_color;
pub use self::clear_color::ClearColorScene;
pub mod dynamic_geometry;
pub use self::dynamic_geometry::DynamicGeometryScene;
pub mod static_batch;
pub use self::static_batch::{StaticBatchScene, StaticVariant};

/// Shaders de repli, utilisés si le fichier configuré est introuvable.
pub(crate) const EMBEDDED_SHADER: &str = include_str!("../../assets/shaders/batch_textures.shader");
pub(crate) const EMBEDDED_COLOR_SHADER: &str =
    include_str!("../../assets/shaders/batch_color.shader");

/// Couleur de fond hors scène (et restaurée au retour au menu).
pub const MENU_CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

pub trait Scene {
    fn name(&self) -> &'static str;

    fn on_update(&mut self, _delta_time: f32) {}

    fn on_render(&mut self, device: &mut dyn Device, renderer: &Renderer) -> Result<()>;

    fn on_imgui_render(&mut self, _ui: &imgui::Ui) {}

    /// Libère les ressources GPU de la scène.
    fn destroy(self: Box<Self>, device: &mut dyn Device);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    ClearColor,
    StaticColors,
    StaticTextures,
    DynamicGeometry,
}

impl SceneKind {
    /// Ordre des boutons du menu.
    pub const ALL: [SceneKind; 4] = [
        SceneKind::ClearColor,
        SceneKind::StaticColors,
        SceneKind::StaticTextures,
        SceneKind::DynamicGeometry,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SceneKind::ClearColor => "Clear Color",
            SceneKind::StaticColors => StaticVariant::Colors.label(),
            SceneKind::StaticTextures => StaticVariant::Textures.label(),
            SceneKind::DynamicGeometry => "Batch Rendering - Dynamic Geometry",
        }
    }

    pub fn create(self, device: &mut dyn Device, config: &BatchConfig) -> Result<Box<dyn Scene>> {
        Ok(match self {
            SceneKind::ClearColor => Box::new(ClearColorScene::new(config.clear_color)),
            SceneKind::StaticColors => {
                Box::new(StaticBatchScene::new(device, config, StaticVariant::Colors)?)
            }
            SceneKind::StaticTextures => {
                Box::new(StaticBatchScene::new(device, config, StaticVariant::Textures)?)
            }
            SceneKind::DynamicGeometry => Box::new(DynamicGeometryScene::new(device, config)?),
        })
    }
}

/// Charge le shader `path`, ou à défaut la source embarquée `embedded`.
pub(crate) fn load_shader(device: &mut dyn Device, path: &str, embedded: &str) -> Result<Shader> {
    match Shader::from_file(device, path) {
        Ok(shader) => Ok(shader),
        Err(e) => {
            warn!("{:#}; using embedded shader", e);
            Shader::from_source(device, "embedded shader", &parse_shader(embedded))
        }
    }
}

/// Une texture par chemin (damier si illisible), au plus `MAX_TEXTURE_SLOTS`.
///
/// Sans aucun chemin, le slot 0 reçoit un damier.
pub(crate) fn load_textures(device: &mut dyn Device, paths: &[String]) -> Result<TextureSlots> {
    if paths.len() > MAX_TEXTURE_SLOTS {
        warn!(
            "{} textures configured, only the first {} are bound",
            paths.len(),
            MAX_TEXTURE_SLOTS
        );
    }
    let mut textures = TextureSlots::new();
    for path in paths.iter().take(MAX_TEXTURE_SLOTS) {
        textures.push(Texture::load_or_fallback(device, path))?;
    }
    if textures.is_empty() {
        textures.push(Texture::checkerboard(device))?;
    }
    Ok(textures)
}

/// Demande faite depuis l'UI, appliquée hors de la frame imgui.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRequest {
    Open(SceneKind),
    Back,
}

/// Menu des scènes : au plus une scène ouverte à la fois.
#[derive(Default)]
pub struct SceneMenu {
    current: Option<Box<dyn Scene>>,
    pending: Option<MenuRequest>,
}

impl SceneMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|scene| scene.name())
    }

    pub fn request(&mut self, request: MenuRequest) {
        self.pending = Some(request);
    }

    /// Ouvre ou ferme une scène suite à la dernière demande.
    ///
    /// Une scène déjà ouverte est détruite avant d'ouvrir la suivante. Si la
    /// création échoue, le menu reste sans scène et l'erreur est retournée.
    pub fn apply_pending(&mut self, device: &mut dyn Device, config: &BatchConfig) -> Result<()> {
        let Some(request) = self.pending.take() else {
            return Ok(());
        };
        self.close(device);
        match request {
            MenuRequest::Back => {
                Renderer::new().clear(device, MENU_CLEAR_COLOR);
            }
            MenuRequest::Open(kind) => {
                let scene = kind.create(device, config)?;
                info!("▶️ Scene '{}' opened", scene.name());
                self.current = Some(scene);
            }
        }
        Ok(())
    }

    pub fn on_update(&mut self, delta_time: f32) {
        if let Some(scene) = self.current.as_mut() {
            scene.on_update(delta_time);
        }
    }

    pub fn on_render(&mut self, device: &mut dyn Device, renderer: &Renderer) -> Result<()> {
        match self.current.as_mut() {
            Some(scene) => scene.on_render(device, renderer),
            None => Ok(()),
        }
    }

    pub fn on_imgui_render(&mut self, ui: &imgui::Ui) {
        let current = &mut self.current;
        let pending = &mut self.pending;

        ui.window("Scenes").build(|| match current.as_mut() {
            Some(scene) => {
                if ui.button("<- Back") {
                    *pending = Some(MenuRequest::Back);
                }
                ui.separator();
                scene.on_imgui_render(ui);
            }
            None => {
                for kind in SceneKind::ALL {
                    if ui.button(kind.label()) {
                        *pending = Some(MenuRequest::Open(kind));
                    }
                }
            }
        });
    }

    /// Détruit la scène courante, s'il y en a une.
    pub fn close(&mut self, device: &mut dyn Device) {
        if let Some(scene) = self.current.take() {
            info!("⏹️ Scene '{}' closed", scene.name());
            scene.destroy(device);
        }
    }
}
