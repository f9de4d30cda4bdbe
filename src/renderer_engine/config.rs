use glam::{Mat4, Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Chemin par défaut du fichier de configuration.
pub const DEFAULT_CONFIG_PATH: &str = "assets/config/batch.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            title: "Batch Renderer".to_string(),
        }
    }
}

/// Projection orthographique en pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            left: 0.0,
            right: 960.0,
            bottom: 0.0,
            top: 540.0,
            near: -1.0,
            far: 1.0,
        }
    }
}

impl ProjectionConfig {
    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Capacité du batch : `4 * max_quads` sommets, `6 * max_quads` indices.
    pub max_quads: usize,
    pub quad_edge: f32,
    pub quad_color: [f32; 4],
    pub clear_color: [f32; 4],

    pub shader_path: String,
    /// Shader à couleur uniforme de la scène statique "Colors".
    pub color_shader_path: String,
    pub texture_paths: Vec<String>,

    pub quad_positions: Vec<[f32; 2]>,
    pub quad_count: usize,

    // Tables en dernier (sérialisation TOML)
    pub window: WindowConfig,
    pub projection: ProjectionConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_quads: 250,
            quad_edge: 100.0,
            quad_color: [0.55, 0.12, 0.67, 1.0],
            clear_color: [0.1, 0.23, 0.29, 1.0],
            shader_path: "assets/shaders/batch_textures.shader".to_string(),
            color_shader_path: "assets/shaders/batch_color.shader".to_string(),
            texture_paths: vec![
                "assets/textures/rust_logo.png".to_string(),
                "assets/textures/ferris.png".to_string(),
                "assets/textures/gear.png".to_string(),
            ],
            quad_positions: vec![
                [-50.0, -50.0],
                [70.0, -50.0],
                [190.0, -50.0],
                [310.0, -50.0],
                [430.0, -50.0],
            ],
            quad_count: 2,
            window: WindowConfig::default(),
            projection: ProjectionConfig::default(),
        }
    }
}

impl BatchConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn quad_positions(&self) -> Vec<Vec2> {
        self.quad_positions.iter().map(|&p| Vec2::from(p)).collect()
    }

    pub fn quad_color(&self) -> Vec4 {
        Vec4::from(self.quad_color)
    }
}
