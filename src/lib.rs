// Renderer engine
pub mod renderer_engine;
pub use renderer_engine::{Device, QuadBatch, Renderer};
// Scenes
pub mod scenes;
pub use scenes::{Scene, SceneKind, SceneMenu};
// Window engine
pub mod window_engine;
pub use window_engine::WindowEngine;
// Main loop
pub mod app;
pub use app::App;
// Utilities
pub mod utils;
