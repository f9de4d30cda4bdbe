#![cfg(feature = "interactive_tests")]

use batch_renderer::renderer_engine::config::WindowConfig;
use batch_renderer::renderer_engine::BatchConfig;
use batch_renderer::scenes::{MenuRequest, SceneKind};
use batch_renderer::window_engine::{GlfwWindowEngine, WindowEngine};
use batch_renderer::App;
mod helpers;
use helpers::init_logger;

#[test]
#[ignore] // Segfaults in headless environment
fn test_app_renders_dynamic_geometry_frames() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    // 1. Init Window
    let window_config = WindowConfig {
        title: "Test Batch".to_string(),
        ..WindowConfig::default()
    };
    let window_engine = GlfwWindowEngine::init(&window_config)?;
    assert!(window_engine.context_info().max_texture_units >= 1);

    // 2. Ouvre directement la scène de batch
    let mut app = App::new(window_engine, BatchConfig::default());
    app.open(MenuRequest::Open(SceneKind::DynamicGeometry));

    for _ in 0..3 {
        assert!(app.step());
    }

    // Vérifie qu'on peut fermer correctement
    app.close();

    Ok(())
}
