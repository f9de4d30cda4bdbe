// Ici on importe depuis la crate lib complète
use anyhow::Result;
use log::info;
use std::env;

use batch_renderer::renderer_engine::config::{BatchConfig, DEFAULT_CONFIG_PATH};
use batch_renderer::utils::show_rust_core_dependencies;
use batch_renderer::window_engine::{GlfwWindowEngine, WindowEngine};
use batch_renderer::App;

/// Main entry point for the Batch Renderer application.
fn main() -> Result<()> {
    env_logger::init();

    info!("🚀 Starting Batch Renderer...");

    show_rust_core_dependencies();

    // priorité à l'argument CLI, puis à la variable d'environnement
    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("BATCH_RENDERER_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = BatchConfig::from_file(&config_path).unwrap_or_else(|e| {
        info!("No usable config at '{}' ({}), using defaults", config_path, e);
        BatchConfig::default()
    });
    info!("Batch config loaded:\n{:#?}", config);

    // 1. Init Window & Context
    let window_engine = GlfwWindowEngine::init(&config.window)?;

    // 2. Main loop
    let mut app = App::new(window_engine, config);
    let result = app.run();
    app.close();

    result
}
