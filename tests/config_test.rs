mod helpers;

use batch_renderer::renderer_engine::BatchConfig;
use glam::Vec4;
use helpers::asset;
use tempfile::tempdir;

#[test]
fn shipped_config_matches_defaults() {
    let path = asset("config/batch.toml");
    let config = BatchConfig::from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(config, BatchConfig::default());
}

#[test]
fn save_then_reload_keeps_every_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("batch.toml");
    let path = path.to_str().unwrap();

    let mut config = BatchConfig::default();
    config.max_quads = 1000;
    config.quad_count = 4;
    config.quad_color = [1.0, 0.5, 0.25, 1.0];
    config.window.title = "Stress".to_string();
    config.projection.right = 1920.0;
    config.save_to_file(path).unwrap();

    let reloaded = BatchConfig::from_file(path).unwrap();
    assert_eq!(reloaded, config);
    assert_eq!(reloaded.quad_color(), Vec4::new(1.0, 0.5, 0.25, 1.0));
}

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.toml");
    std::fs::write(&path, "max_quads = 8\n[window]\ntitle = \"Tiny\"\n").unwrap();

    let config = BatchConfig::from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(config.max_quads, 8);
    assert_eq!(config.window.title, "Tiny");
    assert_eq!(config.window.width, 960);
    assert_eq!(config.quad_positions().len(), 5);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "max_quads = \"many\"\n").unwrap();

    assert!(BatchConfig::from_file(path.to_str().unwrap()).is_err());
    assert!(BatchConfig::from_file("does/not/exist.toml").is_err());
}
