mod helpers;

use batch_renderer::renderer_engine::{
    BatchConfig, BufferUsage, DeviceCall, RecordingDevice, Renderer,
};
use batch_renderer::scenes::{MenuRequest, SceneKind, SceneMenu, MENU_CLEAR_COLOR};
use helpers::{asset, init_logger};

/// Configuration par défaut, chemins résolus depuis la racine du crate.
fn shipped_config() -> BatchConfig {
    let mut config = BatchConfig::default();
    config.shader_path = asset("shaders/batch_textures.shader")
        .to_string_lossy()
        .into_owned();
    config.color_shader_path = asset("shaders/batch_color.shader")
        .to_string_lossy()
        .into_owned();
    config.texture_paths = ["rust_logo.png", "ferris.png", "gear.png"]
        .iter()
        .map(|name| asset(&format!("textures/{}", name)).to_string_lossy().into_owned())
        .collect();
    config
}

#[test]
fn dynamic_geometry_loads_shipped_assets() {
    init_logger();
    let mut device = RecordingDevice::new();
    let mut menu = SceneMenu::new();

    menu.request(MenuRequest::Open(SceneKind::DynamicGeometry));
    menu.apply_pending(&mut device, &shipped_config()).unwrap();
    assert_eq!(menu.current_name(), Some("Batch Rendering - Dynamic Geometry"));
    assert_eq!(device.live_texture_count(), 3);

    menu.on_update(1.0 / 60.0);
    menu.on_render(&mut device, &Renderer::new()).unwrap();

    let draws = device.draw_calls();
    assert_eq!(draws.len(), 1);
    // Deux quads visibles par défaut
    assert_eq!(draws[0].index_count, 12);
    assert_eq!(draws[0].texture_units.len(), 3);
    assert!(device.raised_errors().is_empty());
}

#[test]
fn back_releases_scene_resources() {
    init_logger();
    let mut device = RecordingDevice::new();
    let config = shipped_config();
    let mut menu = SceneMenu::new();

    menu.request(MenuRequest::Open(SceneKind::DynamicGeometry));
    menu.apply_pending(&mut device, &config).unwrap();
    menu.on_render(&mut device, &Renderer::new()).unwrap();

    menu.request(MenuRequest::Back);
    menu.apply_pending(&mut device, &config).unwrap();

    assert_eq!(menu.current_name(), None);
    assert_eq!(device.live_texture_count(), 0);
    assert_eq!(device.current_clear_color(), MENU_CLEAR_COLOR);
}

#[test]
fn missing_assets_fall_back_to_embedded_resources() {
    init_logger();
    let mut device = RecordingDevice::new();
    let config = BatchConfig {
        shader_path: "nowhere/batch.shader".to_string(),
        texture_paths: vec!["nowhere/a.png".to_string(), "nowhere/b.png".to_string()],
        ..BatchConfig::default()
    };
    let mut menu = SceneMenu::new();

    menu.request(MenuRequest::Open(SceneKind::DynamicGeometry));
    menu.apply_pending(&mut device, &config).unwrap();
    menu.on_render(&mut device, &Renderer::new()).unwrap();

    // Un damier par chemin introuvable
    assert_eq!(device.live_texture_count(), 2);
    assert_eq!(device.draw_calls().len(), 1);
}

#[test]
fn closing_the_menu_is_idempotent() {
    let mut device = RecordingDevice::new();
    let mut menu = SceneMenu::new();
    menu.request(MenuRequest::Open(SceneKind::ClearColor));
    menu.apply_pending(&mut device, &BatchConfig::default()).unwrap();

    menu.close(&mut device);
    menu.close(&mut device);
    assert_eq!(menu.current_name(), None);
}

#[test]
fn static_scenes_draw_once_from_static_buffers() {
    init_logger();
    let config = shipped_config();

    for (kind, index_count, textures) in [
        (SceneKind::StaticColors, 12, 0),
        (SceneKind::StaticTextures, 18, 3),
    ] {
        let mut device = RecordingDevice::new();
        let mut menu = SceneMenu::new();
        menu.request(MenuRequest::Open(kind));
        menu.apply_pending(&mut device, &config).unwrap();
        assert_eq!(menu.current_name(), Some(kind.label()));

        // Aucun upload après la création
        device.clear_calls();
        menu.on_render(&mut device, &Renderer::new()).unwrap();
        menu.on_render(&mut device, &Renderer::new()).unwrap();

        let draws = device.draw_calls();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].index_count, index_count);
        assert_eq!(draws[0].texture_units.len(), textures);
        assert_eq!(device.buffer_usage(draws[0].index_buffer), Some(BufferUsage::Static));
        let uploads = device.count_calls(|c| {
            matches!(c, DeviceCall::BufferData { .. } | DeviceCall::BufferSubData { .. })
        });
        assert_eq!(uploads, 0);
        assert!(device.raised_errors().is_empty());

        menu.close(&mut device);
        assert_eq!(device.live_texture_count(), 0);
    }
}

#[test]
fn every_menu_entry_opens() {
    let mut config = shipped_config();
    config.texture_paths.clear();
    let mut device = RecordingDevice::new();
    let mut menu = SceneMenu::new();

    for kind in SceneKind::ALL {
        menu.request(MenuRequest::Open(kind));
        menu.apply_pending(&mut device, &config).unwrap();
        assert_eq!(menu.current_name(), Some(kind.label()));
    }
    menu.close(&mut device);
    assert_eq!(device.live_texture_count(), 0);
}

#[test]
fn oversized_batch_is_refused_without_leaking() {
    init_logger();
    let mut device = RecordingDevice::new();
    let config = BatchConfig {
        max_quads: i64::MAX as usize / 2,
        ..shipped_config()
    };
    let mut menu = SceneMenu::new();

    menu.request(MenuRequest::Open(SceneKind::DynamicGeometry));
    let err = menu.apply_pending(&mut device, &config).unwrap_err();

    assert!(format!("{:#}", err).contains("capacity"));
    assert_eq!(menu.current_name(), None);
    assert_eq!(device.live_texture_count(), 0);
    assert!(device.draw_calls().is_empty());
}
