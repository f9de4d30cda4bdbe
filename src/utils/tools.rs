use log::info;

/// Versions des crates cœur, injectées par `build.rs` (`cargo metadata`).
pub fn core_dependencies() -> [(&'static str, &'static str); 3] {
    [
        ("GL", option_env!("GL").unwrap_or("Unknown")),
        ("GLFW", option_env!("GLFW").unwrap_or("Unknown")),
        ("IMGUI", option_env!("IMGUI").unwrap_or("Unknown")),
    ]
}

/// Affiche les informations Rust et les dépendances principales de la compilation.
pub fn show_rust_core_dependencies() {
    info!(
        "Rust compiler version: {}",
        rustc_version_runtime::version()
    );
    info!("  Platform    : {}", std::env::consts::OS);
    info!("  Arch        : {}", std::env::consts::ARCH);

    info!("Rust core dependencies");
    for (name, version) in core_dependencies() {
        info!("  {:<5} version: {}", name, version);
    }
}
