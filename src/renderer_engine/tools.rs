use gl::types::*;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::c_void;
use std::sync::Mutex;

use super::texture::MAX_TEXTURE_SLOTS;

/// Un message de debug est relogué toutes les `DEBUG_REPEAT_INTERVAL` occurrences.
const DEBUG_REPEAT_INTERVAL: u32 = 60;

lazy_static::lazy_static! {
    static ref MESSAGE_COUNT: Mutex<HashMap<u32, u32>> = Mutex::new(HashMap::new());
}

/// Description du contexte OpenGL courant.
#[derive(Debug, Clone, Default)]
pub struct GlContextInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub glsl_version: String,
    pub max_texture_units: i32,
}

unsafe fn gl_string(name: GLenum) -> String {
    let ptr = gl::GetString(name);
    if ptr.is_null() {
        return "Unknown".to_string();
    }
    CStr::from_ptr(ptr as *const GLchar)
        .to_string_lossy()
        .into_owned()
}

/// Affiche les informations OpenGL / GPU du contexte actuel
/// # Safety
///
/// L'appelant doit s'assurer que le contexte OpenGL est valide et actif.
pub unsafe fn show_opengl_context_info() -> GlContextInfo {
    let mut max_texture_units = 0;
    gl::GetIntegerv(gl::MAX_TEXTURE_IMAGE_UNITS, &mut max_texture_units);

    let info = GlContextInfo {
        vendor: gl_string(gl::VENDOR),
        renderer: gl_string(gl::RENDERER),
        version: gl_string(gl::VERSION),
        glsl_version: gl_string(gl::SHADING_LANGUAGE_VERSION),
        max_texture_units,
    };

    info!("🖥 OpenGL context info:");
    info!("  Vendor   : {}", info.vendor);
    info!("  Renderer : {}", info.renderer);
    info!("  OpenGL   : {}", info.version);
    info!("  GLSL     : {}", info.glsl_version);
    info!("  Texture units (fragment): {}", info.max_texture_units);

    if (info.max_texture_units as usize) < MAX_TEXTURE_SLOTS {
        warn!(
            "Only {} texture units available, the batch shader samples {}",
            info.max_texture_units, MAX_TEXTURE_SLOTS
        );
    }

    let mut num_ext = 0;
    gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num_ext);
    let extensions: Vec<String> = (0..num_ext.max(0) as u32)
        .map(|i| {
            let ptr = gl::GetStringi(gl::EXTENSIONS, i);
            if ptr.is_null() {
                String::new()
            } else {
                CStr::from_ptr(ptr as *const GLchar).to_string_lossy().into_owned()
            }
        })
        .collect();
    debug!("GL_EXTENSIONS ({}) = {}", num_ext, extensions.join(" "));

    // Consommer le glerror si nécessaire
    let err = gl::GetError();
    if err != gl::NO_ERROR {
        warn!("glerror consumed after getting context info: 0x{:X}", err);
    }

    info
}

fn debug_source_name(source: GLenum) -> &'static str {
    match source {
        gl::DEBUG_SOURCE_API => "API",
        gl::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System",
        gl::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler",
        gl::DEBUG_SOURCE_THIRD_PARTY => "Third Party",
        gl::DEBUG_SOURCE_APPLICATION => "Application",
        gl::DEBUG_SOURCE_OTHER => "Other",
        _ => "Unknown",
    }
}

fn debug_type_name(type_: GLenum) -> &'static str {
    match type_ {
        gl::DEBUG_TYPE_ERROR => "Error",
        gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated Behavior",
        gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behavior",
        gl::DEBUG_TYPE_PORTABILITY => "Portability",
        gl::DEBUG_TYPE_PERFORMANCE => "Performance",
        gl::DEBUG_TYPE_MARKER => "Marker",
        gl::DEBUG_TYPE_PUSH_GROUP => "Push Group",
        gl::DEBUG_TYPE_POP_GROUP => "Pop Group",
        gl::DEBUG_TYPE_OTHER => "Other",
        _ => "Unknown",
    }
}

fn debug_severity_name(severity: GLenum) -> &'static str {
    match severity {
        gl::DEBUG_SEVERITY_HIGH => "High",
        gl::DEBUG_SEVERITY_MEDIUM => "Medium",
        gl::DEBUG_SEVERITY_LOW => "Low",
        gl::DEBUG_SEVERITY_NOTIFICATION => "Notification",
        _ => "Unknown",
    }
}

/// Compte une occurrence du message `id` ; vrai s'il doit être logué
/// (première occurrence, puis toutes les `DEBUG_REPEAT_INTERVAL`).
fn should_log_debug_message(id: GLuint) -> bool {
    let mut counts = MESSAGE_COUNT.lock().unwrap_or_else(|e| e.into_inner());
    let count = counts.entry(id).or_insert(0);
    *count += 1;
    *count == 1 || *count % DEBUG_REPEAT_INTERVAL == 0
}

/// Callback OpenGL debug, safe pour Rust
extern "system" fn gl_debug_callback(
    source: GLenum,
    type_: GLenum,
    id: GLuint,
    severity: GLenum,
    _length: GLsizei,
    message: *const GLchar,
    _user_param: *mut c_void,
) {
    if severity == gl::DEBUG_SEVERITY_NOTIFICATION || message.is_null() {
        return;
    }
    if !should_log_debug_message(id) {
        return;
    }

    // Unsafe uniquement pour lire le C string
    let msg = unsafe { CStr::from_ptr(message).to_string_lossy() };
    warn!(
        "[OpenGL Debug] id: {:X}, source: {}, type: {}, severity: {}, message: {}",
        id,
        debug_source_name(source),
        debug_type_name(type_),
        debug_severity_name(severity),
        msg
    );
}

/// Configure le debug OpenGL via `glDebugMessageCallback`.
///
/// Sans effet si le driver n'expose pas `glDebugMessageCallback` (contexte < 4.3
/// sans `KHR_debug`) : `gl_call!` reste alors la seule source de diagnostic.
///
/// # Safety
///
/// Le contexte OpenGL doit être actif sur le thread appelant.
pub unsafe fn setup_opengl_debug() {
    if !gl::DebugMessageCallback::is_loaded() {
        info!("glDebugMessageCallback unavailable, relying on glGetError polling");
        return;
    }
    gl::Enable(gl::DEBUG_OUTPUT);
    gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);

    gl::DebugMessageCallback(Some(gl_debug_callback), std::ptr::null_mut());
    gl::DebugMessageControl(
        gl::DONT_CARE,
        gl::DONT_CARE,
        gl::DONT_CARE,
        0,
        std::ptr::null(),
        gl::TRUE,
    );
}
