use gl::types::GLenum;
use log::error;

use super::device::Device;

/// Enveloppe de diagnostic autour d'un appel GPU.
///
/// 1. vide les erreurs en attente (pour ne pas attribuer à cet appel une erreur précédente),
/// 2. exécute l'appel,
/// 3. interroge l'état d'erreur et logue code, texte de l'appel, fichier et ligne.
///
/// Les erreurs ne sont pas propagées : la frame continue ("non fatale mais suspecte").
///
/// ```ignore
/// gl_call!(device, device.bind_buffer(BufferTarget::Vertex, id));
/// ```
#[macro_export]
macro_rules! gl_call {
    ($device:expr, $call:expr) => {{
        $crate::renderer_engine::gl_check::clear_errors($device);
        let result = $call;
        $crate::renderer_engine::gl_check::log_errors($device, stringify!($call), file!(), line!());
        result
    }};
}

/// Vide l'état d'erreur du device.
pub fn clear_errors<D: Device + ?Sized>(device: &mut D) {
    while device.poll_error().is_some() {}
}

/// Logue toutes les erreurs en attente et retourne leur nombre.
pub fn log_errors<D: Device + ?Sized>(device: &mut D, call: &str, file: &str, line: u32) -> usize {
    let mut count = 0;
    while let Some(code) = device.poll_error() {
        error!(
            "[OpenGL Error] (0x{:04X} {}): {} {}:{}",
            code,
            gl_error_name(code),
            call,
            file,
            line
        );
        count += 1;
    }
    count
}

/// Nom symbolique d'un code `glGetError`.
pub fn gl_error_name(code: GLenum) -> &'static str {
    match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer_engine::device::BufferTarget;
    use crate::renderer_engine::recording_device::RecordingDevice;

    #[test]
    fn test_gl_error_name() {
        assert_eq!(gl_error_name(gl::INVALID_VALUE), "GL_INVALID_VALUE");
        assert_eq!(gl_error_name(gl::INVALID_OPERATION), "GL_INVALID_OPERATION");
        assert_eq!(gl_error_name(0xDEAD), "UNKNOWN");
    }

    #[test]
    fn test_clear_errors_drains_everything() {
        let mut device = RecordingDevice::new();
        device.inject_error(gl::INVALID_ENUM);
        device.inject_error(gl::INVALID_VALUE);

        clear_errors(&mut device);
        assert_eq!(device.poll_error(), None);
    }

    #[test]
    fn test_log_errors_counts_pending_errors() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut device = RecordingDevice::new();
        assert_eq!(log_errors(&mut device, "noop()", file!(), line!()), 0);

        device.inject_error(gl::INVALID_OPERATION);
        device.inject_error(gl::OUT_OF_MEMORY);
        assert_eq!(log_errors(&mut device, "noop()", file!(), line!()), 2);
        assert_eq!(device.poll_error(), None);
    }

    #[test]
    fn test_gl_call_ignores_stale_errors_and_returns_value() {
        let mut device = RecordingDevice::new();
        // Erreur antérieure : ne doit pas être attribuée à l'appel suivant
        device.inject_error(gl::INVALID_ENUM);

        let device = &mut device;
        let id = crate::gl_call!(device, device.create_buffer());
        assert_ne!(id, 0);
        assert_eq!(device.poll_error(), None);
    }

    #[test]
    fn test_gl_call_reports_error_raised_by_the_call() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut device = RecordingDevice::new();
        let device = &mut device;

        // Aucun buffer lié : la réécriture lève GL_INVALID_OPERATION, consommée par gl_call!
        crate::gl_call!(device, device.buffer_sub_data(BufferTarget::Vertex, 0, &[0u8; 4]));
        assert_eq!(device.poll_error(), None);
        assert_eq!(device.raised_errors(), &[gl::INVALID_OPERATION]);
    }
}
