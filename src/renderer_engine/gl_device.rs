use gl::types::*;
use std::{ffi::CString, os::raw::c_void, ptr};

use super::device::{AttribPointer, BufferTarget, BufferUsage, Device};
use super::shader::describe_compile_error;

/// Device adossé au contexte OpenGL courant (chargé par `gl::load_with`).
///
/// Chaque méthode est un appel OpenGL direct ; la vérification d'erreurs est
/// faite par l'appelant via `gl_call!`.
///
/// ⚠️ Pré-requis : un contexte OpenGL 3.3 core doit être actif sur le thread
/// courant pendant toute la durée de vie de `GlDevice`.
#[derive(Debug)]
pub struct GlDevice {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl GlDevice {
    /// # Safety
    /// L'appelant doit garantir qu'un contexte OpenGL valide est actif et que
    /// les pointeurs de fonctions ont été chargés.
    pub unsafe fn new() -> Self {
        Self {
            _not_send: std::marker::PhantomData,
        }
    }
}

impl Device for GlDevice {
    fn poll_error(&mut self) -> Option<GLenum> {
        let err = unsafe { gl::GetError() };
        (err != gl::NO_ERROR).then_some(err)
    }

    fn create_buffer(&mut self) -> u32 {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: u32) {
        unsafe { gl::BindBuffer(target.gl_enum(), id) };
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        size_in_bytes: usize,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) {
        // Sans données : contenu indéfini (allocation seule)
        let data_ptr = data.map_or(ptr::null(), |d| d.as_ptr() as *const c_void);
        unsafe {
            gl::BufferData(
                target.gl_enum(),
                size_in_bytes as GLsizeiptr,
                data_ptr,
                usage.gl_enum(),
            )
        };
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        unsafe {
            gl::BufferSubData(
                target.gl_enum(),
                offset as GLintptr,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
            )
        };
    }

    fn delete_buffer(&mut self, id: u32) {
        unsafe { gl::DeleteBuffers(1, &id) };
    }

    fn create_vertex_array(&mut self) -> u32 {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        id
    }

    fn bind_vertex_array(&mut self, id: u32) {
        unsafe { gl::BindVertexArray(id) };
    }

    fn enable_vertex_attrib(&mut self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) };
    }

    fn vertex_attrib_pointer(&mut self, attrib: &AttribPointer) {
        unsafe {
            gl::VertexAttribPointer(
                attrib.index,
                attrib.count as GLint,
                attrib.ty.gl_enum(),
                if attrib.normalized { gl::TRUE } else { gl::FALSE },
                attrib.stride as GLsizei,
                attrib.offset as usize as *const c_void,
            )
        };
    }

    fn delete_vertex_array(&mut self, id: u32) {
        unsafe { gl::DeleteVertexArrays(1, &id) };
    }

    fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> u32 {
        let mut tex_id = 0;
        unsafe {
            gl::GenTextures(1, &mut tex_id);
            gl::BindTexture(gl::TEXTURE_2D, tex_id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const _,
            );

            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        tex_id
    }

    fn bind_texture_unit(&mut self, slot: u32, texture: u32) {
        // Équivalent 3.3 de glBindTextureUnit (4.5)
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + slot);
            gl::BindTexture(gl::TEXTURE_2D, texture);
        }
    }

    fn delete_texture(&mut self, id: u32) {
        unsafe { gl::DeleteTextures(1, &id) };
    }

    fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<u32, String> {
        let vs = compile_stage(vertex_src, gl::VERTEX_SHADER)?;
        let fs = match compile_stage(fragment_src, gl::FRAGMENT_SHADER) {
            Ok(fs) => fs,
            Err(e) => {
                unsafe { gl::DeleteShader(vs) };
                return Err(e);
            }
        };

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vs);
            gl::AttachShader(program, fs);
            gl::LinkProgram(program);
            gl::ValidateProgram(program);

            // Les objets intermédiaires ne sont plus utiles une fois liés
            gl::DeleteShader(vs);
            gl::DeleteShader(fs);

            let mut success = gl::FALSE as GLint;
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success != gl::TRUE as GLint {
                let mut len = 0;
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
                let mut buf = vec![0u8; len.max(1) as usize];
                gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
                gl::DeleteProgram(program);
                let log = String::from_utf8_lossy(&buf);
                return Err(format!(
                    "Shader link failed:\n{}",
                    log.trim_matches(char::from(0))
                ));
            }
            Ok(program)
        }
    }

    fn use_program(&mut self, id: u32) {
        unsafe { gl::UseProgram(id) };
    }

    fn delete_program(&mut self, id: u32) {
        unsafe { gl::DeleteProgram(id) };
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> i32 {
        match CString::new(name) {
            Ok(c_name) => unsafe { gl::GetUniformLocation(program, c_name.as_ptr()) },
            Err(_) => -1,
        }
    }

    fn uniform_1i(&mut self, location: i32, value: i32) {
        unsafe { gl::Uniform1i(location, value) };
    }

    fn uniform_1iv(&mut self, location: i32, values: &[i32]) {
        unsafe { gl::Uniform1iv(location, values.len() as GLsizei, values.as_ptr()) };
    }

    fn uniform_4f(&mut self, location: i32, value: [f32; 4]) {
        unsafe { gl::Uniform4f(location, value[0], value[1], value[2], value[3]) };
    }

    fn uniform_mat4(&mut self, location: i32, value: &[f32; 16]) {
        // glam stocke en column-major : pas de transposition
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) };
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) };
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        unsafe { gl::ClearColor(rgba[0], rgba[1], rgba[2], rgba[3]) };
    }

    fn clear(&mut self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) };
    }

    fn draw_indexed_triangles(&mut self, index_count: usize) {
        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                index_count as GLsizei,
                gl::UNSIGNED_INT,
                ptr::null(),
            )
        };
    }
}

fn compile_stage(src: &str, ty: GLenum) -> Result<u32, String> {
    let stage = if ty == gl::VERTEX_SHADER {
        "vertex"
    } else {
        "fragment"
    };
    let c_str = CString::new(src).map_err(|e| format!("CString error: {}", e))?;

    unsafe {
        let shader = gl::CreateShader(ty);
        gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
        gl::CompileShader(shader);

        let mut success = gl::FALSE as GLint;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        if success != gl::TRUE as GLint {
            let mut len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
            gl::DeleteShader(shader);

            let log_cow = String::from_utf8_lossy(&buf);
            let log = log_cow.trim_matches(char::from(0));
            return Err(describe_compile_error(stage, src, log));
        }
        Ok(shader)
    }
}
