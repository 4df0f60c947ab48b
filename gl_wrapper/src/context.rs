use std::ffi::{c_char, c_void, CString};

use gl::types::{GLchar, GLint, GLsizei, GLuint};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferTarget {
    Vertex,
    Index,
}

/// Primitive operations of a GL-like graphics API.
///
/// Object names are plain `u32` handles, `0` meaning "none". Everything above
/// this trait is written against it, so the pipeline can be driven by a real
/// context or by [`crate::recording::RecordingContext`].
pub trait GraphicsContext {
    fn create_shader(&mut self, stage: ShaderStage) -> u32;
    fn shader_source(&mut self, shader: u32, source: &str);
    fn compile_shader(&mut self, shader: u32);
    fn shader_compiled(&mut self, shader: u32) -> bool;
    fn shader_info_log(&mut self, shader: u32) -> String;
    fn delete_shader(&mut self, shader: u32);

    fn create_program(&mut self) -> u32;
    fn attach_shader(&mut self, program: u32, shader: u32);
    fn link_program(&mut self, program: u32);
    fn program_linked(&mut self, program: u32) -> bool;
    fn program_info_log(&mut self, program: u32) -> String;
    fn use_program(&mut self, program: u32);
    fn delete_program(&mut self, program: u32);

    fn attrib_location(&mut self, program: u32, name: &str) -> Option<u32>;
    fn uniform_location(&mut self, program: u32, name: &str) -> Option<i32>;
    /// Uploads a column-major 4x4 matrix to the currently used program.
    fn uniform_matrix4(&mut self, location: i32, matrix: &[f32; 16]);

    fn create_vertex_array(&mut self) -> u32;
    fn bind_vertex_array(&mut self, vao: u32);
    fn delete_vertex_array(&mut self, vao: u32);

    fn create_buffer(&mut self) -> u32;
    fn bind_buffer(&mut self, target: BufferTarget, buffer: u32);
    /// Uploads `data` into the buffer bound to `target` with static usage.
    fn buffer_data_static(&mut self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&mut self, buffer: u32);

    /// Float attribute pointer into the bound vertex buffer. `stride` and
    /// `offset` are in bytes.
    fn vertex_attrib_pointer(&mut self, index: u32, components: i32, stride: i32, offset: usize);
    fn enable_vertex_attrib_array(&mut self, index: u32);

    fn viewport(&mut self, width: u32, height: u32);
    fn enable_depth_test(&mut self);
    fn clear(&mut self, r: f32, g: f32, b: f32, a: f32);
    /// Triangle list over `count` `u16` indices of the bound index buffer.
    fn draw_elements_u16(&mut self, count: i32);
}

/// [`GraphicsContext`] backed by the global `gl` function pointers.
pub struct GlContext {
    _loaded: (),
}

impl GlContext {
    /// Loads the GL function pointers. The context they belong to must be
    /// current on this thread for as long as the returned value is used.
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        Self { _loaded: () }
    }

    pub fn version(&self) -> String {
        unsafe {
            let ptr = gl::GetString(gl::VERSION);
            if ptr.is_null() {
                return String::from("unknown");
            }

            std::ffi::CStr::from_ptr(ptr as *const c_char)
                .to_string_lossy()
                .into_owned()
        }
    }
}

fn trim_log(buf: &[u8]) -> String {
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

impl GraphicsContext for GlContext {
    fn create_shader(&mut self, stage: ShaderStage) -> u32 {
        let kind = match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        };

        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;

        unsafe {
            gl::ShaderSource(shader, 1, &ptr as *const *const GLchar, &len as *const GLint);
        }
    }

    fn compile_shader(&mut self, shader: u32) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compiled(&mut self, shader: u32) -> bool {
        let mut success: GLint = 0;

        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut GLint);
        }

        success == gl::TRUE as GLint
    }

    fn shader_info_log(&mut self, shader: u32) -> String {
        let mut len: GLint = 0;

        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);

            let mut buf = vec![0_u8; len.max(1) as usize];
            gl::GetShaderInfoLog(
                shader,
                buf.len() as GLsizei,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );

            trim_log(&buf)
        }
    }

    fn delete_shader(&mut self, shader: u32) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&mut self) -> u32 {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&mut self, program: u32) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_linked(&mut self, program: u32) -> bool {
        let mut success: GLint = 0;

        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut GLint);
        }

        success == gl::TRUE as GLint
    }

    fn program_info_log(&mut self, program: u32) -> String {
        let mut len: GLint = 0;

        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);

            let mut buf = vec![0_u8; len.max(1) as usize];
            gl::GetProgramInfoLog(
                program,
                buf.len() as GLsizei,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );

            trim_log(&buf)
        }
    }

    fn use_program(&mut self, program: u32) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&mut self, program: u32) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn attrib_location(&mut self, program: u32, name: &str) -> Option<u32> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetAttribLocation(program, name.as_ptr()) };

        u32::try_from(location).ok()
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> Option<i32> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr()) };

        (location >= 0).then_some(location)
    }

    fn uniform_matrix4(&mut self, location: i32, matrix: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, matrix.as_ptr()) }
    }

    fn create_vertex_array(&mut self) -> u32 {
        let mut vao = 0;

        unsafe { gl::GenVertexArrays(1, (&mut vao) as *mut GLuint) };

        vao
    }

    fn bind_vertex_array(&mut self, vao: u32) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn delete_vertex_array(&mut self, vao: u32) {
        unsafe { gl::DeleteVertexArrays(1, (&vao) as *const GLuint) }
    }

    fn create_buffer(&mut self) -> u32 {
        let mut vbo = 0;

        unsafe { gl::GenBuffers(1, (&mut vbo) as *mut GLuint) };

        vbo
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: u32) {
        unsafe { gl::BindBuffer(gl_target(target), buffer) }
    }

    fn buffer_data_static(&mut self, target: BufferTarget, data: &[u8]) {
        unsafe {
            gl::BufferData(
                gl_target(target),
                data.len() as isize,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&mut self, buffer: u32) {
        unsafe { gl::DeleteBuffers(1, (&buffer) as *const GLuint) }
    }

    fn vertex_attrib_pointer(&mut self, index: u32, components: i32, stride: i32, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                components,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn viewport(&mut self, width: u32, height: u32) {
        unsafe { gl::Viewport(0, 0, width as i32, height as i32) }
    }

    fn enable_depth_test(&mut self) {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::DepthFunc(gl::LEQUAL);
        }
    }

    fn clear(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::ClearDepth(1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    fn draw_elements_u16(&mut self, count: i32) {
        unsafe {
            gl::DrawElements(gl::TRIANGLES, count, gl::UNSIGNED_SHORT, std::ptr::null());
        }
    }
}

fn gl_target(target: BufferTarget) -> gl::types::GLenum {
    match target {
        BufferTarget::Vertex => gl::ARRAY_BUFFER,
        BufferTarget::Index => gl::ELEMENT_ARRAY_BUFFER,
    }
}
