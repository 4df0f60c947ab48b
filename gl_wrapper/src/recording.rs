//! In-memory [`GraphicsContext`] for tests.
//!
//! Every call that changes GL state is appended to
//! [`RecordingContext::calls`]; queries are not recorded. Shader compilation
//! fails when a stage was marked with [`RecordingContext::fail_compile`] or when
//! the source has unbalanced brackets; linking fails when
//! [`RecordingContext::fail_link`] was set. Attribute and uniform lookups
//! succeed for any identifier that appears in an attached shader's source.

use std::collections::HashMap;

use crate::context::{BufferTarget, GraphicsContext, ShaderStage};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(u32),
    DeleteProgram(u32),
    UniformMatrix4(i32, [f32; 16]),
    CreateVertexArray(u32),
    BindVertexArray(u32),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(BufferTarget, u32),
    BufferData(BufferTarget, Vec<u8>),
    DeleteBuffer(u32),
    VertexAttribPointer {
        index: u32,
        components: i32,
        stride: i32,
        offset: usize,
    },
    EnableVertexAttribArray(u32),
    Viewport(u32, u32),
    EnableDepthTest,
    Clear([f32; 4]),
    DrawElements(i32),
}

#[derive(Default)]
pub struct RecordingContext {
    pub calls: Vec<Call>,
    next_id: u32,
    shaders: HashMap<u32, (ShaderStage, String)>,
    attached: HashMap<u32, Vec<u32>>,
    locations: HashMap<(u32, String), i32>,
    compile_failure: Option<(ShaderStage, String)>,
    link_failure: Option<String>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_compile(mut self, stage: ShaderStage, log: &str) -> Self {
        self.compile_failure = Some((stage, log.to_string()));
        self
    }

    pub fn fail_link(mut self, log: &str) -> Self {
        self.link_failure = Some(log.to_string());
        self
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(*c)).count()
    }

    pub fn draw_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::DrawElements(_)))
    }

    /// Matrices uploaded to `location`, oldest first.
    pub fn matrix_uploads(&self, location: i32) -> Vec<[f32; 16]> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::UniformMatrix4(l, m) if *l == location => Some(*m),
                _ => None,
            })
            .collect()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn lookup(&mut self, program: u32, name: &str) -> Option<i32> {
        let key = (program, name.to_string());
        if let Some(loc) = self.locations.get(&key) {
            return Some(*loc);
        }

        let declared = self
            .attached
            .get(&program)?
            .iter()
            .filter_map(|s| self.shaders.get(s))
            .any(|(_, src)| declares(src, name));

        if !declared {
            return None;
        }

        let loc = self.locations.keys().filter(|(p, _)| *p == program).count() as i32;
        self.locations.insert(key, loc);

        Some(loc)
    }
}

fn declares(source: &str, name: &str) -> bool {
    source
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|token| token == name)
}

fn balanced(source: &str) -> bool {
    let mut stack = Vec::new();

    for c in source.chars() {
        match c {
            '{' | '(' | '[' => stack.push(c),
            '}' | ')' | ']' => {
                let open = match c {
                    '}' => '{',
                    ')' => '(',
                    _ => '[',
                };
                if stack.pop() != Some(open) {
                    return false;
                }
            }
            _ => {}
        }
    }

    stack.is_empty()
}

impl GraphicsContext for RecordingContext {
    fn create_shader(&mut self, stage: ShaderStage) -> u32 {
        let id = self.next();
        self.shaders.insert(id, (stage, String::new()));
        self.calls.push(Call::CreateShader(stage, id));
        id
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        if let Some(entry) = self.shaders.get_mut(&shader) {
            entry.1 = source.to_string();
        }
        self.calls.push(Call::ShaderSource(shader));
    }

    fn compile_shader(&mut self, shader: u32) {
        self.calls.push(Call::CompileShader(shader));
    }

    fn shader_compiled(&mut self, shader: u32) -> bool {
        match self.shaders.get(&shader) {
            Some((stage, src)) => {
                let forced = matches!(&self.compile_failure, Some((s, _)) if s == stage);
                !forced && balanced(src)
            }
            None => false,
        }
    }

    fn shader_info_log(&mut self, shader: u32) -> String {
        match (self.shaders.get(&shader), &self.compile_failure) {
            (Some((stage, _)), Some((s, log))) if s == stage => log.clone(),
            (Some(_), _) => String::from("ERROR: 0:1: syntax error"),
            (None, _) => String::new(),
        }
    }

    fn delete_shader(&mut self, shader: u32) {
        self.calls.push(Call::DeleteShader(shader));
    }

    fn create_program(&mut self) -> u32 {
        let id = self.next();
        self.attached.insert(id, Vec::new());
        self.calls.push(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        self.attached.entry(program).or_default().push(shader);
        self.calls.push(Call::AttachShader(program, shader));
    }

    fn link_program(&mut self, program: u32) {
        self.calls.push(Call::LinkProgram(program));
    }

    fn program_linked(&mut self, program: u32) -> bool {
        self.link_failure.is_none() && self.attached.contains_key(&program)
    }

    fn program_info_log(&mut self, _program: u32) -> String {
        self.link_failure.clone().unwrap_or_default()
    }

    fn use_program(&mut self, program: u32) {
        self.calls.push(Call::UseProgram(program));
    }

    fn delete_program(&mut self, program: u32) {
        self.calls.push(Call::DeleteProgram(program));
    }

    fn attrib_location(&mut self, program: u32, name: &str) -> Option<u32> {
        self.lookup(program, name).map(|l| l as u32)
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> Option<i32> {
        self.lookup(program, name)
    }

    fn uniform_matrix4(&mut self, location: i32, matrix: &[f32; 16]) {
        self.calls.push(Call::UniformMatrix4(location, *matrix));
    }

    fn create_vertex_array(&mut self) -> u32 {
        let id = self.next();
        self.calls.push(Call::CreateVertexArray(id));
        id
    }

    fn bind_vertex_array(&mut self, vao: u32) {
        self.calls.push(Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&mut self, vao: u32) {
        self.calls.push(Call::DeleteVertexArray(vao));
    }

    fn create_buffer(&mut self) -> u32 {
        let id = self.next();
        self.calls.push(Call::CreateBuffer(id));
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: u32) {
        self.calls.push(Call::BindBuffer(target, buffer));
    }

    fn buffer_data_static(&mut self, target: BufferTarget, data: &[u8]) {
        self.calls.push(Call::BufferData(target, data.to_vec()));
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer(&mut self, index: u32, components: i32, stride: i32, offset: usize) {
        self.calls.push(Call::VertexAttribPointer {
            index,
            components,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.calls.push(Call::EnableVertexAttribArray(index));
    }

    fn viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn enable_depth_test(&mut self) {
        self.calls.push(Call::EnableDepthTest);
    }

    fn clear(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.calls.push(Call::Clear([r, g, b, a]));
    }

    fn draw_elements_u16(&mut self, count: i32) {
        self.calls.push(Call::DrawElements(count));
    }
}
