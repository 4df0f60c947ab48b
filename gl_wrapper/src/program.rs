use log::error;
use thiserror::Error;

use crate::context::{GraphicsContext, ShaderStage};

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    /// Compiles both stages and links them.
    ///
    /// A stage that fails to compile aborts the build before any program
    /// object exists, so nothing is ever linked from a broken stage.
    pub fn build<C: GraphicsContext>(self, ctx: &mut C) -> Result<Program, PBError> {
        let vert = compile(ctx, ShaderStage::Vertex, self.vert)?;

        let frag = match compile(ctx, ShaderStage::Fragment, self.frag) {
            Ok(frag) => frag,
            Err(e) => {
                ctx.delete_shader(vert);
                return Err(e);
            }
        };

        let program = ctx.create_program();
        ctx.attach_shader(program, vert);
        ctx.attach_shader(program, frag);
        ctx.link_program(program);

        let linked = ctx.program_linked(program);

        ctx.delete_shader(vert);
        ctx.delete_shader(frag);

        if !linked {
            let log = ctx.program_info_log(program);
            ctx.delete_program(program);

            error!("program link failed: {log}");
            return Err(PBError::Linking(log));
        }

        Ok(Program { id: program })
    }
}

fn compile<C: GraphicsContext>(
    ctx: &mut C,
    stage: ShaderStage,
    source: &str,
) -> Result<u32, PBError> {
    let shader = ctx.create_shader(stage);
    ctx.shader_source(shader, source);
    ctx.compile_shader(shader);

    if ctx.shader_compiled(shader) {
        return Ok(shader);
    }

    let log = ctx.shader_info_log(shader);
    ctx.delete_shader(shader);

    error!("{stage} shader failed to compile: {log}");
    Err(PBError::Compilation { stage, log })
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("program linking failed: {0}")]
    Linking(String),
}

#[derive(Debug)]
pub struct Program {
    id: u32,
}

impl Program {
    pub fn get_id(&self) -> u32 {
        self.id
    }

    pub fn attrib_location<C: GraphicsContext>(&self, ctx: &mut C, name: &str) -> Option<u32> {
        ctx.attrib_location(self.id, name)
    }

    pub fn uniform_location<C: GraphicsContext>(&self, ctx: &mut C, name: &str) -> Option<i32> {
        ctx.uniform_location(self.id, name)
    }

    pub fn delete<C: GraphicsContext>(self, ctx: &mut C) {
        ctx.delete_program(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Call, RecordingContext};

    const VERT: &str = "in vec3 aPosition; void main() { gl_Position = vec4(aPosition, 1.0); }";
    const FRAG: &str = "out vec4 color; void main() { color = vec4(1.0); }";

    #[test]
    fn builds_and_releases_stages() {
        let mut ctx = RecordingContext::new();

        let program = ProgramBuilder::new(VERT, FRAG).build(&mut ctx).unwrap();

        assert_eq!(ctx.count(|c| matches!(c, Call::LinkProgram(_))), 1);
        assert_eq!(ctx.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert_eq!(program.attrib_location(&mut ctx, "aPosition"), Some(0));
        assert_eq!(program.attrib_location(&mut ctx, "aNormal"), None);
    }

    #[test]
    fn syntax_error_stops_before_link() {
        let mut ctx = RecordingContext::new();

        let broken = "void main() { gl_Position = vec4(1.0; }";
        let err = ProgramBuilder::new(broken, FRAG).build(&mut ctx).unwrap_err();

        match err {
            PBError::Compilation { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }

        assert_eq!(ctx.count(|c| matches!(c, Call::CreateProgram(_))), 0);
        assert_eq!(ctx.count(|c| matches!(c, Call::LinkProgram(_))), 0);
        assert_eq!(
            ctx.count(|c| matches!(c, Call::CreateShader(ShaderStage::Fragment, _))),
            0
        );
    }

    #[test]
    fn fragment_failure_reports_stage_and_cleans_up() {
        let mut ctx = RecordingContext::new().fail_compile(ShaderStage::Fragment, "bad output");

        let err = ProgramBuilder::new(VERT, FRAG).build(&mut ctx).unwrap_err();

        assert!(matches!(
            err,
            PBError::Compilation { stage: ShaderStage::Fragment, ref log } if log == "bad output"
        ));
        assert_eq!(ctx.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert_eq!(ctx.count(|c| matches!(c, Call::CreateProgram(_))), 0);
    }

    #[test]
    fn link_failure() {
        let mut ctx = RecordingContext::new().fail_link("varying mismatch");

        let err = ProgramBuilder::new(VERT, FRAG).build(&mut ctx).unwrap_err();

        assert!(matches!(err, PBError::Linking(ref log) if log == "varying mismatch"));
        assert_eq!(ctx.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
    }
}
