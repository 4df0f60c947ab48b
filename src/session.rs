use cgmath::Matrix4;
use log::{debug, info};
use thiserror::Error;

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder};
use gl_wrapper::{GraphicsContext, ShaderStage};

use crate::config::ViewerConfig;
use crate::cube;
use crate::drag::{DragController, DragEvent, RotationState};
use crate::transform::{model_view, Projection};

pub const VERTEX_SHADER: &str = include_str!("gl_shaders/cube_vert.glsl");
pub const FRAGMENT_SHADER: &str = include_str!("gl_shaders/cube_frag.glsl");

pub const MODEL_VIEW_UNIFORM: &str = "uModelViewMatrix";
pub const PROJECTION_UNIFORM: &str = "uProjectionMatrix";

/// Everything a running cube viewer owns: the GPU program and mesh built once
/// at startup, plus the rotation and projection state they are drawn with.
pub struct RenderSession {
    program: Program,
    geometry: Geometry,
    model_view_location: i32,
    projection_location: i32,
    rotation: RotationState,
    drag: DragController,
    projection: Projection,
    background: [f32; 3],
    distance: f32,
    viewport: (u32, u32),
}

impl RenderSession {
    pub fn new<C: GraphicsContext>(
        ctx: &mut C,
        config: &ViewerConfig,
        width: u32,
        height: u32,
    ) -> Result<Self, SetupError> {
        Self::with_shaders(ctx, config, width, height, VERTEX_SHADER, FRAGMENT_SHADER)
    }

    /// Builds the session around custom shader sources. They must declare
    /// the `aPosition`/`aColor` inputs and both matrix uniforms.
    pub fn with_shaders<C: GraphicsContext>(
        ctx: &mut C,
        config: &ViewerConfig,
        width: u32,
        height: u32,
        vert_src: &str,
        frag_src: &str,
    ) -> Result<Self, SetupError> {
        let program = ProgramBuilder::new(vert_src, frag_src).build(ctx)?;
        debug!("shader program {} linked", program.get_id());

        let geometry = match build_cube(ctx, &program) {
            Ok(geometry) => geometry,
            Err(e) => {
                program.delete(ctx);
                return Err(e.into());
            }
        };

        let locations = (
            program.uniform_location(ctx, MODEL_VIEW_UNIFORM),
            program.uniform_location(ctx, PROJECTION_UNIFORM),
        );

        let (model_view_location, projection_location) = match locations {
            (Some(mv), Some(p)) => (mv, p),
            (mv, _) => {
                geometry.delete(ctx);
                program.delete(ctx);

                let missing = if mv.is_none() {
                    MODEL_VIEW_UNIFORM
                } else {
                    PROJECTION_UNIFORM
                };
                return Err(SetupError::MissingUniform(missing));
            }
        };

        ctx.enable_depth_test();
        ctx.viewport(width, height);

        let aspect = width as f32 / height.max(1) as f32;

        info!(
            "cube uploaded: {} vertices, {} indices",
            geometry.vertices(),
            geometry.index_count()
        );

        Ok(Self {
            program,
            geometry,
            model_view_location,
            projection_location,
            rotation: RotationState::default(),
            drag: DragController::new(config.rotation_speed),
            projection: Projection::new(config.fov_degrees, aspect, config.near, config.far),
            background: config.background,
            distance: config.distance,
            viewport: (width, height),
        })
    }

    /// Feeds one drag event to the rotation controller.
    pub fn handle_drag(&mut self, event: DragEvent) -> bool {
        self.drag.handle(event, &mut self.rotation)
    }

    /// Follows a surface resize. Zero-sized surfaces are ignored.
    pub fn resize<C: GraphicsContext>(&mut self, ctx: &mut C, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.viewport {
            return;
        }

        ctx.viewport(width, height);
        self.viewport = (width, height);

        if self.projection.set_aspect(width as f32 / height as f32) {
            debug!("resized to {width}x{height}, aspect {}", self.projection.aspect());
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    pub fn model_view(&self) -> Matrix4<f32> {
        model_view(&self.rotation, self.distance)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub(crate) fn locations(&self) -> (i32, i32) {
        (self.model_view_location, self.projection_location)
    }

    pub(crate) fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }
}

fn build_cube<C: GraphicsContext>(ctx: &mut C, program: &Program) -> Result<Geometry, GBError> {
    let geometry = GeometryBuilder::new(&cube::VERTICES)
        .with_attribute(VertexAttribute::Vec3, cube::POSITION_ATTRIBUTE)
        .with_attribute(VertexAttribute::Vec3, cube::COLOR_ATTRIBUTE)
        .with_indices(&cube::INDICES)
        .build(ctx)?;

    if let Err(e) = geometry.bind_attributes(ctx, program) {
        geometry.delete(ctx);
        return Err(e);
    }

    Ok(geometry)
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("graphics context unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {0}")]
    ShaderLink(String),
    #[error("cube geometry: {0}")]
    Geometry(#[from] GBError),
    #[error("shader program has no uniform `{0}`")]
    MissingUniform(&'static str),
}

impl From<PBError> for SetupError {
    fn from(e: PBError) -> Self {
        match e {
            PBError::Compilation { stage, log } => SetupError::ShaderCompile { stage, log },
            PBError::Linking(log) => SetupError::ShaderLink(log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gl_wrapper::recording::{Call, RecordingContext};

    fn session(ctx: &mut RecordingContext) -> RenderSession {
        RenderSession::new(ctx, &ViewerConfig::default(), 800, 600).unwrap()
    }

    #[test]
    fn setup_uploads_cube() {
        let mut ctx = RecordingContext::new();
        let s = session(&mut ctx);

        assert_eq!(s.geometry().index_count(), 36);
        assert_eq!(s.geometry().vertices(), 24);
        assert_eq!(s.geometry().stride(), 24);
        assert!(ctx.calls.contains(&Call::EnableDepthTest));
        assert!(ctx.calls.contains(&Call::Viewport(800, 600)));
        assert_eq!(ctx.count(|c| matches!(c, Call::EnableVertexAttribArray(_))), 2);
        assert_eq!(s.rotation(), RotationState::default());
        assert!((s.projection().aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn compile_error_is_terminal() {
        let mut ctx = RecordingContext::new();

        let err = RenderSession::with_shaders(
            &mut ctx,
            &ViewerConfig::default(),
            800,
            600,
            "void main() { gl_Position = ; ",
            FRAGMENT_SHADER,
        )
        .err()
        .unwrap();

        assert!(matches!(
            err,
            SetupError::ShaderCompile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert_eq!(ctx.count(|c| matches!(c, Call::LinkProgram(_))), 0);
        assert_eq!(ctx.count(|c| matches!(c, Call::CreateBuffer(_))), 0);
        assert_eq!(ctx.draw_calls(), 0);
    }

    #[test]
    fn link_error() {
        let mut ctx = RecordingContext::new().fail_link("unresolved vColor");

        let err = RenderSession::new(&mut ctx, &ViewerConfig::default(), 1, 1)
            .err()
            .unwrap();

        assert!(matches!(err, SetupError::ShaderLink(log) if log == "unresolved vColor"));
    }

    #[test]
    fn missing_uniform_releases_resources() {
        let mut ctx = RecordingContext::new();
        let vert = VERTEX_SHADER.replace("uProjectionMatrix", "uProj");

        let err = RenderSession::with_shaders(
            &mut ctx,
            &ViewerConfig::default(),
            640,
            480,
            &vert,
            FRAGMENT_SHADER,
        )
        .err()
        .unwrap();

        assert!(matches!(err, SetupError::MissingUniform(PROJECTION_UNIFORM)));
        assert_eq!(ctx.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
        assert_eq!(ctx.count(|c| matches!(c, Call::DeleteBuffer(_))), 2);
    }

    #[test]
    fn missing_attribute() {
        let mut ctx = RecordingContext::new();
        let vert = VERTEX_SHADER.replace("aColor", "aTint");

        let err = RenderSession::with_shaders(
            &mut ctx,
            &ViewerConfig::default(),
            640,
            480,
            &vert,
            FRAGMENT_SHADER,
        )
        .err()
        .unwrap();

        assert!(matches!(
            err,
            SetupError::Geometry(GBError::MissingAttribute(name)) if name == "aColor"
        ));
        assert_eq!(ctx.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
    }

    #[test]
    fn resize_updates_projection() {
        let mut ctx = RecordingContext::new();
        let mut s = session(&mut ctx);
        s.projection_mut().take_if_dirty();

        s.resize(&mut ctx, 1000, 500);
        assert_eq!(s.viewport(), (1000, 500));
        assert!(ctx.calls.contains(&Call::Viewport(1000, 500)));
        assert!(s.projection().is_dirty());
        assert_eq!(s.projection().aspect(), 2.0);

        ctx.clear_calls();
        s.projection_mut().take_if_dirty();
        s.resize(&mut ctx, 1000, 500);
        s.resize(&mut ctx, 0, 500);
        assert!(ctx.calls.is_empty());
        assert!(!s.projection().is_dirty());
    }

    #[test]
    fn drag_rotates() {
        let mut ctx = RecordingContext::new();
        let mut s = session(&mut ctx);

        s.handle_drag(DragEvent::Start { x: 100.0, y: 100.0 });
        assert!(s.is_dragging());
        s.handle_drag(DragEvent::Move { x: 150.0, y: 130.0 });
        s.handle_drag(DragEvent::End);
        s.handle_drag(DragEvent::Move { x: 900.0, y: 900.0 });

        let r = s.rotation();
        assert!((r.about_x - 0.15).abs() < 1e-6);
        assert!((r.about_y - 0.25).abs() < 1e-6);
    }
}
