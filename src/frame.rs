use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};

use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::GraphicsContext;

use crate::session::RenderSession;

/// Cloneable flag a host sets to stop the frame loop. It is checked before
/// anything is drawn, so no frame is started after `stop` returns.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stopped,
}

pub struct FrameRenderer {
    renderer: GlRenderer,
    stop: StopHandle,
    frames: u64,
}

impl FrameRenderer {
    pub fn new(stop: StopHandle) -> Self {
        Self {
            renderer: GlRenderer::new(),
            stop,
            frames: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws one frame with the session's current state.
    pub fn tick<C: GraphicsContext>(
        &mut self,
        ctx: &mut C,
        session: &mut RenderSession,
    ) -> FrameOutcome {
        if self.stop.is_stopped() {
            return FrameOutcome::Stopped;
        }

        let [r, g, b] = session.background();
        self.renderer.clear_color(ctx, r, g, b);
        self.renderer.use_program(ctx, session.program());

        let (model_view_location, projection_location) = session.locations();

        let model_view = session.model_view();
        let model_view: &[f32; 16] = model_view.as_ref();
        ctx.uniform_matrix4(model_view_location, model_view);

        if let Some(projection) = session.projection_mut().take_if_dirty() {
            trace!("projection re-uploaded");
            let projection: &[f32; 16] = projection.as_ref();
            ctx.uniform_matrix4(projection_location, projection);
        }

        self.renderer.draw_indexed(ctx, session.geometry(), session.program());
        self.frames += 1;

        FrameOutcome::Continue
    }

    /// Draws frames until the stop flag is set or `next_frame` returns
    /// `false`. `next_frame` runs between frames and is where a host pumps
    /// input and presents. Returns the number of frames drawn.
    pub fn run<C, F>(
        &mut self,
        ctx: &mut C,
        session: &mut RenderSession,
        mut next_frame: F,
    ) -> u64
    where
        C: GraphicsContext,
        F: FnMut(&mut C, &mut RenderSession) -> bool,
    {
        let start = self.frames;

        while self.tick(ctx, session) == FrameOutcome::Continue {
            if !next_frame(ctx, session) {
                break;
            }
        }

        debug!("frame loop ended after {} frames", self.frames - start);

        self.frames - start
    }
}
