pub mod context;
pub mod geometry;
pub mod program;
#[cfg(any(test, feature = "test-util"))]
pub mod recording;
pub mod renderer;

pub use context::{BufferTarget, GlContext, GraphicsContext, ShaderStage};
