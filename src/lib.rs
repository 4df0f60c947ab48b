//! Interactive colored cube: a fixed mesh drawn through raw GL calls and
//! rotated by dragging with the mouse or a finger.

pub mod config;
pub mod cube;
pub mod drag;
pub mod frame;
pub mod input;
pub mod logging;
pub mod session;
pub mod transform;

pub use config::{ConfigError, ViewerConfig};
pub use drag::{DragController, DragEvent, DragInputSource, RotationState};
pub use frame::{FrameOutcome, FrameRenderer, StopHandle};
pub use session::{RenderSession, SetupError};
