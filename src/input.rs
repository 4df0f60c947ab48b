//! winit implementations of [`DragInputSource`].

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

use crate::drag::{DragEvent, DragInputSource};

/// Left-button mouse drags.
///
/// Button events carry no coordinates, so the last cursor position is kept
/// to anchor the drag. A press before the cursor position is known starts
/// the drag at the first reported position instead.
#[derive(Debug, Default)]
pub struct MouseDrag {
    cursor: Option<PhysicalPosition<f64>>,
    pressed: bool,
    started: bool,
}

impl MouseDrag {
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn release(&mut self) -> Option<DragEvent> {
        self.pressed = false;
        std::mem::take(&mut self.started).then_some(DragEvent::End)
    }
}

impl<'a> DragInputSource<WindowEvent<'a>> for MouseDrag {
    fn translate(&mut self, event: &WindowEvent<'a>) -> Option<DragEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(*position);
                let (x, y) = (position.x, position.y);

                match (self.pressed, self.started) {
                    (false, _) => None,
                    (true, true) => Some(DragEvent::Move { x, y }),
                    (true, false) => {
                        self.started = true;
                        Some(DragEvent::Start { x, y })
                    }
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.pressed = true;
                    let cursor = self.cursor?;
                    self.started = true;

                    Some(DragEvent::Start {
                        x: cursor.x,
                        y: cursor.y,
                    })
                }
                ElementState::Released => self.release(),
            },
            // the release would never arrive
            WindowEvent::Focused(false) => self.release(),
            _ => None,
        }
    }
}

/// Single-finger touch drags. Only the first finger down is followed; others
/// are ignored until it lifts.
#[derive(Debug, Default)]
pub struct TouchDrag {
    finger: Option<u64>,
}

impl TouchDrag {
    pub fn is_dragging(&self) -> bool {
        self.finger.is_some()
    }

    fn touch(&mut self, touch: &Touch) -> Option<DragEvent> {
        let (x, y) = (touch.location.x, touch.location.y);

        match touch.phase {
            TouchPhase::Started if self.finger.is_none() => {
                self.finger = Some(touch.id);
                Some(DragEvent::Start { x, y })
            }
            TouchPhase::Moved if self.finger == Some(touch.id) => Some(DragEvent::Move { x, y }),
            TouchPhase::Ended | TouchPhase::Cancelled if self.finger == Some(touch.id) => {
                self.finger = None;
                Some(DragEvent::End)
            }
            _ => None,
        }
    }
}

impl<'a> DragInputSource<WindowEvent<'a>> for TouchDrag {
    fn translate(&mut self, event: &WindowEvent<'a>) -> Option<DragEvent> {
        match event {
            WindowEvent::Touch(touch) => self.touch(touch),
            _ => None,
        }
    }
}

/// Mouse and touch together. Whichever starts first owns the drag; events of
/// the other kind are dropped until it ends.
#[derive(Debug, Default)]
pub struct WindowDragInput {
    mouse: MouseDrag,
    touch: TouchDrag,
}

impl<'a> DragInputSource<WindowEvent<'a>> for WindowDragInput {
    fn translate(&mut self, event: &WindowEvent<'a>) -> Option<DragEvent> {
        match event {
            WindowEvent::Touch(_) if self.mouse.is_pressed() => None,
            WindowEvent::Touch(_) => self.touch.translate(event),
            WindowEvent::MouseInput { .. } if self.touch.is_dragging() => None,
            _ => self.mouse.translate(event),
        }
    }
}
