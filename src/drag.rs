use log::trace;

/// Radians of rotation per pixel dragged.
pub const DEFAULT_ROTATION_SPEED: f32 = 0.005;

/// Accumulated rotation in radians. Angles are never wrapped.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RotationState {
    pub about_x: f32,
    pub about_y: f32,
}

/// Platform-independent drag input, in window pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DragEvent {
    Start { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    End,
}

/// Something that turns raw host events into [`DragEvent`]s.
///
/// Implemented once per input kind (mouse, touch, ...). Events the source
/// does not care about translate to `None`.
pub trait DragInputSource<E> {
    fn translate(&mut self, event: &E) -> Option<DragEvent>;
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum DragState {
    Idle,
    Dragging { anchor: (f64, f64) },
}

/// Turns drag events into rotation.
///
/// Each move applies only the delta since the previous event, so the total
/// rotation does not depend on how the host batches pointer motion. Releasing
/// freezes the rotation where it is.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    speed: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_SPEED)
    }
}

impl DragController {
    pub fn new(speed: f32) -> Self {
        Self {
            state: DragState::Idle,
            speed,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Applies one event. Returns whether `rotation` changed.
    pub fn handle(&mut self, event: DragEvent, rotation: &mut RotationState) -> bool {
        match (self.state, event) {
            (_, DragEvent::Start { x, y }) => {
                trace!("drag start at ({x}, {y})");
                self.state = DragState::Dragging { anchor: (x, y) };
                false
            }
            (DragState::Dragging { anchor }, DragEvent::Move { x, y }) => {
                let delta = (x - anchor.0, y - anchor.1);

                rotation.about_y += delta.0 as f32 * self.speed;
                rotation.about_x += delta.1 as f32 * self.speed;

                self.state = DragState::Dragging { anchor: (x, y) };

                delta != (0.0, 0.0)
            }
            (DragState::Idle, DragEvent::Move { .. }) => false,
            (_, DragEvent::End) => {
                if self.is_dragging() {
                    trace!("drag end at {rotation:?}");
                }
                self.state = DragState::Idle;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn drive(controller: &mut DragController, events: &[DragEvent]) -> RotationState {
        let mut rotation = RotationState::default();
        for e in events {
            controller.handle(*e, &mut rotation);
        }
        rotation
    }

    #[test]
    fn single_move() {
        let mut c = DragController::default();

        let r = drive(
            &mut c,
            &[
                DragEvent::Start { x: 100.0, y: 100.0 },
                DragEvent::Move { x: 150.0, y: 130.0 },
                DragEvent::End,
            ],
        );

        assert_relative_eq!(r.about_x, 0.15, epsilon = 1e-6);
        assert_relative_eq!(r.about_y, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn batching_does_not_matter() {
        let coarse = drive(
            &mut DragController::default(),
            &[
                DragEvent::Start { x: 10.0, y: 10.0 },
                DragEvent::Move { x: 70.0, y: -20.0 },
            ],
        );

        let mut fine_events = vec![DragEvent::Start { x: 10.0, y: 10.0 }];
        for i in 1..=30 {
            fine_events.push(DragEvent::Move {
                x: 10.0 + 2.0 * i as f64,
                y: 10.0 - i as f64,
            });
        }
        let fine = drive(&mut DragController::default(), &fine_events);

        assert_relative_eq!(coarse.about_x, fine.about_x, epsilon = 1e-5);
        assert_relative_eq!(coarse.about_y, fine.about_y, epsilon = 1e-5);
    }

    #[test]
    fn back_and_forth_cancels() {
        let r = drive(
            &mut DragController::default(),
            &[
                DragEvent::Start { x: 0.0, y: 0.0 },
                DragEvent::Move { x: 40.0, y: 25.0 },
                DragEvent::Move { x: 0.0, y: 0.0 },
            ],
        );

        assert_relative_eq!(r.about_x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.about_y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn idle_ignores_moves() {
        let mut c = DragController::default();
        let mut rotation = RotationState::default();

        assert!(!c.handle(DragEvent::Move { x: 5.0, y: 5.0 }, &mut rotation));

        c.handle(DragEvent::Start { x: 0.0, y: 0.0 }, &mut rotation);
        assert!(c.handle(DragEvent::Move { x: 10.0, y: 0.0 }, &mut rotation));
        c.handle(DragEvent::End, &mut rotation);
        let frozen = rotation;

        assert!(!c.is_dragging());
        assert!(!c.handle(DragEvent::Move { x: 500.0, y: 500.0 }, &mut rotation));
        assert_eq!(rotation, frozen);
    }

    #[test]
    fn new_drag_uses_new_anchor() {
        let mut c = DragController::default();
        let mut rotation = RotationState::default();

        c.handle(DragEvent::Start { x: 0.0, y: 0.0 }, &mut rotation);
        c.handle(DragEvent::Move { x: 20.0, y: 0.0 }, &mut rotation);
        c.handle(DragEvent::End, &mut rotation);

        // the jump from 20 to 300 between drags is not rotation
        c.handle(DragEvent::Start { x: 300.0, y: 0.0 }, &mut rotation);
        c.handle(DragEvent::Move { x: 320.0, y: 0.0 }, &mut rotation);

        assert_relative_eq!(rotation.about_y, 40.0 * DEFAULT_ROTATION_SPEED, epsilon = 1e-6);
    }

    #[test]
    fn custom_speed() {
        let r = drive(
            &mut DragController::new(0.01),
            &[
                DragEvent::Start { x: 0.0, y: 0.0 },
                DragEvent::Move { x: 0.0, y: 100.0 },
            ],
        );

        assert_relative_eq!(r.about_x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(r.about_y, 0.0, epsilon = 1e-6);
    }
}
