//! Keyboard and mouse mapping
//!
//! Keys become `Action`s; the ones that only touch view state and speed are
//! applied here, the rest (quit, fullscreen, wireframe) need the window or the
//! renderer and are handled by the app.

use attractor_physics::{DEFAULT_SPEED, SPEED_STEP};
use attractor_renderer::TransformState;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Wireframe(bool),
    Fullscreen,
    Windowed,
    Reset,
    SpeedUp,
    SpeedDown,
}

impl Action {
    /// Unmapped keys yield `None`.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Escape => Some(Action::Quit),
            KeyCode::KeyW => Some(Action::Wireframe(true)),
            KeyCode::KeyS => Some(Action::Wireframe(false)),
            KeyCode::KeyF => Some(Action::Fullscreen),
            KeyCode::KeyN => Some(Action::Windowed),
            KeyCode::Space => Some(Action::Reset),
            KeyCode::ArrowUp => Some(Action::SpeedUp),
            KeyCode::ArrowDown => Some(Action::SpeedDown),
            _ => None,
        }
    }
}

/// View transform plus the simulation speed multiplier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    pub transform: TransformState,
    speed: f32,
}

impl Controls {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            transform: TransformState::new(width, height),
            speed: DEFAULT_SPEED,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Apply the parts of `action` that live in `Controls`. Returns whether
    /// anything here changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Reset => {
                self.transform.reset();
                self.speed = DEFAULT_SPEED;
            }
            Action::SpeedUp => self.speed += SPEED_STEP,
            Action::SpeedDown => self.speed = (self.speed - SPEED_STEP).max(0.0),
            _ => return false,
        }
        true
    }
}

/// Tracks held mouse buttons and turns cursor motion into rotation or
/// translation deltas.
#[derive(Clone, Copy, Debug, Default)]
pub struct MouseDrag {
    rotating: bool,
    translating: bool,
    last: Option<(f64, f64)>,
}

impl MouseDrag {
    pub fn button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right => self.translating = pressed,
            _ => return,
        }
        if !self.rotating && !self.translating {
            self.last = None;
        }
    }

    pub fn moved(&mut self, x: f64, y: f64, transform: &mut TransformState) {
        if let Some((last_x, last_y)) = self.last {
            let dx = (x - last_x) as f32;
            let dy = (y - last_y) as f32;
            if self.rotating {
                transform.rotate(dx, dy);
            }
            if self.translating {
                transform.translate(dx, dy);
            }
        }
        self.last = (self.rotating || self.translating).then_some((x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attractor_renderer::INCREMENT_ROT;
    use glam::Vec3;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(Action::from_key(KeyCode::Escape), Some(Action::Quit));
        assert_eq!(Action::from_key(KeyCode::KeyW), Some(Action::Wireframe(true)));
        assert_eq!(Action::from_key(KeyCode::KeyS), Some(Action::Wireframe(false)));
        assert_eq!(Action::from_key(KeyCode::KeyF), Some(Action::Fullscreen));
        assert_eq!(Action::from_key(KeyCode::KeyN), Some(Action::Windowed));
        assert_eq!(Action::from_key(KeyCode::Space), Some(Action::Reset));
        assert_eq!(Action::from_key(KeyCode::ArrowUp), Some(Action::SpeedUp));
        assert_eq!(Action::from_key(KeyCode::ArrowDown), Some(Action::SpeedDown));
        assert_eq!(Action::from_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn reset_restores_defaults_from_any_state() {
        let mut controls = Controls::new(800, 600);
        controls.transform.rotate(15.0, 30.0);
        controls.transform.translate(4.0, 2.0);
        controls.apply(Action::SpeedUp);

        for _ in 0..2 {
            assert!(controls.apply(Action::Reset));
            assert_eq!(controls.transform.spin_x_face, 0.0);
            assert_eq!(controls.transform.spin_y_face, 0.0);
            assert_eq!(controls.transform.model_pos, Vec3::ZERO);
            assert_eq!(controls.speed(), DEFAULT_SPEED);
        }
    }

    #[test]
    fn speed_never_goes_negative() {
        let mut controls = Controls::new(800, 600);
        for _ in 0..100 {
            controls.apply(Action::SpeedDown);
        }
        assert_eq!(controls.speed(), 0.0);
        controls.apply(Action::SpeedUp);
        assert!((controls.speed() - SPEED_STEP).abs() < 1e-6);
    }

    #[test]
    fn window_actions_are_not_handled_here() {
        let mut controls = Controls::new(800, 600);
        let before = controls;
        assert!(!controls.apply(Action::Quit));
        assert!(!controls.apply(Action::Fullscreen));
        assert!(!controls.apply(Action::Wireframe(true)));
        assert_eq!(controls, before);
    }

    #[test]
    fn left_drag_rotates_only_while_held() {
        let mut transform = TransformState::new(800, 600);
        let mut drag = MouseDrag::default();

        drag.moved(10.0, 10.0, &mut transform);
        drag.button(MouseButton::Left, ElementState::Pressed);
        drag.moved(10.0, 10.0, &mut transform);
        drag.moved(30.0, 14.0, &mut transform);
        assert_eq!(transform.spin_y_face, 20.0 * INCREMENT_ROT);
        assert_eq!(transform.spin_x_face, 4.0 * INCREMENT_ROT);

        drag.button(MouseButton::Left, ElementState::Released);
        drag.moved(100.0, 100.0, &mut transform);
        assert_eq!(transform.spin_y_face, 20.0 * INCREMENT_ROT);
    }

    #[test]
    fn right_drag_translates() {
        let mut transform = TransformState::new(800, 600);
        let mut drag = MouseDrag::default();
        drag.button(MouseButton::Right, ElementState::Pressed);
        drag.moved(0.0, 0.0, &mut transform);
        drag.moved(100.0, 50.0, &mut transform);
        assert!(transform.model_pos.x > 0.0);
        assert!(transform.model_pos.y < 0.0);
        assert_eq!(transform.spin_x_face, 0.0);
    }
}
