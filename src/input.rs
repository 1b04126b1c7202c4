use winit::keyboard::KeyCode;

use crate::camera::Camera;

/// Camera movement requested by one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Forward,
    Backward,
}

/// Per-event increments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub turn: f32, // radians
    pub step: f32, // grid units
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            turn: 0.1,
            step: 0.1,
        }
    }
}

impl Action {
    /// Arrow keys, with WASD as aliases.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(Action::TurnLeft),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(Action::TurnRight),
            KeyCode::ArrowUp | KeyCode::KeyW => Some(Action::Forward),
            KeyCode::ArrowDown | KeyCode::KeyS => Some(Action::Backward),
            _ => None,
        }
    }

    pub fn apply(self, camera: &mut Camera, motion: &Motion) {
        match self {
            Action::TurnLeft => camera.rotate(-motion.turn),
            Action::TurnRight => camera.rotate(motion.turn),
            Action::Forward => camera.advance(motion.step),
            Action::Backward => camera.advance(-motion.step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn key_mapping() {
        assert_eq!(Action::from_key(KeyCode::ArrowLeft), Some(Action::TurnLeft));
        assert_eq!(Action::from_key(KeyCode::KeyD), Some(Action::TurnRight));
        assert_eq!(Action::from_key(KeyCode::ArrowUp), Some(Action::Forward));
        assert_eq!(Action::from_key(KeyCode::KeyS), Some(Action::Backward));
        assert_eq!(Action::from_key(KeyCode::Space), None);
    }

    #[test]
    fn turning_adjusts_heading_only() {
        let mut cam = Camera::default();
        let motion = Motion::default();
        Action::TurnRight.apply(&mut cam, &motion);
        Action::TurnRight.apply(&mut cam, &motion);
        Action::TurnLeft.apply(&mut cam, &motion);
        assert!((cam.dir - 0.1).abs() < EPS);
        assert_eq!(cam.pos, [1.0, 1.0]);
    }

    #[test]
    fn forward_then_backward_returns_home() {
        let mut cam = Camera {
            dir: 0.7,
            ..Camera::default()
        };
        let motion = Motion::default();
        Action::Forward.apply(&mut cam, &motion);
        let expected = [1.0 + 0.1 * 0.7f32.cos(), 1.0 + 0.1 * 0.7f32.sin()];
        assert!((cam.pos[0] - expected[0]).abs() < EPS);
        assert!((cam.pos[1] - expected[1]).abs() < EPS);

        Action::Backward.apply(&mut cam, &motion);
        assert!((cam.pos[0] - 1.0).abs() < EPS);
        assert!((cam.pos[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn no_collision_checks() {
        let mut cam = Camera::default();
        let motion = Motion {
            turn: 0.1,
            step: 5.0,
        };
        Action::Forward.apply(&mut cam, &motion);
        assert!((cam.pos[0] - 6.0).abs() < EPS);
    }
}
