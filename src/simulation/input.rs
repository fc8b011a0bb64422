//! Normalized player input
//!
//! Input devices live outside the simulation; what arrives here each tick
//! is direction key flags and/or a joystick vector already scaled to
//! [-1, 1] per axis. The two combine into one intent vector: the joystick
//! wins whenever it is deflected, and the result is clamped to unit
//! length so diagonal key presses never outrun a single axis.

use crate::core::types::Vec2;

/// One tick of player input
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer/joystick deflection, each axis in [-1, 1]; zero when idle
    pub joystick: Vec2,
}

impl InputFrame {
    /// No input at all
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn keys(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
            ..Self::default()
        }
    }

    /// Combined movement intent, magnitude <= 1
    pub fn intent(&self) -> Vec2 {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.up {
            dy -= 1.0;
        }
        if self.down {
            dy += 1.0;
        }
        if self.left {
            dx -= 1.0;
        }
        if self.right {
            dx += 1.0;
        }

        if self.joystick.x != 0.0 || self.joystick.y != 0.0 {
            dx = self.joystick.x;
            dy = self.joystick.y;
        }

        let len = (dx * dx + dy * dy).sqrt();
        if len > 1.0 {
            Vec2::new(dx / len, dy / len)
        } else {
            Vec2::new(dx, dy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_key() {
        let intent = InputFrame::keys(false, false, false, true).intent();
        assert_eq!(intent, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let intent = InputFrame::keys(true, true, false, false).intent();
        assert_eq!(intent, Vec2::default());
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let intent = InputFrame::keys(true, false, false, true).intent();
        assert!((intent.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_joystick_not_scaled_up() {
        let mut frame = InputFrame::neutral();
        frame.joystick = Vec2::new(0.3, 0.0);
        assert_eq!(frame.intent(), Vec2::new(0.3, 0.0));
    }

    #[test]
    fn test_joystick_overrides_keys() {
        let mut frame = InputFrame::keys(false, false, true, false);
        frame.joystick = Vec2::new(0.5, 0.5);
        assert_eq!(frame.intent(), Vec2::new(0.5, 0.5));
    }
}
