use glam::{Vec2, Vec3};

/// Camera orientation used to turn move/strafe factors into world directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl CameraBasis {
    pub fn new(forward: Vec3, right: Vec3) -> Self {
        Self { forward, right }
    }

    /// Basis for a camera rotated by `yaw` radians about +Z, looking along +Y at zero yaw.
    pub fn from_yaw(yaw: f32) -> Self {
        let (s, c) = yaw.sin_cos();
        Self {
            forward: Vec3::new(-s, c, 0.0),
            right: Vec3::new(c, s, 0.0),
        }
    }
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::from_yaw(0.0)
    }
}

/// Per-tick intent from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementIntent {
    /// x = strafe right, y = forwards; signed magnitudes.
    pub move_axis: Vec2,
    /// Fly-up factor; only used in fly mode.
    pub vertical: f32,
    pub run: bool,
    pub jump: bool,
}

/// Desired velocity contributions collected between two updates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementInput {
    desired_velocity: Vec3,
    run_modifier: bool,
}

impl MovementInput {
    pub fn add(&mut self, contribution: Vec3, run: bool) {
        self.desired_velocity += contribution;
        self.run_modifier = run;
    }

    pub fn desired_velocity(&self) -> Vec3 {
        self.desired_velocity
    }

    pub fn run_modifier(&self) -> bool {
        self.run_modifier
    }

    pub fn is_nonzero(&self) -> bool {
        self.desired_velocity.length_squared() != 0.0
    }

    /// Consume the accumulated velocity and reset the accumulator.
    pub fn take(&mut self) -> Vec3 {
        std::mem::take(&mut self.desired_velocity)
    }

    pub fn clear(&mut self) {
        self.desired_velocity = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_until_taken() {
        let mut input = MovementInput::default();
        input.add(Vec3::new(1.0, 0.0, 0.0), false);
        input.add(Vec3::new(0.0, 2.0, 0.0), true);
        assert!(input.run_modifier());
        assert_eq!(input.take(), Vec3::new(1.0, 2.0, 0.0));
        assert!(!input.is_nonzero());
        assert_eq!(input.take(), Vec3::ZERO);
    }

    #[test]
    fn test_basis_from_yaw() {
        let basis = CameraBasis::from_yaw(std::f32::consts::FRAC_PI_2);
        assert!((basis.forward - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((basis.right - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
        assert!(basis.forward.dot(basis.right).abs() < 1e-6);
    }
}
