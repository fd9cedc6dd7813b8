use glam::Vec3;

use crate::collision::{LayerMask, ObjectLayer};

/// Tuning for the movement integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementTuning {
    /// Walking speed in m/s for a unit input factor.
    pub move_speed: f32,
    /// Speed multiplier while the run modifier is held.
    pub run_factor: f32,
    /// Vertical speed added by a jump.
    pub jump_speed: f32,
    /// Bounds the horizontal acceleration while airborne, not the top speed.
    pub max_air_speed: f32,
    /// How long a jump request stays valid while waiting for ground support.
    pub jump_grace_period: f64,
    pub gravity: Vec3,
    pub terminal_fall_speed: f32,
    /// Vertical speed relative to the ground below which a supported character counts as resting.
    pub resting_speed_threshold: f32,
    /// Direct input push while flying.
    pub fly_push: f32,
    /// Spring term pulling the flying velocity towards the input direction.
    pub fly_correction: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            run_factor: 5.0,
            jump_speed: 4.5,
            max_air_speed: 8.0,
            jump_grace_period: 0.1,
            gravity: Vec3::new(0.0, 0.0, -9.81),
            terminal_fall_speed: 100.0,
            resting_speed_threshold: 0.1,
            fly_push: 3.0,
            fly_correction: 2.0,
        }
    }
}

/// Capsule dimensions for both shape modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleConfig {
    pub radius: f32,
    pub standing_cylinder_height: f32,
    /// `None` disables the sitting shape entirely (e.g. for spectators).
    pub sitting_cylinder_height: Option<f32>,
    /// Eye height above the capsule bottom.
    pub eye_height: f32,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            // Capsule top ends roughly at head height of the avatar
            standing_cylinder_height: 1.3,
            sitting_cylinder_height: Some(0.3),
            eye_height: 1.67,
        }
    }
}

/// Stick-to-floor and stair walking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairConfig {
    /// How far down to probe for a floor after losing support. Zero disables it.
    pub stick_to_floor_step_down: f32,
    /// Highest obstruction that can be climbed. Zero disables stair walking.
    pub walk_stairs_step_up: f32,
    /// Minimum forward distance of a stair step, so tiny per-tick deltas still clear the edge.
    pub walk_stairs_min_step_forward: f32,
    /// Distance to look ahead for a walkable floor when the step top is too steep.
    pub walk_stairs_step_forward_test: f32,
    /// Cosine of the largest angle between the ground normal and the movement direction for
    /// which the ground normal is used for the forward test.
    pub walk_stairs_cos_angle_forward_contact: f32,
    /// Extra distance to probe down after a stair step.
    pub walk_stairs_step_down_extra: f32,
    /// Shortfall between desired and achieved horizontal step that triggers a stair step.
    pub min_shortfall: f32,
}

impl Default for StairConfig {
    fn default() -> Self {
        Self {
            stick_to_floor_step_down: 0.5,
            walk_stairs_step_up: 0.4,
            walk_stairs_min_step_forward: 0.02,
            walk_stairs_step_forward_test: 0.15,
            walk_stairs_cos_angle_forward_contact: 75f32.to_radians().cos(),
            walk_stairs_step_down_extra: 0.0,
            min_shortfall: 1.0e-4,
        }
    }
}

/// Camera eye-height smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSmoothing {
    /// Exponential decay rate of the offset, per second.
    pub decay_rate: f32,
    pub max_offset: f32,
    pub snap_epsilon: f32,
}

impl Default for CameraSmoothing {
    fn default() -> Self {
        Self {
            decay_rate: 20.0,
            max_offset: 0.3,
            snap_epsilon: 1.0e-5,
        }
    }
}

/// Everything the player controller needs to know up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub movement: MovementTuning,
    pub capsule: CapsuleConfig,
    pub stairs: StairConfig,
    pub camera: CameraSmoothing,
    /// Layers the character never collides with.
    pub excluded_layers: LayerMask,
    /// Largest penetration accepted when swapping shapes. `f32::MAX` always accepts.
    pub shape_swap_max_penetration: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement: MovementTuning::default(),
            capsule: CapsuleConfig::default(),
            stairs: StairConfig::default(),
            camera: CameraSmoothing::default(),
            excluded_layers: LayerMask::of(ObjectLayer::NON_COLLIDABLE),
            shape_swap_max_penetration: f32::MAX,
        }
    }
}

impl ControllerConfig {
    pub fn with_movement(mut self, movement: MovementTuning) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_capsule(mut self, capsule: CapsuleConfig) -> Self {
        self.capsule = capsule;
        self
    }

    pub fn with_stairs(mut self, stairs: StairConfig) -> Self {
        self.stairs = stairs;
        self
    }
}
