//! Movement integration: turns desired velocity, ground state and gravity into the velocity
//! handed to the collision sweep.

use glam::Vec3;

use crate::collision::GroundSample;
use crate::config::MovementTuning;
use crate::utils::{horizontal, remove_component_in_dir, UP};

/// Supported and not moving away from the ground. `supported` alone can still be true for a
/// tick right after a jump.
pub fn is_resting(ground: &GroundSample, velocity: Vec3, threshold: f32) -> bool {
    ground.supported && (velocity.z - ground.velocity.z) < threshold
}

/// One walking (non-flying) tick.
pub fn walk_velocity(
    velocity: Vec3,
    desired: Vec3,
    ground: &GroundSample,
    gravity_enabled: bool,
    tuning: &MovementTuning,
    dt: f32,
) -> Vec3 {
    let parallel = horizontal(desired);

    let mut vel = if is_resting(ground, velocity, tuning.resting_speed_threshold) {
        // On stable footing, take the desired velocity directly and ride along with the ground
        parallel + ground.velocity
    } else {
        // max_air_speed limits acceleration in the air
        velocity + parallel.clamp_length_max(tuning.max_air_speed) * dt
    };

    // Applied while grounded too, otherwise riding platforms flickers between grounded and airborne
    if gravity_enabled {
        vel += tuning.gravity * dt;
    }

    vel.z = vel.z.max(-tuning.terminal_fall_speed);
    vel
}

/// One flying tick: keep the current speed but steer it towards the input direction.
pub fn fly_velocity(velocity: Vec3, desired: Vec3, tuning: &MovementTuning, dt: f32) -> Vec3 {
    let speed = velocity.length();
    let target = if desired.length() < 1.0e-4 {
        Vec3::ZERO
    } else {
        desired.normalize() * speed
    };

    let accel = desired * tuning.fly_push + (target - velocity) * tuning.fly_correction;
    velocity + accel * dt
}

/// Velocity right after a jump.
///
/// Walking jumps are rebuilt from the desired velocity with its component along the true
/// ground normal removed, so jumping while running uphill doesn't lose the jump into the slope.
pub fn jump_velocity(
    velocity: Vec3,
    desired: Vec3,
    ground: &GroundSample,
    fly_mode: bool,
    tuning: &MovementTuning,
) -> Vec3 {
    let jump = UP * tuning.jump_speed;
    if fly_mode {
        velocity + jump
    } else {
        remove_component_in_dir(desired, ground.normal) + ground.velocity + jump
    }
}

/// Buffers a jump request so a press slightly before landing still jumps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JumpLatch {
    requested_at: Option<f64>,
}

impl JumpLatch {
    pub fn request(&mut self, now: f64) {
        self.requested_at = Some(now);
    }

    pub fn requested_at(&self) -> Option<f64> {
        self.requested_at
    }

    /// Consume the request if it is younger than `grace` and the character is supported.
    pub fn try_consume(&mut self, now: f64, supported: bool, grace: f64) -> bool {
        match self.requested_at {
            Some(t) if supported && now - t < grace => {
                self.requested_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.requested_at = None;
    }
}
