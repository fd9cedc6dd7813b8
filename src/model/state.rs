use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::shape::ShapeMode;

/// Snapshot of everything the controller owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    /// Capsule bottom, world space.
    pub position: Vec3,
    pub linear_velocity: Vec3,
    pub shape_mode: ShapeMode,
    pub on_ground: bool,
    pub fly_mode: bool,
    pub gravity_enabled: bool,
    pub last_jump_request_time: Option<f64>,
    pub camera_vertical_offset: f32,
    /// Stair delta absorbed by the camera smoother on the most recent tick.
    pub smoothing_accumulator: f32,
}

/// Vertical pop caused by stair walking or floor sticking this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StairStepResult {
    pub vertical_delta: f32,
    pub stepped: bool,
}

/// Gameplay events raised by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateEvents {
    pub jumped: bool,
}

/// Result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpdateOutput {
    pub events: UpdateEvents,
    pub camera_position: Vec3,
    pub on_ground: bool,
    pub stair: StairStepResult,
}

pub const POSE_ON_GROUND: u32 = 1 << 0;
pub const POSE_FLYING: u32 = 1 << 1;
pub const POSE_SITTING: u32 = 1 << 2;
pub const POSE_JUMPED: u32 = 1 << 3;

/// Plain-old-data pose, cheap to hash or send over the wire.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PoseSnapshot {
    pub position: [f32; 3],
    pub linear_velocity: [f32; 3],
    pub camera_offset: f32,
    pub flags: u32,
}

impl PoseSnapshot {
    pub fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
