//! Eye-height offset that hides stair pops from the camera.

use crate::config::CameraSmoothing;

/// Absorbs sudden vertical pops from stair walking and releases them smoothly, so the eye
/// never jumps by a whole step in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSmoother {
    settings: CameraSmoothing,
    offset: f32,
    last_delta: f32,
}

impl CameraSmoother {
    pub fn new(settings: CameraSmoothing) -> Self {
        Self {
            settings,
            offset: 0.0,
            last_delta: 0.0,
        }
    }

    /// Offset to subtract from the eye height.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    /// Exponentially pull the offset towards zero.
    pub fn decay(&mut self, dt: f32) {
        let keep = (1.0 - self.settings.decay_rate * dt).max(0.0);
        self.offset *= keep;
        if self.offset.abs() < self.settings.snap_epsilon {
            self.offset = 0.0;
        }
    }

    /// Take in this tick's vertical step.
    pub fn absorb(&mut self, delta: f32) {
        let max = self.settings.max_offset;
        self.last_delta = delta;
        self.offset = (self.offset + delta).clamp(-max, max);
    }

    /// One tick: decay, then absorb `delta`. Returns the new offset.
    pub fn step(&mut self, dt: f32, delta: f32) -> f32 {
        self.decay(dt);
        self.absorb(delta);
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.last_delta = 0.0;
    }
}

impl Default for CameraSmoother {
    fn default() -> Self {
        Self::new(CameraSmoothing::default())
    }
}
