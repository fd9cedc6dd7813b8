//! Dispatches each tick either to the walking controller or to the seated, collision-only path.

use glam::{Affine3A, Vec3};
use tracing::{debug, warn};

use super::player::PlayerController;
use crate::collision::{BodyId, CollisionWorld};
use crate::model::{ShapeMode, UpdateOutput};

/// Where the player sits. The vehicle owner pushes a fresh transform every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatBinding {
    pub vehicle_body: BodyId,
    pub seat_index: u32,
    pub seat_to_world: Affine3A,
    /// Eye position in seat space.
    pub eye_offset: Vec3,
    pub linear_velocity: Vec3,
}

impl SeatBinding {
    pub fn new(vehicle_body: BodyId, seat_index: u32, seat_to_world: Affine3A) -> Self {
        Self {
            vehicle_body,
            seat_index,
            seat_to_world,
            eye_offset: Vec3::new(0.0, 0.0, 0.8),
            linear_velocity: Vec3::ZERO,
        }
    }

    pub fn with_eye_offset(mut self, eye_offset: Vec3) -> Self {
        self.eye_offset = eye_offset;
        self
    }

    pub fn seat_position(&self) -> Vec3 {
        self.seat_to_world.translation.into()
    }

    pub fn eye_position(&self) -> Vec3 {
        self.seat_to_world.transform_point3(self.eye_offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Locomotion {
    #[default]
    OnFoot,
    Seated(SeatBinding),
}

/// A player controller plus the knowledge of whether it is walking or riding.
pub struct PlayerRig<W: CollisionWorld> {
    player: PlayerController<W>,
    locomotion: Locomotion,
}

impl<W: CollisionWorld> PlayerRig<W> {
    pub fn new(player: PlayerController<W>) -> Self {
        Self { player, locomotion: Locomotion::OnFoot }
    }

    pub fn player(&self) -> &PlayerController<W> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController<W> {
        &mut self.player
    }

    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    pub fn is_seated(&self) -> bool {
        matches!(self.locomotion, Locomotion::Seated(_))
    }

    /// Sit down. Returns `false` if the player isn't active.
    ///
    /// The capsule moves to the seat before switching to the sitting shape, and the vehicle's
    /// own hull is not counted against the swap. If the swap is still rejected the player rides
    /// with the current shape, which is harmless since seated ticks ignore the vehicle.
    pub fn enter_vehicle(&mut self, world: &mut W, seat: SeatBinding) -> bool {
        if !self.player.is_active() {
            return false;
        }
        self.player.set_capsule_bottom_position(seat.seat_position(), seat.linear_velocity);
        if self.player.has_shape(ShapeMode::Sitting) {
            self.player.set_shape_mode_ignoring(world, ShapeMode::Sitting, seat.vehicle_body);
        }
        self.player.zero_move_desired_vel();
        debug!(
            vehicle = ?seat.vehicle_body,
            seat = seat.seat_index,
            mode = ?self.player.shape_mode(),
            "entered vehicle"
        );
        self.locomotion = Locomotion::Seated(seat);
        true
    }

    /// Stand up with the eye at `eye_position`, keeping the seat's velocity.
    ///
    /// Returns `false` and stays seated when the standing capsule does not fit there.
    pub fn exit_vehicle(&mut self, world: &mut W, eye_position: Vec3) -> bool {
        let Locomotion::Seated(seat) = self.locomotion else {
            return false;
        };
        let seated_at = self.player.capsule_bottom_position();
        self.player.set_eye_position(eye_position, seat.linear_velocity);
        if self.player.shape_mode() != ShapeMode::Standing
            && !self.player.set_shape_mode_ignoring(world, ShapeMode::Standing, seat.vehicle_body)
        {
            self.player.set_capsule_bottom_position(seated_at, seat.linear_velocity);
            warn!(vehicle = ?seat.vehicle_body, ?eye_position, "no room to stand up, staying seated");
            return false;
        }
        debug!(vehicle = ?seat.vehicle_body, "exited vehicle");
        self.locomotion = Locomotion::OnFoot;
        true
    }

    /// Ignored while on foot.
    pub fn set_seat_transform(&mut self, seat_to_world: Affine3A, linear_velocity: Vec3) {
        if let Locomotion::Seated(seat) = &mut self.locomotion {
            seat.seat_to_world = seat_to_world;
            seat.linear_velocity = linear_velocity;
        }
    }

    pub fn seat_to_world(&self) -> Option<Affine3A> {
        match &self.locomotion {
            Locomotion::Seated(seat) => Some(seat.seat_to_world),
            Locomotion::OnFoot => None,
        }
    }

    pub fn linear_velocity(&self) -> Vec3 {
        match &self.locomotion {
            Locomotion::Seated(seat) => seat.linear_velocity,
            Locomotion::OnFoot => self.player.linear_velocity(),
        }
    }

    pub fn update(&mut self, world: &mut W, dt: f32, now: f64) -> UpdateOutput {
        match self.locomotion {
            Locomotion::OnFoot => self.player.update(world, dt, now),
            Locomotion::Seated(seat) => {
                if !self.player.is_active() {
                    return UpdateOutput::default();
                }
                self.player.set_capsule_bottom_position(seat.seat_position(), seat.linear_velocity);
                self.player.update_for_in_vehicle(world, dt, seat.vehicle_body);
                UpdateOutput {
                    camera_position: seat.eye_position(),
                    ..Default::default()
                }
            }
        }
    }
}
