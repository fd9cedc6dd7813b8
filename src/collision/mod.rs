//! Collision query facade.
//!
//! The controller never talks to a physics engine directly. It goes through two traits:
//!
//! - [`CollisionWorld`] creates the virtual character for a given shape.
//! - [`CharacterVirtual`] is that character: it owns position, velocity and ground state and
//!   exposes the sweep, floor-stick and stair primitives. The world is passed into every call
//!   by mutable reference and is never owned by the character or the controller.
//!
//! Contacts discovered during a query are pushed synchronously into a [`ContactListener`] that
//! lives only for that call.

pub mod aa_box;
pub mod box_world;
#[cfg(test)]
pub mod scripted;

use std::num::NonZeroU64;

use glam::Vec3;

use crate::error::CollisionError;
use crate::model::shape::CapsuleShape;

pub use box_world::{BoxCharacter, BoxWorld};

/// Identifies a body in the collision world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Opaque gameplay handle stored on a body. Only bodies carrying one produce contact events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerTag(pub NonZeroU64);

impl OwnerTag {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(OwnerTag)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Collision layer of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectLayer(pub u8);

impl ObjectLayer {
    pub const NON_MOVING: ObjectLayer = ObjectLayer(0);
    pub const MOVING: ObjectLayer = ObjectLayer(1);
    pub const NON_COLLIDABLE: ObjectLayer = ObjectLayer(2);
    pub const SENSOR: ObjectLayer = ObjectLayer(3);
}

/// Set of layers, one bit per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);

    pub fn of(layer: ObjectLayer) -> Self {
        LayerMask(1 << layer.0)
    }

    pub fn with(self, layer: ObjectLayer) -> Self {
        LayerMask(self.0 | (1 << layer.0))
    }

    pub fn contains(self, layer: ObjectLayer) -> bool {
        self.0 & (1 << layer.0) != 0
    }
}

/// Decides which bodies a character query may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryFilter {
    pub excluded_layers: LayerMask,
    /// Typically the vehicle the player sits in.
    pub ignored_body: Option<BodyId>,
}

impl QueryFilter {
    pub fn excluding(excluded_layers: LayerMask) -> Self {
        Self { excluded_layers, ignored_body: None }
    }

    pub fn ignoring_body(mut self, body: BodyId) -> Self {
        self.ignored_body = Some(body);
        self
    }

    pub fn should_collide(&self, layer: ObjectLayer, body: BodyId) -> bool {
        !self.excluded_layers.contains(layer) && self.ignored_body != Some(body)
    }
}

/// What the character is standing on, sampled fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSample {
    pub supported: bool,
    pub velocity: Vec3,
    pub normal: Vec3,
}

impl Default for GroundSample {
    fn default() -> Self {
        Self {
            supported: false,
            velocity: Vec3::ZERO,
            normal: Vec3::Z,
        }
    }
}

/// A contact reported by the backend. `owner` is `Err` when the body could not be read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactAdded {
    pub body: BodyId,
    pub normal: Vec3,
    pub owner: Result<Option<OwnerTag>, CollisionError>,
}

/// Receives contacts synchronously while a character query runs.
pub trait ContactListener {
    fn on_contact_added(&mut self, contact: &ContactAdded);
}

impl<F> ContactListener for F
where
    F: FnMut(&ContactAdded),
{
    fn on_contact_added(&mut self, contact: &ContactAdded) {
        self(contact)
    }
}

/// Parameters of a single stair-step maneuver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairWalk {
    pub step_up: Vec3,
    pub step_forward: Vec3,
    /// Used to look further ahead when the floor at `step_forward` is too steep.
    pub step_forward_test: Vec3,
    pub step_down_extra: Vec3,
}

/// Settings used to create a virtual character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterSettings {
    pub shape: CapsuleShape,
    pub up: Vec3,
    /// Cosine of the steepest slope the character can stand on.
    pub max_slope_cos: f32,
}

impl CharacterSettings {
    pub fn new(shape: CapsuleShape) -> Self {
        Self {
            shape,
            up: Vec3::Z,
            max_slope_cos: 50f32.to_radians().cos(),
        }
    }
}

/// A physics world able to host virtual characters.
pub trait CollisionWorld {
    type Character: CharacterVirtual<World = Self>;

    fn create_character(
        &mut self,
        settings: &CharacterSettings,
        position: Vec3,
    ) -> Result<Self::Character, CollisionError>;
}

/// A kinematic character living in a [`CollisionWorld`].
pub trait CharacterVirtual {
    type World: ?Sized;

    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);

    fn shape(&self) -> &CapsuleShape;

    /// Swap the collision shape. Returns `false` and keeps the old shape when the new one
    /// would penetrate the world by more than `max_penetration`.
    fn set_shape(
        &mut self,
        world: &mut Self::World,
        shape: &CapsuleShape,
        max_penetration: f32,
        filter: &QueryFilter,
    ) -> bool;

    /// Re-read the velocity of the supporting body.
    fn update_ground_velocity(&mut self, world: &Self::World);

    fn ground(&self) -> GroundSample;

    fn is_supported(&self) -> bool {
        self.ground().supported
    }

    /// Move by `linear_velocity * dt`, sliding along whatever is hit. Returns the new position.
    fn sweep_and_resolve(
        &mut self,
        world: &mut Self::World,
        dt: f32,
        filter: &QueryFilter,
        listener: &mut dyn ContactListener,
    ) -> Vec3;

    /// Probe along `step_down` and snap onto a floor if one is found.
    fn stick_to_floor(
        &mut self,
        world: &mut Self::World,
        step_down: Vec3,
        filter: &QueryFilter,
        listener: &mut dyn ContactListener,
    ) -> bool;

    /// Whether the last sweep left the character pressed against something too steep to walk
    /// on while moving into it.
    fn can_walk_stairs(&self, desired_velocity: Vec3) -> bool;

    /// Up, forward, down. Commits the new position only when it lands on walkable ground.
    fn walk_stairs(
        &mut self,
        world: &mut Self::World,
        walk: &StairWalk,
        filter: &QueryFilter,
        listener: &mut dyn ContactListener,
    ) -> bool;
}
