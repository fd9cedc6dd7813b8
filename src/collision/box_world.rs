//! Reference collision backend built from axis-aligned boxes.
//!
//! The world is a flat list of boxes. Static boxes never move, kinematic boxes move with a
//! constant velocity every time [`BoxWorld::step`] is called, and sensors report contacts
//! without ever blocking. The character is approximated by the bounding box of its capsule,
//! so every walkable surface is a box top with normal +Z.

use glam::Vec3;
use tracing::trace;

use super::aa_box::{AaBox, SweepHit};
use super::{
    BodyId, CharacterSettings, CharacterVirtual, CollisionWorld, ContactAdded, ContactListener,
    GroundSample, ObjectLayer, OwnerTag, QueryFilter, StairWalk,
};
use crate::error::CollisionError;
use crate::model::shape::CapsuleShape;
use crate::utils::horizontal;

/// Gap kept between the character and anything it rests against.
pub const SKIN: f32 = 1.0e-3;
/// How far below the character a floor still counts as supporting it.
pub const SUPPORT_PROBE: f32 = 0.01;
const MAX_SWEEP_ITERATIONS: usize = 4;
const MAX_DEPENETRATION_ITERATIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Kinematic,
    Sensor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub bounds: AaBox,
    pub kind: BodyKind,
    pub layer: ObjectLayer,
    pub velocity: Vec3,
    pub owner: Option<OwnerTag>,
    locked: bool,
}

impl Body {
    pub fn is_solid(&self) -> bool {
        self.kind != BodyKind::Sensor
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Collection of boxes the character can collide with.
#[derive(Debug, Default)]
pub struct BoxWorld {
    bodies: Vec<Body>,
    next_id: u32,
    /// Broadphase candidates of the query currently running.
    scratch: Vec<usize>,
}

impl BoxWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, bounds: AaBox, kind: BodyKind, layer: ObjectLayer) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            bounds,
            kind,
            layer,
            velocity: Vec3::ZERO,
            owner: None,
            locked: false,
        });
        id
    }

    pub fn add_static(&mut self, bounds: AaBox) -> BodyId {
        self.add_body(bounds, BodyKind::Static, ObjectLayer::NON_MOVING)
    }

    /// A moving platform.
    pub fn add_kinematic(&mut self, bounds: AaBox, velocity: Vec3) -> BodyId {
        let id = self.add_body(bounds, BodyKind::Kinematic, ObjectLayer::MOVING);
        if let Some(body) = self.body_mut(id) {
            body.velocity = velocity;
        }
        id
    }

    pub fn add_sensor(&mut self, bounds: AaBox) -> BodyId {
        self.add_body(bounds, BodyKind::Sensor, ObjectLayer::SENSOR)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn set_owner(&mut self, id: BodyId, owner: Option<OwnerTag>) -> Result<(), CollisionError> {
        let body = self.body_mut(id).ok_or(CollisionError::UnknownBody(id))?;
        body.owner = owner;
        Ok(())
    }

    pub fn set_layer(&mut self, id: BodyId, layer: ObjectLayer) -> Result<(), CollisionError> {
        let body = self.body_mut(id).ok_or(CollisionError::UnknownBody(id))?;
        body.layer = layer;
        Ok(())
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec3) -> Result<(), CollisionError> {
        let body = self.body_mut(id).ok_or(CollisionError::UnknownBody(id))?;
        body.velocity = velocity;
        Ok(())
    }

    /// A locked body still collides, but its owner can't be read.
    pub fn set_locked(&mut self, id: BodyId, locked: bool) -> Result<(), CollisionError> {
        let body = self.body_mut(id).ok_or(CollisionError::UnknownBody(id))?;
        body.locked = locked;
        Ok(())
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<Body, CollisionError> {
        let index = self
            .bodies
            .iter()
            .position(|b| b.id == id)
            .ok_or(CollisionError::UnknownBody(id))?;
        Ok(self.bodies.remove(index))
    }

    pub fn body_owner(&self, id: BodyId) -> Result<Option<OwnerTag>, CollisionError> {
        let body = self.body(id).ok_or(CollisionError::UnknownBody(id))?;
        if body.locked {
            return Err(CollisionError::BodyLocked(id));
        }
        Ok(body.owner)
    }

    /// Advance kinematic bodies.
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().filter(|b| b.kind == BodyKind::Kinematic) {
            body.bounds = body.bounds.translate(body.velocity * dt);
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Fill the scratch buffer with filtered bodies touching `region`.
    fn gather(&mut self, region: AaBox, filter: &QueryFilter, solid_only: bool) {
        self.scratch.clear();
        for (index, body) in self.bodies.iter().enumerate() {
            if solid_only && !body.is_solid() {
                continue;
            }
            if !filter.should_collide(body.layer, body.id) {
                continue;
            }
            if body.bounds.intersects(region) {
                self.scratch.push(index);
            }
        }
    }

    /// Earliest hit of `bounds` moving by `delta`.
    fn cast(&mut self, bounds: AaBox, delta: Vec3, filter: &QueryFilter) -> Option<(SweepHit, usize)> {
        let region = bounds.union(bounds.translate(delta)).expand(SKIN);
        self.gather(region, filter, true);

        let mut best: Option<(SweepHit, usize)> = None;
        for &index in &self.scratch {
            if let Some(hit) = bounds.sweep(delta, self.bodies[index].bounds) {
                if best.map_or(true, |(b, _)| hit.toi < b.toi) {
                    best = Some((hit, index));
                }
            }
        }
        best
    }

    /// Move `bounds` by `delta`, stopping a skin short of the first hit.
    fn travel(&mut self, bounds: AaBox, delta: Vec3, filter: &QueryFilter) -> (Vec3, Option<(SweepHit, usize)>) {
        match self.cast(bounds, delta, filter) {
            Some((hit, index)) => (delta * hit.toi + hit.normal * SKIN, Some((hit, index))),
            None => (delta, None),
        }
    }

    /// Offset that pushes `bounds` out of every solid body it overlaps.
    fn depenetration(&mut self, bounds: AaBox, filter: &QueryFilter) -> Vec3 {
        let mut total = Vec3::ZERO;
        for _ in 0..MAX_DEPENETRATION_ITERATIONS {
            let current = bounds.translate(total);
            self.gather(current, filter, true);
            let push = self
                .scratch
                .iter()
                .filter_map(|&i| current.penetration(self.bodies[i].bounds))
                .fold(None::<(f32, Vec3)>, |acc, p| match acc {
                    Some(a) if a.0 >= p.0 => Some(a),
                    _ => Some(p),
                });
            match push {
                Some((depth, dir)) => total += dir * (depth + SKIN),
                None => break,
            }
        }
        total
    }

    /// Deepest penetration of `bounds` into any solid body.
    fn max_penetration(&mut self, bounds: AaBox, filter: &QueryFilter) -> f32 {
        self.gather(bounds, filter, true);
        self.scratch
            .iter()
            .filter_map(|&i| bounds.penetration(self.bodies[i].bounds))
            .map(|(depth, _)| depth)
            .fold(0.0, f32::max)
    }

    /// Highest solid top directly below `bounds` within the support probe.
    fn support_below(&mut self, bounds: AaBox, filter: &QueryFilter) -> Option<usize> {
        let region = AaBox::new(
            Vec3::new(bounds.min.x, bounds.min.y, bounds.min.z - SUPPORT_PROBE),
            Vec3::new(bounds.max.x, bounds.max.y, bounds.min.z + SKIN),
        );
        self.gather(region.expand(SKIN), filter, true);

        let mut best: Option<usize> = None;
        for &index in &self.scratch {
            let top = self.bodies[index].bounds.max.z;
            let in_reach = top <= bounds.min.z + SKIN && top >= bounds.min.z - SUPPORT_PROBE;
            if in_reach && self.bodies[index].bounds.overlaps_horizontally(bounds) {
                if best.map_or(true, |b| top > self.bodies[b].bounds.max.z) {
                    best = Some(index);
                }
            }
        }
        best
    }

    fn contact_for(&self, index: usize, normal: Vec3) -> ContactAdded {
        let body = &self.bodies[index];
        let owner = if body.locked { Err(CollisionError::BodyLocked(body.id)) } else { Ok(body.owner) };
        ContactAdded { body: body.id, normal, owner }
    }

    /// Report every sensor overlapping `bounds`.
    fn report_sensors(&mut self, bounds: AaBox, filter: &QueryFilter, listener: &mut dyn ContactListener) {
        self.gather(bounds, filter, false);
        for &index in &self.scratch {
            if !self.bodies[index].is_solid() {
                listener.on_contact_added(&self.contact_for(index, Vec3::ZERO));
            }
        }
    }
}

impl CollisionWorld for BoxWorld {
    type Character = BoxCharacter;

    fn create_character(
        &mut self,
        settings: &CharacterSettings,
        position: Vec3,
    ) -> Result<BoxCharacter, CollisionError> {
        let shape = CapsuleShape::new(settings.shape.radius, settings.shape.cylinder_height)?;
        Ok(BoxCharacter {
            shape,
            up: settings.up,
            max_slope_cos: settings.max_slope_cos,
            position,
            velocity: Vec3::ZERO,
            ground: GroundSample::default(),
            ground_body: None,
            contacts: Vec::new(),
        })
    }
}

/// Contact remembered from the last sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ContactPoint {
    body: BodyId,
    normal: Vec3,
    velocity: Vec3,
}

/// Virtual character living in a [`BoxWorld`].
#[derive(Debug, Clone)]
pub struct BoxCharacter {
    shape: CapsuleShape,
    up: Vec3,
    max_slope_cos: f32,
    position: Vec3,
    velocity: Vec3,
    ground: GroundSample,
    ground_body: Option<BodyId>,
    contacts: Vec<ContactPoint>,
}

impl BoxCharacter {
    pub fn bounds(&self) -> AaBox {
        let (min, max) = self.shape.local_bounds();
        AaBox::new(self.position + min, self.position + max)
    }

    pub fn ground_body(&self) -> Option<BodyId> {
        self.ground_body
    }

    fn refresh_support(&mut self, world: &mut BoxWorld, filter: &QueryFilter) {
        match world.support_below(self.bounds(), filter) {
            Some(index) => {
                let body = &world.bodies[index];
                self.ground = GroundSample {
                    supported: true,
                    velocity: body.velocity,
                    normal: self.up,
                };
                self.ground_body = Some(body.id);
            }
            None => {
                self.ground = GroundSample::default();
                self.ground_body = None;
            }
        }
    }

    fn is_walkable(&self, normal: Vec3) -> bool {
        normal.dot(self.up) >= self.max_slope_cos
    }
}

impl CharacterVirtual for BoxCharacter {
    type World = BoxWorld;

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn shape(&self) -> &CapsuleShape {
        &self.shape
    }

    fn set_shape(
        &mut self,
        world: &mut BoxWorld,
        shape: &CapsuleShape,
        max_penetration: f32,
        filter: &QueryFilter,
    ) -> bool {
        let (min, max) = shape.local_bounds();
        let bounds = AaBox::new(self.position + min, self.position + max);
        if max_penetration < f32::MAX && world.max_penetration(bounds, filter) > max_penetration {
            return false;
        }
        self.shape = *shape;
        true
    }

    fn update_ground_velocity(&mut self, world: &BoxWorld) {
        if let Some(id) = self.ground_body {
            self.ground.velocity = world.body(id).map_or(Vec3::ZERO, |b| b.velocity);
        }
    }

    fn ground(&self) -> GroundSample {
        self.ground
    }

    fn sweep_and_resolve(
        &mut self,
        world: &mut BoxWorld,
        dt: f32,
        filter: &QueryFilter,
        listener: &mut dyn ContactListener,
    ) -> Vec3 {
        self.contacts.clear();
        self.position += world.depenetration(self.bounds(), filter);

        let mut velocity = self.velocity;
        let mut remaining = dt;
        for _ in 0..MAX_SWEEP_ITERATIONS {
            if remaining <= 0.0 || velocity == Vec3::ZERO {
                break;
            }
            let delta = velocity * remaining;
            let (moved, hit) = world.travel(self.bounds(), delta, filter);
            self.position += moved;
            let Some((hit, index)) = hit else {
                break;
            };

            let body = &world.bodies[index];
            self.contacts.push(ContactPoint {
                body: body.id,
                normal: hit.normal,
                velocity: body.velocity,
            });
            listener.on_contact_added(&world.contact_for(index, hit.normal));

            // Slide: drop the velocity component going into the surface
            velocity[hit.axis] = 0.0;
            remaining -= remaining * hit.toi;
        }
        self.velocity = velocity;

        world.report_sensors(self.bounds(), filter, listener);
        self.refresh_support(world, filter);
        self.position
    }

    fn stick_to_floor(
        &mut self,
        world: &mut BoxWorld,
        step_down: Vec3,
        filter: &QueryFilter,
        listener: &mut dyn ContactListener,
    ) -> bool {
        let (moved, hit) = world.travel(self.bounds(), step_down, filter);
        let Some((hit, index)) = hit else {
            return false;
        };
        if !self.is_walkable(hit.normal) {
            return false;
        }
        self.position += moved;
        listener.on_contact_added(&world.contact_for(index, hit.normal));
        self.refresh_support(world, filter);
        trace!(dz = moved.z, "stuck to floor");
        true
    }

    fn can_walk_stairs(&self, desired_velocity: Vec3) -> bool {
        if !self.ground.supported {
            return false;
        }
        let horizontal_velocity = horizontal(desired_velocity);
        self.contacts.iter().any(|c| {
            !self.is_walkable(c.normal) && c.normal.dot(horizontal_velocity - c.velocity) < 0.0
        })
    }

    fn walk_stairs(
        &mut self,
        world: &mut BoxWorld,
        walk: &StairWalk,
        filter: &QueryFilter,
        listener: &mut dyn ContactListener,
    ) -> bool {
        let start = self.bounds();

        let (up, _) = world.travel(start, walk.step_up, filter);
        if up.dot(self.up) <= SKIN {
            return false;
        }
        let raised = start.translate(up);

        let (forward, _) = world.travel(raised, walk.step_forward, filter);
        if horizontal(forward).dot(walk.step_forward) <= 1.0e-8 {
            return false;
        }
        let advanced = raised.translate(forward);

        // Go down as far as we went up, plus the extra
        let down = -up + walk.step_down_extra;
        let (mut landing, hit) = world.travel(advanced, down, filter);
        let Some((mut hit, mut index)) = hit else {
            return false;
        };
        let mut offset = up + forward;

        if !self.is_walkable(hit.normal) {
            // Too steep at the step, look a bit further ahead
            let ahead = raised.translate(walk.step_forward_test);
            match world.travel(ahead, down, filter) {
                (test_landing, Some((test_hit, test_index))) if self.is_walkable(test_hit.normal) => {
                    landing = test_landing;
                    hit = test_hit;
                    index = test_index;
                    offset = up + walk.step_forward_test;
                }
                _ => return false,
            }
        }

        self.position += offset + landing;
        listener.on_contact_added(&world.contact_for(index, hit.normal));
        self.refresh_support(world, filter);
        trace!(dz = (offset + landing).z, "walked stairs");
        true
    }
}
