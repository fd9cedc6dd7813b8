//! Test backend whose ground state and contacts are set by the test instead of computed.

use glam::Vec3;

use super::{
    CharacterSettings, CharacterVirtual, CollisionWorld, ContactAdded, ContactListener, GroundSample,
    QueryFilter, StairWalk,
};
use crate::error::CollisionError;
use crate::model::shape::CapsuleShape;

#[derive(Debug, Default)]
pub struct ScriptedWorld {
    /// Ground reported to the character on the next tick.
    pub ground: GroundSample,
    /// Contacts emitted by every sweep.
    pub contacts: Vec<ContactAdded>,
    pub fail_creation: bool,
    pub sweeps: usize,
    pub last_filter: Option<QueryFilter>,
}

impl CollisionWorld for ScriptedWorld {
    type Character = ScriptedCharacter;

    fn create_character(
        &mut self,
        settings: &CharacterSettings,
        position: Vec3,
    ) -> Result<ScriptedCharacter, CollisionError> {
        if self.fail_creation {
            return Err(CollisionError::InvalidShape);
        }
        Ok(ScriptedCharacter {
            shape: settings.shape,
            position,
            velocity: Vec3::ZERO,
            ground: GroundSample::default(),
        })
    }
}

#[derive(Debug)]
pub struct ScriptedCharacter {
    shape: CapsuleShape,
    position: Vec3,
    velocity: Vec3,
    ground: GroundSample,
}

impl CharacterVirtual for ScriptedCharacter {
    type World = ScriptedWorld;

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

    fn set_shape(&mut self, _: &mut ScriptedWorld, shape: &CapsuleShape, _: f32, _: &QueryFilter) -> bool {
        self.shape = *shape;
        true
    }

    fn update_ground_velocity(&mut self, world: &ScriptedWorld) {
        self.ground = world.ground;
    }

    fn ground(&self) -> GroundSample {
        self.ground
    }

    fn sweep_and_resolve(
        &mut self,
        world: &mut ScriptedWorld,
        dt: f32,
        filter: &QueryFilter,
        listener: &mut dyn ContactListener,
    ) -> Vec3 {
        world.sweeps += 1;
        world.last_filter = Some(*filter);
        self.position += self.velocity * dt;
        for contact in &world.contacts {
            listener.on_contact_added(contact);
        }
        self.ground = world.ground;
        if self.ground.supported && self.velocity.z < self.ground.velocity.z {
            self.velocity.z = self.ground.velocity.z;
        }
        self.position
    }

    fn stick_to_floor(&mut self, _: &mut ScriptedWorld, _: Vec3, _: &QueryFilter, _: &mut dyn ContactListener) -> bool {
        false
    }

    fn can_walk_stairs(&self, _: Vec3) -> bool {
        false
    }

    fn walk_stairs(&mut self, _: &mut ScriptedWorld, _: &StairWalk, _: &QueryFilter, _: &mut dyn ContactListener) -> bool {
        false
    }
}
