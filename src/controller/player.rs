//! The player controller: owns the virtual character and runs one movement tick per `update`.

use glam::Vec3;
use tracing::{debug, trace, warn};

use super::integrator::{fly_velocity, is_resting, jump_velocity, walk_velocity, JumpLatch};
use super::resolver::resolve;
use super::smoother::CameraSmoother;
use crate::collision::{BodyId, CharacterSettings, CharacterVirtual, CollisionWorld, QueryFilter};
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::model::state::{POSE_FLYING, POSE_JUMPED, POSE_ON_GROUND, POSE_SITTING};
use crate::model::{
    CameraBasis, ContactEvent, ContactRecorder, ControllerState, MovementInput, MovementIntent,
    PoseSnapshot, ShapeMode, ShapeSet, UpdateEvents, UpdateOutput,
};
use crate::utils::{horizontal, BoundingSphere, UP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Active,
    Shutdown,
}

/// Kinematic capsule controller for a walking or flying player.
///
/// Everything except [`PlayerController::init`] is a no-op returning neutral values while the
/// controller is not active.
pub struct PlayerController<W: CollisionWorld> {
    config: ControllerConfig,
    lifecycle: Lifecycle,
    character: Option<W::Character>,
    shapes: Option<ShapeSet>,
    shape_mode: ShapeMode,

    input: MovementInput,
    jump: JumpLatch,
    fly_mode: bool,
    gravity_enabled: bool,
    on_ground: bool,

    smoother: CameraSmoother,
    contacts: ContactRecorder,
    last_horizontal_vel_rel_ground: Vec3,
    last_events: UpdateEvents,
}

impl<W: CollisionWorld> PlayerController<W> {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::Uninitialized,
            character: None,
            shapes: None,
            shape_mode: ShapeMode::Standing,
            input: MovementInput::default(),
            jump: JumpLatch::default(),
            fly_mode: false,
            gravity_enabled: true,
            on_ground: false,
            smoother: CameraSmoother::new(config.camera),
            contacts: ContactRecorder::new(),
            last_horizontal_vel_rel_ground: Vec3::ZERO,
            last_events: UpdateEvents::default(),
        }
    }

    /// Create the character with its eye at `eye_position`. Re-initialising an active
    /// controller shuts it down first.
    pub fn init(&mut self, world: &mut W, eye_position: Vec3) -> Result<(), ControllerError> {
        if self.is_active() {
            self.shutdown();
        }

        let shapes = ShapeSet::from_config(&self.config.capsule)?;
        let bottom = eye_position - UP * self.config.capsule.eye_height;
        let character = world.create_character(&CharacterSettings::new(*shapes.standing()), bottom)?;

        self.character = Some(character);
        self.shapes = Some(shapes);
        self.shape_mode = ShapeMode::Standing;
        self.input = MovementInput::default();
        self.jump.clear();
        self.on_ground = false;
        self.smoother.reset();
        self.contacts.clear();
        self.last_horizontal_vel_rel_ground = Vec3::ZERO;
        self.last_events = UpdateEvents::default();
        self.lifecycle = Lifecycle::Active;

        debug!(?bottom, "player controller initialised");
        Ok(())
    }

    /// Release the character and shapes. Safe to call any number of times.
    pub fn shutdown(&mut self) {
        if self.character.take().is_some() {
            debug!("player controller shut down");
        }
        self.shapes = None;
        self.on_ground = false;
        if self.lifecycle == Lifecycle::Active {
            self.lifecycle = Lifecycle::Shutdown;
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active && self.character.is_some()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn character(&self) -> Option<&W::Character> {
        self.character.as_ref()
    }

    fn query_filter(&self) -> QueryFilter {
        QueryFilter::excluding(self.config.excluded_layers)
    }

    /// One full movement tick: integrate, jump, sweep, stairs, camera.
    pub fn update(&mut self, world: &mut W, dt: f32, now: f64) -> UpdateOutput {
        let filter = self.query_filter();
        let Some(character) = self.character.as_mut() else {
            return UpdateOutput::default();
        };
        let tuning = &self.config.movement;
        let desired = self.input.take();
        let mut events = UpdateEvents::default();

        // Fresh ground velocity reduces jitter on platforms
        character.update_ground_velocity(world);
        let ground = character.ground();
        let velocity = character.linear_velocity();

        let mut vel = if self.fly_mode {
            fly_velocity(velocity, desired, tuning, dt)
        } else {
            walk_velocity(velocity, desired, &ground, self.gravity_enabled, tuning, dt)
        };

        if self.jump.try_consume(now, ground.supported, tuning.jump_grace_period) {
            vel = jump_velocity(vel, desired, &ground, self.fly_mode, tuning);
            events.jumped = true;
            trace!(?vel, "jump");
        }
        character.set_linear_velocity(vel);

        let outcome = resolve(character, world, dt, &self.config.stairs, &filter, &mut self.contacts);
        self.smoother.step(dt, outcome.stair.vertical_delta);

        let ground = character.ground();
        let velocity = character.linear_velocity();
        self.on_ground = !events.jumped && is_resting(&ground, velocity, tuning.resting_speed_threshold);
        self.last_horizontal_vel_rel_ground = if ground.supported {
            horizontal(velocity - ground.velocity)
        } else {
            horizontal(velocity)
        };
        self.last_events = events;

        UpdateOutput {
            events,
            camera_position: self.camera_position(),
            on_ground: self.on_ground,
            stair: outcome.stair,
        }
    }

    /// Collision-only tick while seated in a vehicle: no gravity, jumping or stairs, and the
    /// vehicle's own body is ignored. Keeps sensor contacts flowing.
    pub fn update_for_in_vehicle(&mut self, world: &mut W, dt: f32, vehicle_body: BodyId) {
        let filter = self.query_filter().ignoring_body(vehicle_body);
        let Some(character) = self.character.as_mut() else {
            return;
        };
        // Movement input belongs to the vehicle while seated
        self.input.clear();
        character.sweep_and_resolve(world, dt, &filter, &mut self.contacts);
        self.on_ground = false;
        self.last_events = UpdateEvents::default();
    }

    /// Swap the collision capsule. The mode only changes when the new shape was accepted.
    pub fn set_shape_mode(&mut self, world: &mut W, mode: ShapeMode) -> bool {
        let filter = self.query_filter();
        self.swap_shape(world, mode, &filter)
    }

    /// Like [`Self::set_shape_mode`], but `body` does not count against the penetration limit.
    /// Used when getting in or out of a vehicle whose hull surrounds the seat.
    pub fn set_shape_mode_ignoring(&mut self, world: &mut W, mode: ShapeMode, body: BodyId) -> bool {
        let filter = self.query_filter().ignoring_body(body);
        self.swap_shape(world, mode, &filter)
    }

    fn swap_shape(&mut self, world: &mut W, mode: ShapeMode, filter: &QueryFilter) -> bool {
        let (Some(character), Some(shapes)) = (self.character.as_mut(), self.shapes.as_ref()) else {
            return false;
        };
        let Some(shape) = shapes.get(mode) else {
            debug_assert!(false, "no collision shape for {mode:?}");
            warn!(?mode, current = ?self.shape_mode, "no collision shape for mode, keeping current shape");
            return false;
        };
        if !character.set_shape(world, shape, self.config.shape_swap_max_penetration, filter) {
            warn!(?mode, "shape swap rejected by collision world");
            return false;
        }
        self.shape_mode = mode;
        debug!(?mode, "shape mode changed");
        true
    }

    pub fn has_shape(&self, mode: ShapeMode) -> bool {
        self.shapes.as_ref().is_some_and(|s| s.get(mode).is_some())
    }

    pub fn shape_mode(&self) -> ShapeMode {
        self.shape_mode
    }

    fn run_factor(&self, run: bool) -> f32 {
        if run {
            self.config.movement.run_factor
        } else {
            1.0
        }
    }

    pub fn process_move_forwards(&mut self, factor: f32, run: bool, basis: &CameraBasis) {
        if !self.is_active() {
            return;
        }
        let speed = self.config.movement.move_speed * self.run_factor(run);
        self.input.add(basis.forward * factor * speed, run);
        // Gravity may be off at spawn so the player doesn't fall through an unloaded world
        self.gravity_enabled = true;
    }

    pub fn process_strafe_right(&mut self, factor: f32, run: bool, basis: &CameraBasis) {
        if !self.is_active() {
            return;
        }
        let speed = self.config.movement.move_speed * self.run_factor(run);
        self.input.add(basis.right * factor * speed, run);
        self.gravity_enabled = true;
    }

    /// Only has an effect in fly mode.
    pub fn process_move_up(&mut self, factor: f32, run: bool) {
        if !self.is_active() {
            return;
        }
        let speed = self.config.movement.move_speed * self.run_factor(run);
        let contribution = if self.fly_mode { UP * factor * speed } else { Vec3::ZERO };
        self.input.add(contribution, run);
    }

    pub fn process_jump(&mut self, now: f64) {
        if !self.is_active() {
            return;
        }
        self.jump.request(now);
        self.gravity_enabled = true;
    }

    /// Feed a whole tick's worth of intent at once.
    pub fn apply_intent(&mut self, intent: &MovementIntent, basis: &CameraBasis, now: f64) {
        if intent.move_axis.y != 0.0 {
            self.process_move_forwards(intent.move_axis.y, intent.run, basis);
        }
        if intent.move_axis.x != 0.0 {
            self.process_strafe_right(intent.move_axis.x, intent.run, basis);
        }
        if intent.vertical != 0.0 {
            self.process_move_up(intent.vertical, intent.run);
        }
        if intent.jump {
            self.process_jump(now);
        }
    }

    pub fn is_move_desired_vel_nonzero(&self) -> bool {
        self.input.is_nonzero()
    }

    pub fn zero_move_desired_vel(&mut self) {
        self.input.clear();
    }

    pub fn set_fly_mode_enabled(&mut self, enabled: bool) {
        self.fly_mode = enabled;
    }

    pub fn fly_mode(&self) -> bool {
        self.fly_mode
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn last_events(&self) -> UpdateEvents {
        self.last_events
    }

    pub fn eye_height(&self) -> f32 {
        self.config.capsule.eye_height
    }

    pub fn camera_offset(&self) -> f32 {
        self.smoother.offset()
    }

    pub fn capsule_bottom_position(&self) -> Vec3 {
        self.character.as_ref().map_or(Vec3::ZERO, |c| c.position())
    }

    /// Eye position with the stair smoothing offset applied.
    pub fn camera_position(&self) -> Vec3 {
        match &self.character {
            Some(c) => c.position() + UP * (self.eye_height() - self.smoother.offset()),
            None => Vec3::ZERO,
        }
    }

    /// Teleport so the eye ends up at `eye_position`.
    pub fn set_eye_position(&mut self, eye_position: Vec3, linear_velocity: Vec3) {
        let bottom = eye_position - UP * self.eye_height();
        self.set_capsule_bottom_position(bottom, linear_velocity);
    }

    pub fn set_capsule_bottom_position(&mut self, position: Vec3, linear_velocity: Vec3) {
        if let Some(character) = self.character.as_mut() {
            character.set_position(position);
            character.set_linear_velocity(linear_velocity);
        }
    }

    pub fn linear_velocity(&self) -> Vec3 {
        self.character.as_ref().map_or(Vec3::ZERO, |c| c.linear_velocity())
    }

    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        if let Some(character) = self.character.as_mut() {
            character.set_linear_velocity(velocity);
        }
    }

    pub fn add_to_linear_velocity(&mut self, delta: Vec3) {
        if let Some(character) = self.character.as_mut() {
            let velocity = character.linear_velocity();
            character.set_linear_velocity(velocity + delta);
        }
    }

    /// Horizontal velocity relative to whatever the player stood on, as of the last update.
    /// Drives walk/run animation speed.
    pub fn last_horizontal_velocity_rel_ground(&self) -> Vec3 {
        self.last_horizontal_vel_rel_ground
    }

    /// Spheres roughly covering the current capsule.
    pub fn debug_collision_spheres(&self) -> Option<[BoundingSphere; 3]> {
        self.character.as_ref().map(|c| c.shape().debug_spheres(c.position()))
    }

    /// Hand over contact events recorded since the last drain.
    pub fn drain_contacts(&mut self) -> Vec<ContactEvent> {
        self.contacts.drain()
    }

    pub fn state(&self) -> ControllerState {
        ControllerState {
            position: self.capsule_bottom_position(),
            linear_velocity: self.linear_velocity(),
            shape_mode: self.shape_mode,
            on_ground: self.on_ground,
            fly_mode: self.fly_mode,
            gravity_enabled: self.gravity_enabled,
            last_jump_request_time: self.jump.requested_at(),
            camera_vertical_offset: self.smoother.offset(),
            smoothing_accumulator: self.smoother.last_delta(),
        }
    }

    pub fn pose_snapshot(&self) -> PoseSnapshot {
        let mut flags = 0;
        if self.on_ground {
            flags |= POSE_ON_GROUND;
        }
        if self.fly_mode {
            flags |= POSE_FLYING;
        }
        if self.shape_mode == ShapeMode::Sitting {
            flags |= POSE_SITTING;
        }
        if self.last_events.jumped {
            flags |= POSE_JUMPED;
        }
        PoseSnapshot {
            position: self.capsule_bottom_position().to_array(),
            linear_velocity: self.linear_velocity().to_array(),
            camera_offset: self.smoother.offset(),
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::scripted::ScriptedWorld;
    use crate::collision::{ContactAdded, GroundSample, OwnerTag};
    use crate::config::CapsuleConfig;
    use crate::error::CollisionError;

    const DT: f32 = 1.0 / 60.0;

    fn supported() -> GroundSample {
        GroundSample { supported: true, velocity: Vec3::ZERO, normal: Vec3::Z }
    }

    fn active(world: &mut ScriptedWorld) -> PlayerController<ScriptedWorld> {
        let mut player = PlayerController::new(ControllerConfig::default());
        player.init(world, Vec3::new(0.0, 0.0, 1.67)).unwrap();
        player
    }

    #[test]
    fn test_init_converts_eye_to_capsule_bottom() {
        let mut world = ScriptedWorld::default();
        let player = active(&mut world);
        assert!(player.is_active());
        assert!(player.capsule_bottom_position().length() < 1e-6);
        assert!((player.camera_position().z - 1.67).abs() < 1e-6);
        assert!(player.has_shape(ShapeMode::Sitting));
    }

    #[test]
    fn test_init_failure_leaves_controller_inactive() {
        let mut world = ScriptedWorld { fail_creation: true, ..Default::default() };
        let mut player = PlayerController::new(ControllerConfig::default());
        let err = player.init(&mut world, Vec3::ZERO).unwrap_err();
        assert_eq!(err, ControllerError::CharacterCreation(CollisionError::InvalidShape));
        assert!(!player.is_active());
        assert_eq!(player.lifecycle(), Lifecycle::Uninitialized);
    }

    #[test]
    fn test_buffered_jump_executes_on_landing() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);

        player.process_jump(0.0);
        for tick in 0..3 {
            let out = player.update(&mut world, DT, tick as f64 / 60.0);
            assert!(!out.events.jumped);
        }
        assert_eq!(player.state().last_jump_request_time, Some(0.0));

        world.ground = supported();
        let out = player.update(&mut world, DT, 0.05);
        assert!(out.events.jumped);
        assert!(!out.on_ground);
        assert!((player.linear_velocity().z - 4.5).abs() < 1e-5);
        assert_eq!(player.state().last_jump_request_time, None);
        assert!(player.pose_snapshot().has(POSE_JUMPED));

        // One-shot: still inside the window, still supported, but no new request
        let out = player.update(&mut world, DT, 0.05 + 1.0 / 60.0);
        assert!(!out.events.jumped);
    }

    #[test]
    fn test_stale_jump_request_expires() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);
        player.process_jump(0.0);
        player.update(&mut world, DT, 0.0);
        world.ground = supported();
        let out = player.update(&mut world, DT, 0.15);
        assert!(!out.events.jumped);
        assert!(out.on_ground);
    }

    #[test]
    fn test_input_consumed_once_per_update() {
        let mut world = ScriptedWorld { ground: supported(), ..Default::default() };
        let mut player = active(&mut world);
        let basis = CameraBasis::default();

        player.process_move_forwards(1.0, false, &basis);
        player.process_move_forwards(1.0, false, &basis);
        assert!(player.is_move_desired_vel_nonzero());

        let out = player.update(&mut world, DT, 0.0);
        assert!(out.on_ground);
        assert!((player.linear_velocity() - Vec3::new(0.0, 6.0, 0.0)).length() < 1e-5);
        assert!(!player.is_move_desired_vel_nonzero());

        // Nothing new accumulated: the player stops dead on the ground
        player.update(&mut world, DT, DT as f64);
        assert!(player.linear_velocity().length() < 1e-5);
    }

    #[test]
    fn test_run_and_fly_inputs() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);
        let basis = CameraBasis::default();

        player.process_strafe_right(1.0, true, &basis);
        player.process_move_up(1.0, false);
        assert!((player.input.desired_velocity() - Vec3::new(15.0, 0.0, 0.0)).length() < 1e-5);

        player.zero_move_desired_vel();
        player.set_fly_mode_enabled(true);
        player.apply_intent(
            &MovementIntent { move_axis: glam::Vec2::ZERO, vertical: 1.0, run: false, jump: false },
            &basis,
            0.0,
        );
        assert!((player.input.desired_velocity() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_moving_enables_gravity() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);
        player.set_gravity_enabled(false);
        player.update(&mut world, DT, 0.0);
        assert_eq!(player.linear_velocity(), Vec3::ZERO);

        player.process_move_forwards(0.0, false, &CameraBasis::default());
        assert!(player.gravity_enabled());
        player.update(&mut world, DT, DT as f64);
        assert!(player.linear_velocity().z < 0.0);
    }

    #[test]
    fn test_uninitialized_controller_is_noop() {
        let mut world = ScriptedWorld::default();
        let mut player = PlayerController::<ScriptedWorld>::new(ControllerConfig::default());

        player.process_move_forwards(1.0, true, &CameraBasis::default());
        player.process_jump(0.0);
        assert!(!player.is_move_desired_vel_nonzero());
        assert_eq!(player.update(&mut world, DT, 0.0), UpdateOutput::default());
        player.update_for_in_vehicle(&mut world, DT, BodyId(1));
        assert_eq!(world.sweeps, 0);
        assert!(!player.set_shape_mode(&mut world, ShapeMode::Sitting));
        assert_eq!(player.linear_velocity(), Vec3::ZERO);
        assert!(player.debug_collision_spheres().is_none());
        assert!(player.drain_contacts().is_empty());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);
        player.update(&mut world, DT, 0.0);

        player.shutdown();
        let once = player.state();
        assert_eq!(player.lifecycle(), Lifecycle::Shutdown);

        player.shutdown();
        assert_eq!(player.state(), once);
        assert_eq!(player.lifecycle(), Lifecycle::Shutdown);
        assert_eq!(player.update(&mut world, DT, 0.0), UpdateOutput::default());

        // Can come back
        player.init(&mut world, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert!(player.is_active());
    }

    #[test]
    fn test_reinit_while_active_moves_character() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);
        player.process_jump(0.0);
        player.init(&mut world, Vec3::new(5.0, 0.0, 1.67)).unwrap();
        assert!((player.capsule_bottom_position() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(player.state().last_jump_request_time, None);
    }

    #[test]
    fn test_shape_mode_swaps() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);
        assert!(player.set_shape_mode(&mut world, ShapeMode::Sitting));
        assert_eq!(player.shape_mode(), ShapeMode::Sitting);
        assert!((player.character().unwrap().shape().cylinder_height - 0.3).abs() < 1e-6);
        assert!(player.pose_snapshot().has(POSE_SITTING));

        assert!(player.set_shape_mode(&mut world, ShapeMode::Standing));
        assert!((player.character().unwrap().shape().cylinder_height - 1.3).abs() < 1e-6);
    }

    fn without_sitting_shape(world: &mut ScriptedWorld) -> PlayerController<ScriptedWorld> {
        let capsule = CapsuleConfig { sitting_cylinder_height: None, ..Default::default() };
        let mut player = PlayerController::new(ControllerConfig::default().with_capsule(capsule));
        player.init(world, Vec3::ZERO).unwrap();
        player
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no collision shape")]
    fn test_missing_shape_asserts_in_debug() {
        let mut world = ScriptedWorld::default();
        let mut player = without_sitting_shape(&mut world);
        player.set_shape_mode(&mut world, ShapeMode::Sitting);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_missing_shape_keeps_previous_in_release() {
        let mut world = ScriptedWorld::default();
        let mut player = without_sitting_shape(&mut world);
        assert!(!player.set_shape_mode(&mut world, ShapeMode::Sitting));
        assert_eq!(player.shape_mode(), ShapeMode::Standing);
        assert!((player.character().unwrap().shape().cylinder_height - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_contacts_recorded_and_drained() {
        let tagged = ContactAdded { body: BodyId(1), normal: Vec3::Z, owner: Ok(OwnerTag::new(77)) };
        let untagged = ContactAdded { body: BodyId(2), normal: Vec3::Z, owner: Ok(None) };
        let locked = ContactAdded { body: BodyId(3), normal: Vec3::Z, owner: Err(CollisionError::BodyLocked(BodyId(3))) };
        let mut world = ScriptedWorld { contacts: vec![tagged, untagged, locked], ..Default::default() };
        let mut player = active(&mut world);

        player.update(&mut world, DT, 0.0);
        player.update(&mut world, DT, DT as f64);
        let events = player.drain_contacts();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.body == BodyId(1) && e.owner.get() == 77));
        assert!(player.drain_contacts().is_empty());
    }

    #[test]
    fn test_in_vehicle_update_ignores_vehicle_and_input() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);
        player.process_move_forwards(1.0, false, &CameraBasis::default());
        player.set_linear_velocity(Vec3::new(2.0, 0.0, 0.0));

        player.update_for_in_vehicle(&mut world, 0.5, BodyId(9));
        let filter = world.last_filter.unwrap();
        assert_eq!(filter.ignored_body, Some(BodyId(9)));
        assert!(!player.is_move_desired_vel_nonzero());
        // Plain sweep: no gravity was added
        assert_eq!(player.linear_velocity(), Vec3::new(2.0, 0.0, 0.0));
        assert!((player.capsule_bottom_position().x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_velocity_relative_to_platform() {
        let platform = GroundSample { supported: true, velocity: Vec3::new(1.0, 0.0, 0.0), normal: Vec3::Z };
        let mut world = ScriptedWorld { ground: platform, ..Default::default() };
        let mut player = active(&mut world);
        player.process_strafe_right(1.0, false, &CameraBasis::default());
        player.update(&mut world, DT, 0.0);

        assert!((player.linear_velocity() - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-5);
        assert!((player.last_horizontal_velocity_rel_ground() - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_pose_helpers() {
        let mut world = ScriptedWorld::default();
        let mut player = active(&mut world);
        player.set_eye_position(Vec3::new(1.0, 1.0, 2.67), Vec3::new(0.0, 1.0, 0.0));
        assert!((player.capsule_bottom_position() - Vec3::new(1.0, 1.0, 1.0)).length() < 1e-5);
        player.add_to_linear_velocity(Vec3::new(0.0, 1.0, 0.5));
        assert_eq!(player.linear_velocity(), Vec3::new(0.0, 2.0, 0.5));

        let spheres = player.debug_collision_spheres().unwrap();
        assert!(spheres.iter().all(|s| (s.radius - 0.3).abs() < 1e-6));

        let pose = player.pose_snapshot();
        assert_eq!(pose.linear_velocity, [0.0, 2.0, 0.5]);
        assert!(!pose.has(POSE_ON_GROUND));
    }
}
