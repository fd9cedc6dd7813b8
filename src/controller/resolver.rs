//! Commits the integrated velocity into a new position, then fixes up the result: sticks to the
//! floor when walking off small ledges, and walks up stairs when the sweep fell short of the
//! desired horizontal movement.

use glam::Vec3;
use tracing::trace;

use crate::collision::{CharacterVirtual, ContactListener, QueryFilter, StairWalk};
use crate::config::StairConfig;
use crate::model::StairStepResult;
use crate::utils::{remove_up_component, UP};

/// What the resolver did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolveOutcome {
    /// Vertical change caused by the stair and floor passes only, not by the sweep itself.
    pub stair: StairStepResult,
    pub stuck_to_floor: bool,
}

/// Forward step of a planned stair walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairPlan {
    pub step_forward: Vec3,
    pub step_forward_test: Vec3,
}

/// Decide whether the character fell short of where it wanted to go.
///
/// Only progress along the desired direction counts, so sliding sideways or downhill along a
/// slope is not mistaken for forward progress.
pub fn plan_stair_step(
    desired_velocity: Vec3,
    achieved_displacement: Vec3,
    ground_normal: Vec3,
    dt: f32,
    stairs: &StairConfig,
) -> Option<StairPlan> {
    let desired_step = remove_up_component(desired_velocity * dt, UP);
    let desired_len = desired_step.length();
    if desired_len <= 0.0 {
        return None;
    }
    let forward = desired_step / desired_len;

    let achieved = remove_up_component(achieved_displacement, UP);
    let achieved_len = achieved.dot(forward).max(0.0);
    if achieved_len + stairs.min_shortfall >= desired_len {
        return None;
    }

    // At very high frame rates the shortfall can be too small to end up on top of the step
    let step_forward = forward * stairs.walk_stairs_min_step_forward.max(desired_len - achieved_len);

    // Look ahead along the ground normal, unless it points too far away from where we go
    let mut test = remove_up_component(-ground_normal, UP).try_normalize().unwrap_or(forward);
    if test.dot(forward) < stairs.walk_stairs_cos_angle_forward_contact {
        test = forward;
    }

    Some(StairPlan {
        step_forward,
        step_forward_test: test * stairs.walk_stairs_step_forward_test,
    })
}

/// Sweep the character with its current velocity and run the floor and stair passes.
pub fn resolve<C>(
    character: &mut C,
    world: &mut C::World,
    dt: f32,
    stairs: &StairConfig,
    filter: &QueryFilter,
    listener: &mut dyn ContactListener,
) -> ResolveOutcome
where
    C: CharacterVirtual,
{
    let desired_velocity = character.linear_velocity();
    let old_position = character.position();
    let was_supported = character.is_supported();

    character.sweep_and_resolve(world, dt, filter, listener);

    let pre_stair_position = character.position();
    let mut outcome = ResolveOutcome::default();

    if was_supported && !character.is_supported() && stairs.stick_to_floor_step_down > 0.0 {
        let rise_speed = (pre_stair_position - old_position).dot(UP) / dt;
        if rise_speed <= 1.0e-6 {
            outcome.stuck_to_floor =
                character.stick_to_floor(world, -UP * stairs.stick_to_floor_step_down, filter, listener);
        }
    }

    if stairs.walk_stairs_step_up > 0.0 {
        let achieved = character.position() - old_position;
        let plan = plan_stair_step(desired_velocity, achieved, character.ground().normal, dt, stairs);
        if let Some(plan) = plan {
            if character.can_walk_stairs(desired_velocity) {
                let walk = StairWalk {
                    step_up: UP * stairs.walk_stairs_step_up,
                    step_forward: plan.step_forward,
                    step_forward_test: plan.step_forward_test,
                    step_down_extra: -UP * stairs.walk_stairs_step_down_extra,
                };
                outcome.stair.stepped = character.walk_stairs(world, &walk, filter, listener);
            }
        }
    }

    outcome.stair.vertical_delta = (character.position() - pre_stair_position).dot(UP);
    if outcome.stair.vertical_delta != 0.0 {
        trace!(
            dz = outcome.stair.vertical_delta,
            stepped = outcome.stair.stepped,
            stuck = outcome.stuck_to_floor,
            "stair pass moved character"
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::aa_box::AaBox;
    use crate::collision::box_world::SKIN;
    use crate::collision::{BoxWorld, CharacterSettings, CollisionWorld, ContactAdded};
    use crate::model::CapsuleShape;

    fn stairs() -> StairConfig {
        StairConfig::default()
    }

    #[test]
    fn test_no_plan_when_progress_is_complete() {
        let dt = 1.0 / 60.0;
        let desired = Vec3::new(3.0, 0.0, 0.0);
        assert!(plan_stair_step(desired, desired * dt, Vec3::Z, dt, &stairs()).is_none());
        assert!(plan_stair_step(Vec3::ZERO, Vec3::ZERO, Vec3::Z, dt, &stairs()).is_none());
        // Vertical-only desire has no horizontal step
        assert!(plan_stair_step(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Z, dt, &stairs()).is_none());
    }

    #[test]
    fn test_sideways_slide_is_not_progress() {
        let dt = 1.0 / 60.0;
        let desired = Vec3::new(3.0, 0.0, 0.0);
        let plan = plan_stair_step(desired, Vec3::new(0.0, 0.05, 0.0), Vec3::Z, dt, &stairs()).unwrap();
        assert!((plan.step_forward - Vec3::new(0.05, 0.0, 0.0)).length() < 1e-6);

        // Moving backwards counts as zero, not negative progress
        let plan = plan_stair_step(desired, Vec3::new(-0.02, 0.0, 0.0), Vec3::Z, dt, &stairs()).unwrap();
        assert!((plan.step_forward.x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_min_step_forward_at_high_frame_rate() {
        let dt = 1.0 / 1000.0;
        let plan = plan_stair_step(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, Vec3::Z, dt, &stairs()).unwrap();
        assert!((plan.step_forward.length() - 0.02).abs() < 1e-6);
        assert!((plan.step_forward_test - Vec3::new(0.15, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_forward_test_uses_ground_normal_when_aligned() {
        let dt = 1.0 / 60.0;
        // Slope rising towards +x, tilted slightly sideways
        let normal = Vec3::new(-1.0, -0.2, 1.0).normalize();
        let plan = plan_stair_step(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, normal, dt, &stairs()).unwrap();
        let expected = Vec3::new(1.0, 0.2, 0.0).normalize() * 0.15;
        assert!((plan.step_forward_test - expected).length() < 1e-5);

        // Normal facing away from the movement: fall back to the movement direction
        let away = Vec3::new(1.0, 0.0, 1.0).normalize();
        let plan = plan_stair_step(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, away, dt, &stairs()).unwrap();
        assert!((plan.step_forward_test - Vec3::new(0.15, 0.0, 0.0)).length() < 1e-5);
    }

    fn world_with_step(height: f32) -> BoxWorld {
        let mut world = BoxWorld::new();
        world.add_static(AaBox::new(Vec3::new(-50.0, -50.0, -1.0), Vec3::new(50.0, 50.0, 0.0)));
        world.add_static(AaBox::new(Vec3::new(1.0, -5.0, 0.0), Vec3::new(3.0, 5.0, height)));
        world
    }

    fn character_at(world: &mut BoxWorld, position: Vec3) -> crate::collision::BoxCharacter {
        let shape = CapsuleShape::new(0.3, 1.3).unwrap();
        let mut character = world.create_character(&CharacterSettings::new(shape), position).unwrap();
        // settle so the character knows it is supported
        character.sweep_and_resolve(world, 1.0 / 60.0, &QueryFilter::default(), &mut |_: &ContactAdded| {});
        character
    }

    #[test]
    fn test_resolve_walks_up_step() {
        let mut world = world_with_step(0.25);
        let mut character = character_at(&mut world, Vec3::new(0.6, 0.0, SKIN));
        assert!(character.is_supported());
        let dt = 1.0 / 60.0;

        let mut outcome = ResolveOutcome::default();
        for _ in 0..5 {
            character.set_linear_velocity(Vec3::new(3.0, 0.0, -0.16));
            outcome = resolve(&mut character, &mut world, dt, &stairs(), &QueryFilter::default(), &mut |_: &ContactAdded| {});
            if outcome.stair.stepped {
                break;
            }
        }
        assert!(outcome.stair.stepped);
        assert!((outcome.stair.vertical_delta - 0.25).abs() < 1e-3);
        assert!((character.position().z - (0.25 + SKIN)).abs() < 1e-3);
    }

    #[test]
    fn test_resolve_refuses_tall_obstruction() {
        let mut world = world_with_step(0.6);
        let mut character = character_at(&mut world, Vec3::new(0.6, 0.0, SKIN));
        let dt = 1.0 / 60.0;
        for _ in 0..10 {
            character.set_linear_velocity(Vec3::new(3.0, 0.0, -0.16));
            let outcome = resolve(&mut character, &mut world, dt, &stairs(), &QueryFilter::default(), &mut |_: &ContactAdded| {});
            assert!(!outcome.stair.stepped);
            assert_eq!(outcome.stair.vertical_delta, 0.0);
        }
        assert!(character.position().x < 0.7);
    }

    #[test]
    fn test_resolve_sticks_to_floor_off_ledge() {
        // Standing on a raised block, walking off its edge onto the floor 0.3 below
        let mut world = BoxWorld::new();
        world.add_static(AaBox::new(Vec3::new(-50.0, -50.0, -1.0), Vec3::new(50.0, 50.0, 0.0)));
        world.add_static(AaBox::new(Vec3::new(-5.0, -5.0, 0.0), Vec3::new(0.0, 5.0, 0.3)));
        let mut character = character_at(&mut world, Vec3::new(0.29, 0.0, 0.3 + SKIN));
        assert!(character.is_supported());

        let dt = 1.0 / 60.0;
        character.set_linear_velocity(Vec3::new(3.0, 0.0, -0.16));
        let outcome = resolve(&mut character, &mut world, dt, &stairs(), &QueryFilter::default(), &mut |_: &ContactAdded| {});
        assert!(outcome.stuck_to_floor);
        assert!((outcome.stair.vertical_delta + 0.3).abs() < 0.01);
        assert!(character.is_supported());
        assert!((character.position().z - SKIN).abs() < 1e-3);
    }

    #[test]
    fn test_resolve_without_stair_passes() {
        let mut world = world_with_step(0.25);
        let mut character = character_at(&mut world, Vec3::new(0.6, 0.0, SKIN));
        let config = StairConfig { walk_stairs_step_up: 0.0, stick_to_floor_step_down: 0.0, ..stairs() };
        for _ in 0..5 {
            character.set_linear_velocity(Vec3::new(3.0, 0.0, -0.16));
            let outcome = resolve(&mut character, &mut world, 1.0 / 60.0, &config, &QueryFilter::default(), &mut |_: &ContactAdded| {});
            assert_eq!(outcome, ResolveOutcome::default());
        }
    }
}
