use std::env;
use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use tracing::{debug, error, info, warn};

// Import from the library crate
use kinematic_player::{
    logging,
    collision::{aa_box::AaBox, BoxWorld, OwnerTag},
    config::ControllerConfig,
    controller::PlayerController,
    model::{CameraBasis, MovementIntent},
};

const DT: f32 = 1.0 / 60.0;
const DEFAULT_TICKS: u32 = 240;
const JUMP_TICK: u32 = 200;

/// A floor, a short flight of stairs, a trigger volume on the landing and a wall at the end.
fn build_world() -> BoxWorld {
    let mut world = BoxWorld::new();
    world.add_static(AaBox::new(Vec3::new(-20.0, -20.0, -1.0), Vec3::new(40.0, 20.0, 0.0)));
    for (i, x) in [2.0f32, 2.3, 2.6].into_iter().enumerate() {
        let top = 0.2 * (i + 1) as f32;
        world.add_static(AaBox::new(Vec3::new(x, -2.0, 0.0), Vec3::new(12.0, 2.0, top)));
    }
    let trigger = world.add_sensor(AaBox::new(Vec3::new(6.0, -2.0, 0.6), Vec3::new(7.0, 2.0, 3.0)));
    if let Err(err) = world.set_owner(trigger, OwnerTag::new(1)) {
        warn!(%err, "could not tag trigger volume");
    }
    world.add_static(AaBox::new(Vec3::new(11.0, -2.0, 0.6), Vec3::new(12.0, 2.0, 4.0)));
    world
}

fn main() {
    logging::init();

    let ticks = match env::args().nth(1) {
        Some(arg) => arg.parse::<u32>().unwrap_or_else(|err| {
            warn!(%arg, %err, "invalid tick count, using {DEFAULT_TICKS}");
            DEFAULT_TICKS
        }),
        None => DEFAULT_TICKS,
    };

    let mut world = build_world();
    let mut player = PlayerController::new(ControllerConfig::default());
    let spawn_eye = Vec3::new(0.0, 0.0, 1.67 + 1.0e-3);
    if let Err(err) = player.init(&mut world, spawn_eye) {
        error!(%err, "failed to spawn player");
        return;
    }
    info!(ticks, "running headless simulation at 60 Hz");

    // Facing +X
    let basis = CameraBasis::from_yaw(-FRAC_PI_2);

    for tick in 0..ticks {
        let now = f64::from(tick) * f64::from(DT);
        world.step(DT);

        let intent = MovementIntent {
            move_axis: Vec2::new(0.0, 1.0),
            vertical: 0.0,
            run: false,
            jump: tick == JUMP_TICK,
        };
        player.apply_intent(&intent, &basis, now);
        let out = player.update(&mut world, DT, now);

        if out.events.jumped {
            info!(tick, "jumped");
        }
        if out.stair.stepped {
            info!(tick, dz = out.stair.vertical_delta, offset = player.camera_offset(), "stepped up");
        }
        for contact in player.drain_contacts() {
            debug!(tick, owner = contact.owner.get(), body = ?contact.body, "contact");
        }
        if tick % 30 == 0 {
            let pose = player.pose_snapshot();
            info!(
                tick,
                camera = ?out.camera_position,
                velocity = ?pose.linear_velocity,
                on_ground = out.on_ground,
                "pose"
            );
        }
    }

    let state = player.state();
    info!(position = ?state.position, on_ground = state.on_ground, "simulation finished");
    player.shutdown();
}
