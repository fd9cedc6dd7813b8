// CONTROLLER: Movement pipeline and the player facade
pub mod integrator;
pub mod resolver;
pub mod smoother;
pub mod player;
pub mod rig;

pub use integrator::JumpLatch;
pub use resolver::{resolve, ResolveOutcome};
pub use smoother::CameraSmoother;
pub use player::{Lifecycle, PlayerController};
pub use rig::{Locomotion, PlayerRig, SeatBinding};
