// Re-export all public modules so they can be used from main.rs and the tests
pub mod logging;
pub mod utils;
pub mod config;
pub mod error;

// Collision facade, data, and the movement pipeline on top of it
pub mod collision;
pub mod model;
pub mod controller;

pub use collision::{BoxWorld, CharacterVirtual, CollisionWorld};
pub use config::ControllerConfig;
pub use controller::{PlayerController, PlayerRig};
pub use error::{CollisionError, ControllerError};
