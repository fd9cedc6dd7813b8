// MODEL: Controller data
pub mod shape;
pub mod state;
pub mod input;
pub mod contact;

pub use shape::{CapsuleShape, ShapeMode, ShapeSet};
pub use state::{ControllerState, PoseSnapshot, StairStepResult, UpdateEvents, UpdateOutput};
pub use input::{CameraBasis, MovementInput, MovementIntent};
pub use contact::{ContactEvent, ContactRecorder};
