pub mod cycle;
pub mod runner;
pub mod state;

pub use cycle::{CyclePhase, CycleReport};
pub use runner::{LoopHandle, VerificationLoop};
pub use state::{IdentityLabel, StateBoard, VerificationState};
