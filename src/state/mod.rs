mod generation_state;
pub mod controller;

pub use controller::Controller;
pub use generation_state::{
    GenerationMachine,
    GenerationStatus,
    RequestOutcome,
    SettleOutcome,
};
