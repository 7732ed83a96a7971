pub mod config;
pub mod engine;
pub mod hold;

mod code;
mod sweep;
mod validate;

pub use config::EngineConfig;
pub use engine::{AllocationEngine, HoldError};
pub use hold::SeatHold;
