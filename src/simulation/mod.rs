//! Per-tick simulation: input integration, AI policies, orchestration

pub mod hunter;
pub mod input;
pub mod survivor;
pub mod tick;

pub use input::InputFrame;
pub use tick::{run_round_tick, RoundEvent};
