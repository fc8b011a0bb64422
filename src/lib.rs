//! Tousou - Real-time arcade chase simulation
//!
//! A player-controlled runner evades AI hunters on a tile grid while
//! survivor companions act on their own and timed missions spawn for bonus
//! score. This crate is the simulation core only: rendering, menus and
//! input devices live outside and talk to it through [`session::Session`],
//! reading the observable [`session::RoundState`] each frame.

pub mod core;
pub mod entity;
pub mod grid;
pub mod llm;
pub mod mission;
pub mod session;
pub mod simulation;

pub use crate::core::error::{GameError, Result};
