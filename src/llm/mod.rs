//! External advisor integration
//!
//! Two pluggable providers feed the simulation: a tactics provider that
//! suggests hunter destinations, and a narrative provider that supplies
//! mission flavor text. Both are advisory; the round runs identically with
//! them absent, slow, or failing.

pub mod client;
pub mod narrative;
pub mod tactics;

pub use client::LlmClient;
pub use narrative::{NarrativeProvider, StaticNarrative};
pub use tactics::{
    LlmTactics, TacticsLink, TacticsPlan, TacticsProvider, TacticsRequest,
};
