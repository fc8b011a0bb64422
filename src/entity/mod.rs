//! Simulated actors: the player, hunters, and survivor companions
//!
//! Entity behavior is dispatched on [`EntityKind`], a tagged union where
//! each variant carries only the AI scratch state its policy needs.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Facing, Vec2};

/// What a survivor companion is currently trying to do
///
/// The `Survive -> Surrender` transition is probabilistic and one-way for
/// the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurvivorIntent {
    Survive,
    Surrender,
}

/// Hunter AI scratch state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HunterState {
    /// Patrol or pursuit destination; cleared on arrival, on visible
    /// pursuit, and on stuck recovery
    pub target: Option<Vec2>,
    /// Consecutive ticks of wanting to move but going nowhere
    pub stuck_ticks: u32,
}

/// Survivor AI scratch state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivorState {
    pub intent: SurvivorIntent,
}

impl Default for SurvivorState {
    fn default() -> Self {
        Self {
            intent: SurvivorIntent::Survive,
        }
    }
}

/// Per-kind tag and AI state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Hunter(HunterState),
    Survivor(SurvivorState),
}

/// One simulated actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// World position of the tile-footprint top-left corner
    pub position: Vec2,
    /// Displacement magnitude per tick, fixed at spawn
    pub speed: f32,
    pub facing: Facing,
    /// True iff the last resolved displacement was non-zero on some axis
    pub is_moving: bool,
    /// Cosmetic skin color, player-customizable
    pub color: Option<String>,
}

impl Entity {
    pub fn player(position: Vec2, speed: f32, color: String) -> Self {
        Self {
            id: EntityId::new(),
            kind: EntityKind::Player,
            position,
            speed,
            facing: Facing::Down,
            is_moving: false,
            color: Some(color),
        }
    }

    pub fn hunter(position: Vec2, speed: f32) -> Self {
        Self {
            id: EntityId::new(),
            kind: EntityKind::Hunter(HunterState::default()),
            position,
            speed,
            facing: Facing::Down,
            is_moving: false,
            color: None,
        }
    }

    pub fn survivor(position: Vec2, speed: f32) -> Self {
        Self {
            id: EntityId::new(),
            kind: EntityKind::Survivor(SurvivorState::default()),
            position,
            speed,
            facing: Facing::Down,
            is_moving: false,
            color: None,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player)
    }

    pub fn is_hunter(&self) -> bool {
        matches!(self.kind, EntityKind::Hunter(_))
    }

    pub fn is_survivor(&self) -> bool {
        matches!(self.kind, EntityKind::Survivor(_))
    }

    pub fn hunter_state_mut(&mut self) -> Option<&mut HunterState> {
        match &mut self.kind {
            EntityKind::Hunter(h) => Some(h),
            _ => None,
        }
    }

    pub fn survivor_state_mut(&mut self) -> Option<&mut SurvivorState> {
        match &mut self.kind {
            EntityKind::Survivor(s) => Some(s),
            _ => None,
        }
    }
}
