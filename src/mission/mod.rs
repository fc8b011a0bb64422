//! Timed bonus objectives with a physical on-map target
//!
//! Missions are spawned on the in-round cadence, flagged active until
//! completed, and never deleted from the board. Completion credits the
//! mission's reward once; abandoned missions simply stay active until the
//! round ends and the board is discarded.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{tile_origin, MissionId, Vec2, MAP_HEIGHT, MAP_WIDTH};
use crate::grid::ObstacleMap;

/// Display text and reward for a mission, produced by a narrative provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionSeed {
    pub title: String,
    pub description: String,
    pub reward: u64,
}

/// One objective marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    /// Display-only, opaque to the simulation
    pub title: String,
    pub description: String,
    /// Bonus credited on completion
    pub reward: u64,
    pub active: bool,
    pub completed: bool,
    /// Objective location, placed off obstacle tiles at spawn
    pub target: Vec2,
}

/// All missions spawned this round
#[derive(Debug, Clone, Default)]
pub struct MissionBoard {
    missions: Vec<Mission>,
}

impl MissionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a mission at a random non-obstacle tile.
    ///
    /// Rejection sampling with a bounded attempt budget; once exhausted
    /// the last candidate is accepted unverified rather than spinning.
    pub fn spawn(&mut self, seed: MissionSeed, obstacles: &ObstacleMap, attempts: u32) -> MissionId {
        let mut rng = rand::thread_rng();
        let mut tx = 2;
        let mut ty = 2;
        for _ in 0..attempts.max(1) {
            tx = rng.gen_range(2..MAP_WIDTH - 2);
            ty = rng.gen_range(2..MAP_HEIGHT - 2);
            if !obstacles.is_blocked(tx, ty) {
                break;
            }
        }

        self.spawn_at(seed, tile_origin(tx, ty))
    }

    /// Spawn a mission at an explicit location (scripted objectives)
    pub fn spawn_at(&mut self, seed: MissionSeed, target: Vec2) -> MissionId {
        let mission = Mission {
            id: MissionId::new(),
            title: seed.title,
            description: seed.description,
            reward: seed.reward,
            active: true,
            completed: false,
            target,
        };
        let id = mission.id;
        tracing::debug!(mission = %mission.title, target = ?mission.target.tile(), "mission spawned");
        self.missions.push(mission);
        id
    }

    /// Flag a mission completed and return its reward.
    ///
    /// Returns `None` when the id is unknown or the mission was already
    /// completed, so double completion never double-credits.
    pub fn complete(&mut self, id: MissionId) -> Option<u64> {
        let mission = self.missions.iter_mut().find(|m| m.id == id)?;
        if mission.completed {
            return None;
        }
        mission.active = false;
        mission.completed = true;
        Some(mission.reward)
    }

    pub fn get(&self, id: MissionId) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// Missions still worth visiting
    pub fn active(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter().filter(|m| m.active && !m.completed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }
}
