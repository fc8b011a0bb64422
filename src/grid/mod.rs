//! Tile grid obstacles and collision resolution

pub mod collision;

pub use collision::{position_blocked, resolve_move, MoveResult};

use ahash::AHashSet;
use rand::Rng;

use crate::core::types::{MAP_HEIGHT, MAP_WIDTH};

/// Blocked tiles for one round, rebuilt on every round start
#[derive(Debug, Clone, Default)]
pub struct ObstacleMap {
    blocked: AHashSet<(i32, i32)>,
}

impl ObstacleMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sample `count` obstacle tiles uniformly across the map, leaving the
    /// player spawn corner (tiles with both coordinates <= 5) clear.
    ///
    /// Samples landing in the spawn corner are dropped, not re-rolled, so
    /// the actual obstacle count is usually slightly below `count`.
    pub fn generate(count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let mut blocked = AHashSet::default();
        for _ in 0..count {
            let x = rng.gen_range(0..MAP_WIDTH);
            let y = rng.gen_range(0..MAP_HEIGHT);
            if x > 5 || y > 5 {
                blocked.insert((x, y));
            }
        }
        Self { blocked }
    }

    pub fn is_blocked(&self, tx: i32, ty: i32) -> bool {
        self.blocked.contains(&(tx, ty))
    }

    pub fn insert(&mut self, tx: i32, ty: i32) {
        self.blocked.insert((tx, ty));
    }

    /// Clear the 3x3 neighborhood around a tile. Used for the jishu box so
    /// the box stays reachable and hunters can enter.
    pub fn clear_neighborhood(&mut self, tx: i32, ty: i32) {
        for dx in -1..=1 {
            for dy in -1..=1 {
                self.blocked.remove(&(tx + dx, ty + dy));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Blocked tiles, for renderers and minimaps
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.blocked.iter().copied()
    }
}
