//! Survivor companion policy
//!
//! A survivor either plays to survive (flee visible hunters, otherwise
//! meander) or has decided to turn itself in and walks to the jishu box.
//! The decision is a small per-tick probability and never reverses within
//! a round.

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::core::config::Tuning;
use crate::core::types::{Facing, Vec2, TILE_SIZE};
use crate::entity::{Entity, SurvivorIntent};
use crate::grid::{resolve_move, ObstacleMap};

/// What became of the survivor this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurvivorStep {
    /// Still in play
    Stayed,
    /// Reached the jishu box; remove from the roster, no score change
    Exited,
}

/// Advance one survivor by one tick.
///
/// `hunter_positions` is the pre-pass snapshot of hunter locations; the
/// flee decision tolerates positions up to one tick stale.
pub fn drive_survivor(
    entity: &mut Entity,
    hunter_positions: &[Vec2],
    jishu_box: Vec2,
    obstacles: &ObstacleMap,
    tuning: &Tuning,
) -> SurvivorStep {
    let mut rng = rand::thread_rng();

    let id = entity.id;
    let intent = {
        let state = entity
            .survivor_state_mut()
            .expect("drive_survivor on non-survivor");
        if state.intent == SurvivorIntent::Survive
            && rng.gen_bool(tuning.survivor_defect_chance)
        {
            state.intent = SurvivorIntent::Surrender;
            tracing::debug!(%id, "survivor decided to turn itself in");
        }
        state.intent
    };

    let mut dx = 0.0;
    let mut dy = 0.0;

    match intent {
        SurvivorIntent::Surrender => {
            if entity.position.distance(&jishu_box) < tuning.survivor_exit_radius {
                return SurvivorStep::Exited;
            }
            let dir = entity.position.toward(&jishu_box);
            dx = dir.x * entity.speed;
            dy = dir.y * entity.speed;
        }
        SurvivorIntent::Survive => {
            let nearest = hunter_positions
                .iter()
                .min_by_key(|h| OrderedFloat(entity.position.distance(h)));
            let flee_radius = tuning.hunter_vision * tuning.survivor_flee_vision_scale;

            match nearest {
                Some(hunter) if entity.position.distance(hunter) < flee_radius => {
                    let dir = hunter.toward(&entity.position);
                    dx = dir.x * entity.speed;
                    dy = dir.y * entity.speed;
                }
                _ => {
                    // Idle-biased meandering: rarely turn, sometimes step
                    if rng.gen_bool(tuning.wander_turn_chance) {
                        entity.facing = Facing::ALL[rng.gen_range(0..Facing::ALL.len())];
                    }
                    if rng.gen_bool(tuning.wander_step_chance) {
                        let step = entity.facing.unit();
                        let speed = entity.speed * tuning.wander_speed_scale;
                        dx = step.x * speed;
                        dy = step.y * speed;
                    }
                }
            }
        }
    }

    let result = resolve_move(entity.position, dx, dy, obstacles);
    entity.position = result.position;

    // Corner-trap escape: a survivor that wants to move but went nowhere
    // jitters out, skipping the collision gate
    let wants_to_move = intent == SurvivorIntent::Surrender || dx.abs() > 0.1;
    if wants_to_move && !result.moved() {
        entity.position.x += (rng.gen::<f32>() - 0.5) * TILE_SIZE;
        entity.position.y += (rng.gen::<f32>() - 0.5) * TILE_SIZE;
    }

    if result.moved() {
        entity.facing = Facing::from_vector(dx, dy);
    }
    entity.is_moving = result.moved();

    SurvivorStep::Stayed
}
