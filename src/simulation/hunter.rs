//! Hunter pursuit and patrol policy
//!
//! Priority order each tick: catch whatever is already in grabbing range,
//! else chase the nearest visible target, else walk a patrol target that
//! drifts toward wherever the runner is likely to be (the jishu box while
//! the runner can surrender, active missions otherwise), else roam.

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::core::config::Tuning;
use crate::core::types::{tile_origin, EntityId, Facing, Vec2, MAP_HEIGHT, MAP_WIDTH, TILE_SIZE};
use crate::entity::Entity;
use crate::grid::{resolve_move, ObstacleMap};

/// Everything a hunter reads while deciding its tick
pub struct HunterContext<'a> {
    pub player_pos: Vec2,
    /// Remaining survivors (already-removed ones excluded)
    pub survivors: &'a [(EntityId, Vec2)],
    pub jishu_box: Vec2,
    /// The runner is currently close enough to the box to surrender
    pub can_surrender: bool,
    /// Target positions of active missions
    pub mission_targets: &'a [Vec2],
    /// Effective vision radius (difficulty scaling applied)
    pub vision: f32,
    pub obstacles: &'a ObstacleMap,
}

/// Outcome of one hunter tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunterStep {
    Roamed,
    /// The round ends immediately
    CaughtPlayer,
    /// Remove this survivor and keep processing
    CaughtSurvivor(EntityId),
}

#[derive(Clone, Copy)]
enum Quarry {
    Player,
    Survivor(EntityId),
}

/// Advance one hunter by one tick
pub fn drive_hunter(entity: &mut Entity, ctx: &HunterContext<'_>, tuning: &Tuning) -> HunterStep {
    let mut rng = rand::thread_rng();

    // Nearest candidate among the player and every remaining survivor
    let mut quarry = Quarry::Player;
    let mut quarry_pos = ctx.player_pos;
    let mut quarry_dist = entity.position.distance(&ctx.player_pos);
    if let Some((id, pos)) = ctx
        .survivors
        .iter()
        .min_by_key(|(_, pos)| OrderedFloat(entity.position.distance(pos)))
    {
        let d = entity.position.distance(pos);
        if d < quarry_dist {
            quarry = Quarry::Survivor(*id);
            quarry_pos = *pos;
            quarry_dist = d;
        }
    }

    // Grab before moving
    if quarry_dist < tuning.catch_radius {
        return match quarry {
            Quarry::Player => HunterStep::CaughtPlayer,
            Quarry::Survivor(id) => HunterStep::CaughtSurvivor(id),
        };
    }

    let mut dx = 0.0;
    let mut dy = 0.0;

    let (mut target, mut stuck_ticks) = {
        let state = entity
            .hunter_state_mut()
            .expect("drive_hunter on non-hunter");
        (state.target, state.stuck_ticks)
    };

    if quarry_dist < ctx.vision {
        // Direct pursuit overrides any patrol plan
        let dir = entity.position.toward(&quarry_pos);
        dx = dir.x * entity.speed;
        dy = dir.y * entity.speed;
        target = None;
    } else {
        if target.is_none() || rng.gen_bool(tuning.hunter_retarget_chance) {
            target = Some(pick_patrol_target(ctx, tuning, &mut rng));
        }

        if let Some(t) = target {
            if entity.position.distance(&t) > tuning.patrol_arrival_radius {
                let dir = entity.position.toward(&t);
                dx = dir.x * entity.speed;
                dy = dir.y * entity.speed;
            } else {
                target = None;
            }
        }
    }

    let result = resolve_move(entity.position, dx, dy, ctx.obstacles);
    entity.position = result.position;

    let wants_to_move = dx.abs() > 0.1 || dy.abs() > 0.1;
    if wants_to_move && !result.moved() {
        stuck_ticks += 1;
    } else {
        stuck_ticks = 0;
    }

    if stuck_ticks > tuning.stuck_tick_limit {
        // Wedged against geometry: drop the plan and hop sideways
        target = None;
        stuck_ticks = 0;
        entity.position.x += (rng.gen::<f32>() - 0.5) * TILE_SIZE;
        tracing::debug!(id = %entity.id, "hunter stuck recovery");
    }

    // Facing follows the desired push, not the resolved one; ties keep
    // the previous facing
    if let Some(facing) = Facing::from_vector_dominant(dx, dy) {
        entity.facing = facing;
    }
    entity.is_moving = result.moved();

    if let Some(h) = entity.hunter_state_mut() {
        h.target = target;
        h.stuck_ticks = stuck_ticks;
    }

    HunterStep::Roamed
}

/// Choose a patrol destination by priority: swarm the jishu box while the
/// runner can surrender, camp an active mission, else roam anywhere.
/// Jitter keeps converging hunters from stacking on one point.
fn pick_patrol_target(ctx: &HunterContext<'_>, tuning: &Tuning, rng: &mut impl Rng) -> Vec2 {
    if ctx.can_surrender && rng.gen_bool(tuning.box_swarm_chance) {
        return Vec2::new(
            ctx.jishu_box.x + (rng.gen::<f32>() - 0.5) * TILE_SIZE * 4.0,
            ctx.jishu_box.y + (rng.gen::<f32>() - 0.5) * TILE_SIZE * 4.0,
        );
    }

    if !ctx.mission_targets.is_empty() && rng.gen_bool(tuning.mission_camp_chance) {
        let m = ctx.mission_targets[rng.gen_range(0..ctx.mission_targets.len())];
        return Vec2::new(
            m.x + (rng.gen::<f32>() - 0.5) * TILE_SIZE * 3.0,
            m.y + (rng.gen::<f32>() - 0.5) * TILE_SIZE * 3.0,
        );
    }

    tile_origin(
        rng.gen_range(1..MAP_WIDTH - 1),
        rng.gen_range(1..MAP_HEIGHT - 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn hunter_at(tile: (i32, i32)) -> Entity {
        Entity::hunter(tile_origin(tile.0, tile.1), 4.8)
    }

    fn base_ctx<'a>(obstacles: &'a ObstacleMap, player: Vec2) -> HunterContext<'a> {
        HunterContext {
            player_pos: player,
            survivors: &[],
            jishu_box: tile_origin(35, 35),
            can_surrender: false,
            mission_targets: &[],
            vision: Tuning::default().hunter_vision,
            obstacles,
        }
    }

    fn hunter_target(e: &mut Entity) -> Option<Vec2> {
        e.hunter_state_mut().map(|h| h.target).unwrap()
    }

    #[test]
    fn test_catches_player_in_grab_range() {
        let obstacles = ObstacleMap::empty();
        let mut h = hunter_at((10, 10));
        let ctx = base_ctx(&obstacles, h.position);
        assert_eq!(drive_hunter(&mut h, &ctx, &Tuning::default()), HunterStep::CaughtPlayer);
    }

    #[test]
    fn test_catches_nearer_survivor_first() {
        let obstacles = ObstacleMap::empty();
        let mut h = hunter_at((10, 10));
        let survivor_id = EntityId::new();
        let survivors = [(survivor_id, h.position)];
        let mut ctx = base_ctx(&obstacles, tile_origin(30, 30));
        ctx.survivors = &survivors;

        assert_eq!(
            drive_hunter(&mut h, &ctx, &Tuning::default()),
            HunterStep::CaughtSurvivor(survivor_id)
        );
    }

    #[test]
    fn test_visible_pursuit_closes_distance_and_drops_patrol() {
        let obstacles = ObstacleMap::empty();
        let mut h = hunter_at((10, 10));
        h.hunter_state_mut().unwrap().target = Some(tile_origin(1, 1));
        let player = tile_origin(13, 10); // inside vision, outside grab
        let ctx = base_ctx(&obstacles, player);

        let before = h.position.distance(&player);
        let step = drive_hunter(&mut h, &ctx, &Tuning::default());
        assert_eq!(step, HunterStep::Roamed);
        assert!(h.position.distance(&player) < before);
        assert_eq!(hunter_target(&mut h), None);
        assert_eq!(h.facing, Facing::Right);
    }

    #[test]
    fn test_patrol_target_cleared_on_arrival() {
        let obstacles = ObstacleMap::empty();
        let mut tuning = Tuning::default();
        tuning.hunter_retarget_chance = 0.0;
        let mut h = hunter_at((10, 10));
        // Already within the arrival radius
        h.hunter_state_mut().unwrap().target = Some(h.position + Vec2::new(10.0, 0.0));
        let ctx = base_ctx(&obstacles, tile_origin(39, 39));

        drive_hunter(&mut h, &ctx, &tuning);
        assert_eq!(hunter_target(&mut h), None);
        assert!(!h.is_moving);
    }

    #[test]
    fn test_box_swarm_bias_when_runner_can_surrender() {
        let obstacles = ObstacleMap::empty();
        let mut tuning = Tuning::default();
        tuning.box_swarm_chance = 1.0;
        let mut h = hunter_at((10, 10));
        let mut ctx = base_ctx(&obstacles, tile_origin(39, 39));
        ctx.can_surrender = true;

        drive_hunter(&mut h, &ctx, &tuning);
        let target = hunter_target(&mut h).expect("patrol target assigned");
        // Box plus at most two tiles of jitter per axis
        assert!(target.distance(&ctx.jishu_box) <= TILE_SIZE * 4.0);
    }

    #[test]
    fn test_mission_camp_bias() {
        let obstacles = ObstacleMap::empty();
        let mut tuning = Tuning::default();
        tuning.mission_camp_chance = 1.0;
        let mut h = hunter_at((10, 10));
        let missions = [tile_origin(25, 25)];
        let mut ctx = base_ctx(&obstacles, tile_origin(39, 39));
        ctx.mission_targets = &missions;

        drive_hunter(&mut h, &ctx, &tuning);
        let target = hunter_target(&mut h).expect("patrol target assigned");
        assert!(target.distance(&missions[0]) <= TILE_SIZE * 3.0);
    }

    #[test]
    fn test_stuck_recovery_bounded() {
        // Walled-in hunter with a far patrol target: within a bounded
        // number of ticks it must drop the target and jitter free
        let mut obstacles = ObstacleMap::empty();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if (dx, dy) != (0, 0) {
                    obstacles.insert(20 + dx, 20 + dy);
                }
            }
        }
        let mut tuning = Tuning::default();
        tuning.hunter_retarget_chance = 0.0;
        let mut h = Entity::hunter(tile_origin(20, 20), 20.0);
        h.hunter_state_mut().unwrap().target = Some(tile_origin(1, 20));
        let ctx = HunterContext {
            player_pos: tile_origin(39, 39),
            survivors: &[],
            jishu_box: tile_origin(35, 35),
            can_surrender: false,
            mission_targets: &[],
            vision: tuning.hunter_vision,
            obstacles: &obstacles,
        };

        let start_x = h.position.x;
        let mut recovered = false;
        for _ in 0..(tuning.stuck_tick_limit + 5) {
            drive_hunter(&mut h, &ctx, &tuning);
            if h.hunter_state_mut().unwrap().stuck_ticks == 0 && h.position.x != start_x {
                recovered = true;
                break;
            }
        }
        assert!(recovered, "hunter never escaped the corner trap");
    }

    #[test]
    fn test_kind_preserved_across_ticks() {
        let obstacles = ObstacleMap::empty();
        let mut h = hunter_at((10, 10));
        let ctx = base_ctx(&obstacles, tile_origin(39, 39));
        drive_hunter(&mut h, &ctx, &Tuning::default());
        assert!(matches!(h.kind, EntityKind::Hunter(_)));
    }
}
