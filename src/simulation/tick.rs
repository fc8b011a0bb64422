//! Tick system - orchestrates one simulation step
//!
//! Fixed order every tick: drain tactics replies, integrate player input,
//! recompute proximity flags, maybe poll the tactician, then run the AI
//! pass over the roster. Removals are collected during the pass and
//! applied after it; a player catch aborts the pass on the spot and
//! nothing beyond that point is mutated.

use ahash::AHashSet;

use crate::core::config::Tuning;
use crate::core::types::{EntityId, Facing, MissionId, Vec2};
use crate::entity::EntityKind;
use crate::grid::resolve_move;
use crate::llm::tactics::TacticsLink;
use crate::session::{GameStatus, RoundState};
use crate::simulation::hunter::{drive_hunter, HunterContext, HunterStep};
use crate::simulation::input::InputFrame;
use crate::simulation::survivor::{drive_survivor, SurvivorStep};

/// Events generated while the round advances
///
/// Returned from the tick and clock entry points for the runner or a UI
/// event log; the observable state itself lives in [`RoundState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    /// A hunter grabbed the runner; the round is over
    PlayerCaught,
    /// A hunter grabbed a survivor companion
    SurvivorCaught { id: EntityId },
    /// A survivor reached the jishu box and left the round silently
    SurvivorExited { id: EntityId },
    /// The per-second clock advanced
    SecondElapsed { time_remaining: u32, score: u64 },
    /// A new mission went active
    MissionSpawned { id: MissionId },
    /// Time ran out with the runner free
    RoundWon { score: u64 },
}

/// Run a single simulation tick
///
/// No-op unless the round is playing. Returns the events of this tick in
/// the order they occurred.
pub fn run_round_tick(
    state: &mut RoundState,
    input: &InputFrame,
    tactics: &mut TacticsLink,
    tuning: &Tuning,
) -> Vec<RoundEvent> {
    let mut events = Vec::new();
    if state.status != GameStatus::Playing {
        return events;
    }
    state.tick += 1;

    // (a) merge whatever the tactician sent since last tick
    tactics.drain(state.round, tuning.tactics_backoff, &mut state.entities);

    // (b) the runner moves first
    let player_pos = integrate_player(state, input, tuning);

    // (c) proximity flags read by the UI and by hunter targeting
    state.can_surrender = player_pos.distance(&state.jishu_box) < tuning.surrender_radius;
    state.nearby_mission = state
        .missions
        .active()
        .filter(|m| player_pos.distance(&m.target) < tuning.mission_radius)
        .last()
        .map(|m| m.id);

    // (d) fire-and-forget tactics poll on its own cadence
    if state.settings.difficulty.llm_directed() {
        tactics.maybe_dispatch(
            state.round,
            state.tick,
            tuning.tactics_poll_ticks,
            player_pos,
            &state.entities,
        );
    }

    // (e) AI pass over a fixed snapshot of the roster order
    let vision = if state.settings.difficulty.llm_directed() {
        tuning.hunter_vision * tuning.tactician_vision_scale
    } else {
        tuning.hunter_vision
    };
    let hunter_snapshot: Vec<Vec2> = state
        .entities
        .iter()
        .filter(|e| e.is_hunter())
        .map(|e| e.position)
        .collect();
    let mission_targets: Vec<Vec2> = state.missions.active().map(|m| m.target).collect();

    let mut removed: AHashSet<EntityId> = AHashSet::default();

    for i in 0..state.entities.len() {
        if removed.contains(&state.entities[i].id) {
            continue;
        }
        match state.entities[i].kind {
            EntityKind::Player => {}
            EntityKind::Survivor(_) => {
                let step = drive_survivor(
                    &mut state.entities[i],
                    &hunter_snapshot,
                    state.jishu_box,
                    &state.obstacles,
                    tuning,
                );
                if step == SurvivorStep::Exited {
                    let id = state.entities[i].id;
                    removed.insert(id);
                    state.survivors_remaining = state.survivors_remaining.saturating_sub(1);
                    events.push(RoundEvent::SurvivorExited { id });
                }
            }
            EntityKind::Hunter(_) => {
                let survivors_now: Vec<(EntityId, Vec2)> = state
                    .entities
                    .iter()
                    .filter(|e| e.is_survivor() && !removed.contains(&e.id))
                    .map(|e| (e.id, e.position))
                    .collect();
                let ctx = HunterContext {
                    player_pos,
                    survivors: &survivors_now,
                    jishu_box: state.jishu_box,
                    can_surrender: state.can_surrender,
                    mission_targets: &mission_targets,
                    vision,
                    obstacles: &state.obstacles,
                };
                match drive_hunter(&mut state.entities[i], &ctx, tuning) {
                    HunterStep::Roamed => {}
                    HunterStep::CaughtSurvivor(id) => {
                        removed.insert(id);
                        state.survivors_remaining = state.survivors_remaining.saturating_sub(1);
                        events.push(RoundEvent::SurvivorCaught { id });
                    }
                    HunterStep::CaughtPlayer => {
                        state.status = GameStatus::Caught;
                        state.score = 0;
                        events.push(RoundEvent::PlayerCaught);
                        tracing::info!(tick = state.tick, "runner caught");
                        break;
                    }
                }
            }
        }
    }

    // (f) commit removals after the pass; indexes never shifted mid-loop
    if !removed.is_empty() {
        state.entities.retain(|e| !removed.contains(&e.id));
    }

    events
}

/// Apply input to the runner and return its updated position
fn integrate_player(state: &mut RoundState, input: &InputFrame, tuning: &Tuning) -> Vec2 {
    let intent = input.intent();
    let player = state
        .entities
        .iter_mut()
        .find(|e| e.is_player())
        .expect("playing round without a player entity");

    let result = resolve_move(
        player.position,
        intent.x * tuning.player_speed,
        intent.y * tuning.player_speed,
        &state.obstacles,
    );
    player.position = result.position;
    player.is_moving = intent.length() > 0.1;
    if player.is_moving {
        player.facing = Facing::from_vector(intent.x, intent.y);
    }
    player.position
}
