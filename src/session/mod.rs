//! Session state machine and round lifecycle
//!
//! A session sits in `Idle` with editable settings until `start` freezes a
//! copy of them, rebuilds the round state from scratch, and flips to
//! `Playing`. The simulation step and the per-second clock both run only
//! while playing; every terminal status goes back to `Idle` through an
//! explicit `reset` that keeps the settings.

pub mod settings;

pub use settings::{Difficulty, GameSettings, MapTheme, HORDE_HUNTER_COUNT};

use std::sync::Arc;

use rand::Rng;

use crate::core::config::Tuning;
use crate::core::types::{tile_origin, MissionId, Tick, Vec2, MAP_HEIGHT, MAP_WIDTH};
use crate::entity::Entity;
use crate::grid::ObstacleMap;
use crate::llm::narrative::{NarrativeProvider, StaticNarrative};
use crate::llm::tactics::{TacticsLink, TacticsProvider};
use crate::mission::MissionBoard;
use crate::simulation::input::InputFrame;
use crate::simulation::tick::{run_round_tick, RoundEvent};

/// Top-level session status gating the simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Menu; settings editable, nothing simulated
    Idle,
    Playing,
    /// A hunter grabbed the runner; the score is forfeited
    Caught,
    /// Time ran out with the runner free; the score stands
    Won,
    /// The runner banked the score at the jishu box
    Surrendered,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameStatus::Caught | GameStatus::Won | GameStatus::Surrendered
        )
    }
}

/// The observable round state, rebuilt from scratch on every start
///
/// Owned and mutated exclusively by the session's thread; renderers read
/// it through [`Session::state`].
#[derive(Debug)]
pub struct RoundState {
    pub status: GameStatus,
    /// Round nonce; stale async replies are matched against it
    pub round: u64,
    /// Frames since round start
    pub tick: Tick,
    /// Seconds left on the clock
    pub time_remaining: u32,
    /// Prize money; non-decreasing while playing
    pub score: u64,
    /// All actors, runner first
    pub entities: Vec<Entity>,
    pub missions: MissionBoard,
    pub obstacles: ObstacleMap,
    /// Surrender point location
    pub jishu_box: Vec2,
    /// Runner is close enough to the box to surrender
    pub can_surrender: bool,
    /// Active mission currently within reach of the runner, if any
    pub nearby_mission: Option<MissionId>,
    pub survivors_remaining: usize,
    /// Frozen copy of the settings this round was started with
    pub settings: GameSettings,
}

impl RoundState {
    /// Empty menu state
    pub fn idle(settings: GameSettings) -> Self {
        Self {
            status: GameStatus::Idle,
            round: 0,
            tick: 0,
            time_remaining: settings.duration,
            score: 0,
            entities: Vec::new(),
            missions: MissionBoard::new(),
            obstacles: ObstacleMap::empty(),
            jishu_box: Vec2::default(),
            can_surrender: false,
            nearby_mission: None,
            survivors_remaining: 0,
            settings,
        }
    }

    /// Build a fresh playing round: obstacles, jishu box, and the full
    /// roster
    pub fn new_round(settings: &GameSettings, tuning: &Tuning, round: u64) -> Self {
        let mut rng = rand::thread_rng();

        let mut obstacles = ObstacleMap::generate(tuning.obstacle_count);

        // The box and its surroundings stay open so it is always
        // reachable, hunters included
        let box_tile = (
            rng.gen_range(10..MAP_WIDTH),
            rng.gen_range(10..MAP_HEIGHT),
        );
        obstacles.clear_neighborhood(box_tile.0, box_tile.1);

        let entities = spawn_roster(settings, tuning, &mut rng);
        let survivors_remaining = settings.survivor_count;

        Self {
            status: GameStatus::Playing,
            round,
            tick: 0,
            time_remaining: settings.duration,
            score: 0,
            entities,
            missions: MissionBoard::new(),
            obstacles,
            jishu_box: tile_origin(box_tile.0, box_tile.1),
            can_surrender: false,
            nearby_mission: None,
            survivors_remaining,
            settings: settings.clone(),
        }
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.is_player())
    }

    pub fn hunters(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_hunter())
    }

    pub fn survivors(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_survivor())
    }
}

/// Fixed perimeter and center posts used when the hunter pack is small
const HUNTER_POSTS: [(i32, i32); 8] = [
    (MAP_WIDTH - 2, MAP_HEIGHT - 2),
    (MAP_WIDTH - 2, 2),
    (2, MAP_HEIGHT - 2),
    (MAP_WIDTH / 2, MAP_HEIGHT / 2),
    (MAP_WIDTH - 10, 10),
    (10, MAP_HEIGHT - 10),
    (MAP_WIDTH / 2, 2),
    (2, MAP_HEIGHT / 2),
];

fn spawn_roster(settings: &GameSettings, tuning: &Tuning, rng: &mut impl Rng) -> Vec<Entity> {
    let mut entities = Vec::new();

    entities.push(Entity::player(
        tile_origin(2, 2),
        tuning.player_speed,
        settings.player_color.clone(),
    ));

    for _ in 0..settings.survivor_count {
        let tile = (rng.gen_range(10..30), rng.gen_range(10..30));
        entities.push(Entity::survivor(
            tile_origin(tile.0, tile.1),
            tuning.player_speed * tuning.survivor_speed_scale,
        ));
    }

    let hunter_count = settings.effective_hunter_count();
    let hunter_speed = settings.difficulty.base_hunter_speed();
    for i in 0..hunter_count {
        let tile = if hunter_count > 10 {
            // Mass packs spawn anywhere outside the runner's start corner
            let mut tile = (MAP_WIDTH - 1, MAP_HEIGHT - 1);
            for _ in 0..tuning.placement_attempts {
                let candidate = (rng.gen_range(0..MAP_WIDTH), rng.gen_range(0..MAP_HEIGHT));
                if candidate.0 > 10 || candidate.1 > 10 {
                    tile = candidate;
                    break;
                }
            }
            tile
        } else {
            HUNTER_POSTS[i % HUNTER_POSTS.len()]
        };
        entities.push(Entity::hunter(tile_origin(tile.0, tile.1), hunter_speed));
    }

    entities
}

/// Owns the round state and its provider plumbing.
///
/// All mutation happens through the methods below, on the caller's
/// thread; external providers only ever talk back through the tactics
/// inbox drained at the top of each tick.
pub struct Session {
    tuning: Tuning,
    state: RoundState,
    tactics: TacticsLink,
    narrative: Box<dyn NarrativeProvider>,
    /// Dedup guard for the mission cadence
    last_mission_second: Option<u32>,
}

impl Session {
    /// Session with default tuning, no tactician, pool-backed narrative
    pub fn new(settings: GameSettings) -> Self {
        Self::with_providers(settings, Tuning::default(), None, Box::new(StaticNarrative::new()))
    }

    pub fn with_tuning(settings: GameSettings, tuning: Tuning) -> Self {
        Self::with_providers(settings, tuning, None, Box::new(StaticNarrative::new()))
    }

    pub fn with_providers(
        settings: GameSettings,
        tuning: Tuning,
        tactics: Option<Arc<dyn TacticsProvider>>,
        narrative: Box<dyn NarrativeProvider>,
    ) -> Self {
        let tactics = match tactics {
            Some(provider) => TacticsLink::with_provider(provider),
            None => TacticsLink::disconnected(),
        };
        Self {
            tuning,
            state: RoundState::idle(settings),
            tactics,
            narrative,
            last_mission_second: None,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Direct round-state access for tools and tests. Renderers should
    /// stay on [`Session::state`].
    pub fn state_mut(&mut self) -> &mut RoundState {
        &mut self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &GameSettings {
        &self.state.settings
    }

    /// Replace the settings; only possible while idle
    pub fn set_settings(&mut self, settings: GameSettings) -> bool {
        if self.state.status != GameStatus::Idle {
            return false;
        }
        self.state.time_remaining = settings.duration;
        self.state.settings = settings;
        true
    }

    /// Freeze the settings and start a fresh round
    pub fn start(&mut self) {
        let round = self.state.round + 1;
        self.state = RoundState::new_round(&self.state.settings, &self.tuning, round);
        self.tactics.reset_round();
        self.last_mission_second = None;
        tracing::info!(
            round,
            difficulty = ?self.state.settings.difficulty,
            hunters = self.state.hunters().count(),
            survivors = self.state.survivors_remaining,
            "round started"
        );
    }

    /// Back to the menu. Clears the round but keeps settings and the
    /// round nonce, so late async replies from the discarded round still
    /// miss.
    pub fn reset(&mut self) {
        let round = self.state.round;
        let settings = self.state.settings.clone();
        self.state = RoundState::idle(settings);
        self.state.round = round;
        tracing::debug!("session reset to idle");
    }

    /// Bank the score at the jishu box. Only succeeds while playing
    /// within reach of the box.
    pub fn surrender(&mut self) -> bool {
        if self.state.status == GameStatus::Playing && self.state.can_surrender {
            self.state.status = GameStatus::Surrendered;
            tracing::info!(score = self.state.score, "runner surrendered and banked the score");
            true
        } else {
            false
        }
    }

    /// Spawn a mission from the narrative provider. The clock calls this
    /// on its cadence; external triggers may call it too.
    pub fn spawn_mission(&mut self) -> Option<MissionId> {
        if self.state.status != GameStatus::Playing {
            return None;
        }
        let seed = self.narrative.next_mission();
        Some(self.state.missions.spawn(
            seed,
            &self.state.obstacles,
            self.tuning.placement_attempts,
        ))
    }

    /// Complete an active mission (the runner interacted with it) and
    /// credit its reward
    pub fn complete_mission(&mut self, id: MissionId) -> Option<u64> {
        if self.state.status != GameStatus::Playing {
            return None;
        }
        let reward = self.state.missions.complete(id)?;
        self.state.score += reward;
        self.state.nearby_mission = None;
        tracing::info!(%reward, "mission completed");
        Some(reward)
    }

    /// Advance the simulation by one frame
    pub fn frame(&mut self, input: &InputFrame) -> Vec<RoundEvent> {
        run_round_tick(&mut self.state, input, &mut self.tactics, &self.tuning)
    }

    /// Advance the once-per-second clock: count down, pay out survival
    /// reward, spawn missions on the cadence, win at zero.
    pub fn second(&mut self) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        if self.state.status != GameStatus::Playing {
            return events;
        }

        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        self.state.score += self.tuning.reward_per_second;
        events.push(RoundEvent::SecondElapsed {
            time_remaining: self.state.time_remaining,
            score: self.state.score,
        });

        if self.state.time_remaining == 0 {
            self.state.status = GameStatus::Won;
            tracing::info!(score = self.state.score, "time up, runner wins");
            events.push(RoundEvent::RoundWon {
                score: self.state.score,
            });
            return events;
        }

        let t = self.state.time_remaining;
        if t < self.state.settings.duration
            && t % self.tuning.mission_interval == 0
            && self.last_mission_second != Some(t)
        {
            self.last_mission_second = Some(t);
            if let Some(id) = self.spawn_mission() {
                events.push(RoundEvent::MissionSpawned { id });
            }
        }

        events
    }
}
