//! Simulation tuning with documented constants
//!
//! All magic numbers of the chase loop are collected here with notes on
//! their purpose and how they interact. A round takes an immutable copy at
//! start; the values never change mid-round.

use std::time::Duration;

use crate::core::types::TILE_SIZE;

/// Tuning knobs for the chase simulation
///
/// These values are balanced for a 40x40 map at ~60 ticks per second.
/// Changing them shifts pacing and difficulty feel.
#[derive(Debug, Clone)]
pub struct Tuning {
    // === MOVEMENT ===
    /// Player displacement per tick (world units)
    pub player_speed: f32,

    /// Survivor speed as a fraction of player speed
    ///
    /// Slightly below 1.0 so a fleeing survivor can be run down by
    /// hunters but still feels mobile.
    pub survivor_speed_scale: f32,

    // === DETECTION ===
    /// Distance inside which a hunter sees a target and switches to
    /// direct pursuit (world units)
    pub hunter_vision: f32,

    /// Vision multiplier while the LLM tactician is directing hunters
    ///
    /// Below 1.0: the external hints compensate for weaker local sight.
    pub tactician_vision_scale: f32,

    /// Survivors start fleeing at `hunter_vision * this`
    ///
    /// Above 1.0 so survivors break away before the hunter actually
    /// locks on.
    pub survivor_flee_vision_scale: f32,

    /// Distance below which a hunter catches its target (world units)
    pub catch_radius: f32,

    /// Player distance to the jishu box that enables surrendering
    pub surrender_radius: f32,

    /// Player distance to an active mission that flags it nearby
    pub mission_radius: f32,

    /// Distance at which a surrendering survivor reaches the box and
    /// leaves the round
    pub survivor_exit_radius: f32,

    /// Distance at which a patrolling hunter considers its target reached
    pub patrol_arrival_radius: f32,

    // === SCORING ===
    /// Prize money credited per surviving second
    pub reward_per_second: u64,

    // === MAP GENERATION ===
    /// Obstacle tiles sampled at round start
    pub obstacle_count: usize,

    /// Bounded attempts for rejection-sampled placement (missions,
    /// obstacles around reserved areas). After this many tries the last
    /// candidate is accepted unverified rather than looping forever.
    pub placement_attempts: u32,

    // === SURVIVOR BEHAVIOR ===
    /// Per-tick chance a surviving companion decides to turn itself in
    ///
    /// One-way transition. At 0.0005 and 60 ticks/s, roughly one
    /// defection per survivor every ~33 seconds of play.
    pub survivor_defect_chance: f64,

    /// Per-tick chance a wandering survivor picks a new facing
    pub wander_turn_chance: f64,

    /// Per-tick chance a wandering survivor actually steps
    ///
    /// Kept well below 1.0 to produce idle-biased meandering instead of
    /// constant motion.
    pub wander_step_chance: f64,

    /// Wander step speed as a fraction of the survivor's full speed
    pub wander_speed_scale: f32,

    // === HUNTER BEHAVIOR ===
    /// Per-tick chance a patrolling hunter re-rolls its patrol target
    pub hunter_retarget_chance: f64,

    /// Chance a re-roll converges on the jishu box while the player is
    /// close enough to surrender
    pub box_swarm_chance: f64,

    /// Chance a re-roll camps a random active mission instead
    pub mission_camp_chance: f64,

    /// Consecutive fully-blocked ticks before a hunter abandons its
    /// target and jitters free
    pub stuck_tick_limit: u32,

    // === EXTERNAL PROVIDERS ===
    /// Seconds of round time between mission spawns
    pub mission_interval: u32,

    /// Ticks between tactics requests while the tactician directs
    ///
    /// ~5 seconds at 60 ticks/s. Responses are applied whenever they
    /// arrive; the loop never waits on them.
    pub tactics_poll_ticks: u64,

    /// Cooldown after a provider quota error, during which tactics
    /// requests are skipped entirely
    pub tactics_backoff: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Movement
            player_speed: 5.0,
            survivor_speed_scale: 0.9,

            // Detection (vision = 7 tiles)
            hunter_vision: TILE_SIZE * 7.0,
            tactician_vision_scale: 0.8,
            survivor_flee_vision_scale: 1.2,
            catch_radius: TILE_SIZE * 0.5,
            surrender_radius: TILE_SIZE * 1.5,
            mission_radius: TILE_SIZE * 1.5,
            survivor_exit_radius: TILE_SIZE,
            patrol_arrival_radius: TILE_SIZE,

            // Scoring
            reward_per_second: 200,

            // Map generation
            obstacle_count: 150,
            placement_attempts: 100,

            // Survivors
            survivor_defect_chance: 0.0005,
            wander_turn_chance: 0.05,
            wander_step_chance: 0.3,
            wander_speed_scale: 0.4,

            // Hunters
            hunter_retarget_chance: 0.02,
            box_swarm_chance: 0.6,
            mission_camp_chance: 0.4,
            stuck_tick_limit: 20,

            // Providers
            mission_interval: 30,
            tactics_poll_ticks: 300,
            tactics_backoff: Duration::from_secs(60),
        }
    }
}

impl Tuning {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate tuning for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.catch_radius >= self.hunter_vision {
            return Err(format!(
                "catch_radius ({}) must be < hunter_vision ({})",
                self.catch_radius, self.hunter_vision
            ));
        }

        for (name, p) in [
            ("survivor_defect_chance", self.survivor_defect_chance),
            ("wander_turn_chance", self.wander_turn_chance),
            ("wander_step_chance", self.wander_step_chance),
            ("hunter_retarget_chance", self.hunter_retarget_chance),
            ("box_swarm_chance", self.box_swarm_chance),
            ("mission_camp_chance", self.mission_camp_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{} ({}) must be within [0, 1]", name, p));
            }
        }

        if self.player_speed <= 0.0 {
            return Err("player_speed must be positive".into());
        }

        if self.mission_interval == 0 {
            return Err("mission_interval must be at least 1 second".into());
        }

        Ok(())
    }
}
