//! Mission flavor text
//!
//! The simulation never depends on an external text generator: the static
//! pool below always answers, so mission spawning cannot fail or stall the
//! round. An LLM-backed implementation can replace [`StaticNarrative`]
//! behind the same trait.

use rand::Rng;

use crate::mission::MissionSeed;

/// Source of mission titles, descriptions, and rewards
///
/// Implementations must always return a seed; recover internally from any
/// upstream failure.
pub trait NarrativeProvider: Send {
    fn next_mission(&mut self) -> MissionSeed;
}

/// Base mission reward; the pool adds a random step on top
const BASE_REWARD: u64 = 10_000;
const REWARD_STEP: u64 = 5_000;

/// Title/description pool in the game-master dispatch register
const MISSION_POOL: &[(&str, &str)] = &[
    ("MISSION", "Stop the hunter release. Pull the lever inside the area."),
    ("URGENT", "The hunter box lock is failing. Re-arm it before it opens."),
    ("DISPATCH", "One more hunter deploys soon. Activate the jammer to cancel it."),
    ("MISSION", "A hunter drops in ten minutes. Find the freeze gun first."),
    ("WARNING", "Area lockdown in three minutes. Find the release lever."),
    ("MISSION", "Three hunters are converging. Start the decoy beacon."),
    ("URGENT", "The hunter pen opened. Close the gate."),
    ("DISPATCH", "A surveillance drone is overhead. Hack the control terminal."),
    ("DISPATCH", "Chance to raise the payout rate. Start the device in the plaza."),
    ("BONUS", "Clear this mission and the prize money doubles."),
    ("CHANCE", "A treasure chest appeared in the area. First to it keeps the bonus."),
    ("MISSION", "A bonus payout awaits the runner. Hurry to the drop point."),
    ("DISPATCH", "For the next five minutes, surrender pays out double."),
    ("MISSION", "Defuse the timed charge before the payout resets."),
    ("DISPATCH", "A new area is open. Authenticate at the gate."),
    ("WARNING", "This area will be sealed. Escape to the next one."),
    ("MISSION", "Gas is filling the building. Start the ventilation system."),
    ("DISPATCH", "The underground passage unlocked. Use the shortcut."),
    ("WARNING", "A blackout is coming. Switch on the backup power."),
    ("MISSION", "Get the passcode for the sealed gate."),
    ("DISPATCH", "A strong shield arrived. Head for the armory."),
    ("MISSION", "Find the battery for the stealth suit."),
    ("CHANCE", "An invisibility cloak is issued. Reach the marked point."),
    ("DISPATCH", "A radar showing hunter positions has appeared."),
    ("MISSION", "Place the decoy doll and lure the hunters away."),
    ("MISSION", "The radio is broken. Collect the repair parts."),
    ("URGENT", "Your battery is low. Reach the charging station."),
    ("WARNING", "Someone called the hunters here. Stay alert."),
    ("DISPATCH", "The surrender phone line is dead. Restore the wiring."),
    ("MISSION", "An impostor runner slipped in. Expose them."),
    ("URGENT", "The prize reset device is armed. Shut it down."),
    ("DISPATCH", "A present from the game master. Open the box."),
    ("MISSION", "Carry the resident's package and earn their silence."),
    ("WARNING", "A quake hit the area. Get to the safe zone."),
    ("DISPATCH", "The festival started. Blend into the crowd."),
    ("MISSION", "Cut the blue cable. Not the red one."),
    ("DISPATCH", "Final dispatch. Good luck, runner."),
];

/// Pool-backed narrative source with randomized rewards
#[derive(Debug, Default)]
pub struct StaticNarrative;

impl StaticNarrative {
    pub fn new() -> Self {
        Self
    }
}

impl NarrativeProvider for StaticNarrative {
    fn next_mission(&mut self) -> MissionSeed {
        let mut rng = rand::thread_rng();
        let (title, description) = MISSION_POOL[rng.gen_range(0..MISSION_POOL.len())];
        MissionSeed {
            title: title.to_string(),
            description: description.to_string(),
            reward: BASE_REWARD + rng.gen_range(0..5) * REWARD_STEP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_always_answers() {
        let mut narrative = StaticNarrative::new();
        for _ in 0..100 {
            let seed = narrative.next_mission();
            assert!(!seed.title.is_empty());
            assert!(!seed.description.is_empty());
        }
    }

    #[test]
    fn test_rewards_stay_in_band() {
        let mut narrative = StaticNarrative::new();
        for _ in 0..200 {
            let reward = narrative.next_mission().reward;
            assert!(reward >= BASE_REWARD);
            assert!(reward <= BASE_REWARD + 4 * REWARD_STEP);
            assert_eq!(reward % REWARD_STEP, 0);
        }
    }
}
