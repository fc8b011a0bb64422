//! Pre-round settings owned by the menu
//!
//! The menu edits a [`GameSettings`] while the session is idle; `start`
//! freezes a copy into the round. Loadable from TOML so the headless
//! runner can ship configurations around.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Hunter count used by the horde mode regardless of settings
pub const HORDE_HUNTER_COUNT: usize = 100;

/// Difficulty presets; each maps to a base hunter speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    /// An external LLM tactician directs hunter patrols; local vision is
    /// reduced to compensate
    Tactician,
    /// One hundred hunters at reduced speed
    Horde,
}

impl Difficulty {
    pub fn base_hunter_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 3.5,
            Difficulty::Normal => 4.8,
            Difficulty::Hard => 5.3,
            Difficulty::Tactician => 5.0,
            Difficulty::Horde => 4.2,
        }
    }

    /// Some modes override the configured hunter count
    pub fn forced_hunter_count(&self) -> Option<usize> {
        match self {
            Difficulty::Horde => Some(HORDE_HUNTER_COUNT),
            _ => None,
        }
    }

    /// Whether this mode polls the external tactics provider
    pub fn llm_directed(&self) -> bool {
        matches!(self, Difficulty::Tactician)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "tactician" => Ok(Difficulty::Tactician),
            "horde" => Ok(Difficulty::Horde),
            other => Err(format!(
                "unknown difficulty '{other}' (easy, normal, hard, tactician, horde)"
            )),
        }
    }
}

/// Cosmetic map theme, ignored by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapTheme {
    Tech,
    Sakura,
    Ruins,
}

/// Everything the menu decides before a round
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Round length in seconds
    pub duration: u32,
    pub difficulty: Difficulty,
    /// AI companions spawned alongside the runner (0 = solo)
    pub survivor_count: usize,
    pub theme: MapTheme,
    /// Ignored by horde mode, which forces its own count
    pub hunter_count: usize,
    /// Runner skin color, cosmetic
    pub player_color: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            duration: 300,
            difficulty: Difficulty::Normal,
            survivor_count: 4,
            theme: MapTheme::Tech,
            hunter_count: 5,
            player_color: "#22c55e".into(),
        }
    }
}

impl GameSettings {
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration == 0 {
            return Err(crate::core::error::GameError::InvalidSettings(
                "duration must be at least 1 second".into(),
            ));
        }
        Ok(())
    }

    /// Hunter count after difficulty overrides
    pub fn effective_hunter_count(&self) -> usize {
        self.difficulty
            .forced_hunter_count()
            .unwrap_or(self.hunter_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horde_forces_count() {
        let settings = GameSettings {
            difficulty: Difficulty::Horde,
            hunter_count: 3,
            ..GameSettings::default()
        };
        assert_eq!(settings.effective_hunter_count(), HORDE_HUNTER_COUNT);

        let normal = GameSettings {
            hunter_count: 3,
            ..GameSettings::default()
        };
        assert_eq!(normal.effective_hunter_count(), 3);
    }

    #[test]
    fn test_difficulty_speed_ordering() {
        assert!(Difficulty::Easy.base_hunter_speed() < Difficulty::Normal.base_hunter_speed());
        assert!(Difficulty::Normal.base_hunter_speed() < Difficulty::Hard.base_hunter_speed());
        // Horde trades speed for raw numbers
        assert!(Difficulty::Horde.base_hunter_speed() < Difficulty::Normal.base_hunter_speed());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings = GameSettings::from_toml("duration = 120\ndifficulty = \"hard\"").unwrap();
        assert_eq!(settings.duration, 120);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.hunter_count, 5);
        assert_eq!(settings.player_color, "#22c55e");
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert!(GameSettings::from_toml("duration = 0").is_err());
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("tactician".parse::<Difficulty>(), Ok(Difficulty::Tactician));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}
