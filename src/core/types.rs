//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for missions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissionId(pub Uuid);

impl MissionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MissionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game tick counter (simulation time unit, ~60 per second)
pub type Tick = u64;

/// Side length of one map tile in world units (pixels)
pub const TILE_SIZE: f32 = 48.0;

/// Map width in tiles
pub const MAP_WIDTH: i32 = 40;

/// Map height in tiles
pub const MAP_HEIGHT: i32 = 40;

/// 2D position in continuous world space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::default()
        }
    }

    /// Unit vector pointing from `self` to `other` (zero if coincident)
    pub fn toward(&self, other: &Self) -> Self {
        (*other - *self).normalize()
    }

    /// Tile coordinate containing this position
    pub fn tile(&self) -> (i32, i32) {
        (
            (self.x / TILE_SIZE).floor() as i32,
            (self.y / TILE_SIZE).floor() as i32,
        )
    }
}

/// World position of a tile's top-left corner
pub fn tile_origin(tx: i32, ty: i32) -> Vec2 {
    Vec2::new(tx as f32 * TILE_SIZE, ty as f32 * TILE_SIZE)
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Cardinal facing, derived from the dominant movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Down,
    Up,
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Down, Facing::Up, Facing::Left, Facing::Right];

    /// Facing from a displacement vector. Horizontal wins only when
    /// `|dx| > |dy|`; ties resolve vertical.
    pub fn from_vector(dx: f32, dy: f32) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            }
        } else if dy > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        }
    }

    /// Like [`Facing::from_vector`], but an exact `|dx| == |dy|` tie yields
    /// `None` so callers can keep the previous facing.
    pub fn from_vector_dominant(dx: f32, dy: f32) -> Option<Self> {
        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 { Facing::Right } else { Facing::Left })
        } else if dy.abs() > dx.abs() {
            Some(if dy > 0.0 { Facing::Down } else { Facing::Up })
        } else {
            None
        }
    }

    /// Unit step along this facing
    pub fn unit(&self) -> Vec2 {
        match self {
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_normalize_zero() {
        let z = Vec2::default().normalize();
        assert_eq!(z.x, 0.0);
        assert_eq!(z.y, 0.0);
    }

    #[test]
    fn test_toward_is_unit() {
        let a = Vec2::new(10.0, 10.0);
        let b = Vec2::new(10.0, 90.0);
        let t = a.toward(&b);
        assert!((t.length() - 1.0).abs() < 1e-5);
        assert!(t.y > 0.0);
    }

    #[test]
    fn test_tile_conversion() {
        let p = Vec2::new(TILE_SIZE * 3.0 + 1.0, TILE_SIZE * 7.0 + 47.0);
        assert_eq!(p.tile(), (3, 7));
        assert_eq!(tile_origin(3, 7), Vec2::new(144.0, 336.0));
    }

    #[test]
    fn test_facing_horizontal_needs_strict_majority() {
        assert_eq!(Facing::from_vector(2.0, 1.0), Facing::Right);
        assert_eq!(Facing::from_vector(-2.0, 1.0), Facing::Left);
        // Exact tie falls to the vertical axis
        assert_eq!(Facing::from_vector(1.0, 1.0), Facing::Down);
        assert_eq!(Facing::from_vector(1.0, -1.0), Facing::Up);
    }

    #[test]
    fn test_facing_dominant_tie_is_none() {
        assert_eq!(Facing::from_vector_dominant(1.0, 1.0), None);
        assert_eq!(
            Facing::from_vector_dominant(0.5, -2.0),
            Some(Facing::Up)
        );
    }
}
