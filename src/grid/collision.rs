//! Axis-independent movement resolution against the obstacle grid
//!
//! Movement resolves per axis: X alone first, then Y against the already
//! updated X. A diagonal push into a wall therefore slides along it
//! instead of stopping dead.

use crate::core::types::{Vec2, MAP_HEIGHT, MAP_WIDTH, TILE_SIZE};
use crate::grid::ObstacleMap;

/// Horizontal inset of the collider box from the tile footprint
const COLLIDER_INSET_X: f32 = 12.0;

/// Gap between the collider's bottom edge and the tile bottom
const COLLIDER_BOTTOM_GAP: f32 = 2.0;

/// Outcome of one resolved move
#[derive(Debug, Clone, Copy)]
pub struct MoveResult {
    pub position: Vec2,
    /// Non-zero displacement applied on the axis
    pub moved_x: bool,
    pub moved_y: bool,
}

impl MoveResult {
    pub fn moved(&self) -> bool {
        self.moved_x || self.moved_y
    }
}

/// Whether an entity anchored at `pos` (top-left of its tile footprint)
/// would collide there.
///
/// The collider is a shrunk box biased toward the lower half of the
/// footprint, approximating a feet hitbox: heads may overlap wall tiles,
/// feet may not. Any of its four corners landing on a blocked tile, or
/// the anchor leaving the map, rejects the position.
pub fn position_blocked(pos: Vec2, map: &ObstacleMap) -> bool {
    let max_x = MAP_WIDTH as f32 * TILE_SIZE - TILE_SIZE;
    let max_y = MAP_HEIGHT as f32 * TILE_SIZE - TILE_SIZE;
    if pos.x < 0.0 || pos.x > max_x || pos.y < 0.0 || pos.y > max_y {
        return true;
    }

    let left = pos.x + COLLIDER_INSET_X;
    let right = pos.x + TILE_SIZE - COLLIDER_INSET_X;
    let top = pos.y + TILE_SIZE / 2.0;
    let bottom = pos.y + TILE_SIZE - COLLIDER_BOTTOM_GAP;

    for (px, py) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
        let tx = (px / TILE_SIZE).floor() as i32;
        let ty = (py / TILE_SIZE).floor() as i32;
        if map.is_blocked(tx, ty) {
            return true;
        }
    }
    false
}

/// Apply a desired displacement with per-axis collision resolution.
///
/// An axis reports `moved` only when its displacement was non-zero and the
/// candidate position was clear; a blocked axis leaves the prior
/// coordinate untouched.
pub fn resolve_move(pos: Vec2, dx: f32, dy: f32, map: &ObstacleMap) -> MoveResult {
    let mut out = pos;
    let mut moved_x = false;
    let mut moved_y = false;

    if dx != 0.0 && !position_blocked(Vec2::new(out.x + dx, out.y), map) {
        out.x += dx;
        moved_x = true;
    }
    if dy != 0.0 && !position_blocked(Vec2::new(out.x, out.y + dy), map) {
        out.y += dy;
        moved_y = true;
    }

    MoveResult {
        position: out,
        moved_x,
        moved_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::tile_origin;
    use proptest::prelude::*;

    #[test]
    fn test_open_ground_moves_both_axes() {
        let map = ObstacleMap::empty();
        let start = tile_origin(10, 10);
        let r = resolve_move(start, 3.0, -2.0, &map);
        assert!(r.moved_x && r.moved_y);
        assert_eq!(r.position, Vec2::new(start.x + 3.0, start.y - 2.0));
    }

    #[test]
    fn test_zero_displacement_reports_no_motion() {
        let map = ObstacleMap::empty();
        let r = resolve_move(tile_origin(10, 10), 0.0, 0.0, &map);
        assert!(!r.moved());
    }

    #[test]
    fn test_map_edge_rejects() {
        let map = ObstacleMap::empty();
        let r = resolve_move(Vec2::new(0.0, 0.0), -5.0, 0.0, &map);
        assert!(!r.moved_x);
        assert_eq!(r.position.x, 0.0);
    }

    #[test]
    fn test_wall_slide_keeps_free_axis() {
        // Vertical wall directly right of the entity; pushing diagonally
        // down-right must still advance downward.
        let mut map = ObstacleMap::empty();
        for ty in 0..MAP_HEIGHT {
            map.insert(11, ty);
        }
        // The collider is inset 12 world units, so the push must be deep
        // enough for the right corners to reach the wall column.
        let start = tile_origin(10, 10);
        let r = resolve_move(start, 14.0, 4.0, &map);
        assert!(!r.moved_x, "x axis should be blocked by the wall");
        assert!(r.moved_y, "y axis must slide free");
        assert_eq!(r.position.y, start.y + 4.0);
        assert_eq!(r.position.x, start.x);
    }

    #[test]
    fn test_feet_bias_allows_head_overlap() {
        // Obstacle one tile above: the collider's top edge starts at half
        // a tile, so standing flush below is legal.
        let mut map = ObstacleMap::empty();
        map.insert(10, 9);
        assert!(!position_blocked(tile_origin(10, 10), &map));
        // But walking up far enough for the collider top to enter the
        // obstacle tile is not.
        let r = resolve_move(tile_origin(10, 10), 0.0, -30.0, &map);
        assert!(!r.moved_y);
    }

    proptest! {
        /// Containment: whatever the obstacles and the push, a resolved
        /// position never has a collider corner on a blocked tile and
        /// never leaves the map.
        #[test]
        fn prop_resolved_position_never_blocked(
            tiles in prop::collection::vec((0..MAP_WIDTH, 0..MAP_HEIGHT), 0..120),
            sx in 6..MAP_WIDTH - 1,
            sy in 6..MAP_HEIGHT - 1,
            dx in -8.0f32..8.0,
            dy in -8.0f32..8.0,
        ) {
            let mut map = ObstacleMap::empty();
            for (tx, ty) in tiles {
                map.insert(tx, ty);
            }
            let start = tile_origin(sx, sy);
            prop_assume!(!position_blocked(start, &map));

            let r = resolve_move(start, dx, dy, &map);
            prop_assert!(!position_blocked(r.position, &map));
        }

        /// Axis independence: blocking only the X candidate never stops a
        /// non-zero Y component from advancing.
        #[test]
        fn prop_blocked_x_still_slides_y(
            sy in 6..MAP_HEIGHT - 2,
            dx in 13.0f32..20.0,
            dy in 0.1f32..8.0,
        ) {
            let mut map = ObstacleMap::empty();
            for ty in 0..MAP_HEIGHT {
                map.insert(11, ty);
            }
            let start = tile_origin(10, sy);
            prop_assume!(!position_blocked(start, &map));
            prop_assume!(!position_blocked(Vec2::new(start.x, start.y + dy), &map));

            let r = resolve_move(start, dx, dy, &map);
            prop_assert!(!r.moved_x);
            prop_assert!(r.moved_y);
        }
    }
}
