// =============================================================================
// GEOMETRY.RS — World positions and pixel rectangles
//
// Everything in the game world is addressed in whole pixels:
// - Positions of items, fixtures and the player
// - Rectangles inside sprite sheets
// - Reach checks when the player interacts with something nearby
// =============================================================================

use serde::Deserialize;

/// A world-space pixel position.
pub type Position = glam::IVec2;

/// Manhattan ("taxicab") distance between two positions. Saturates at
/// `i32::MAX` for positions at opposite ends of the coordinate range.
#[inline]
pub fn distance_manhattan(a: Position, b: Position) -> i32 {
    let d = a.x.abs_diff(b.x) as u64 + a.y.abs_diff(b.y) as u64;
    saturate(d)
}

/// Chebyshev ("chessboard") distance, where diagonals cost the same as
/// orthogonals. This is the shape of the player's reach: a square.
#[inline]
pub fn distance_chebyshev(a: Position, b: Position) -> i32 {
    saturate(a.x.abs_diff(b.x).max(a.y.abs_diff(b.y)) as u64)
}

#[inline]
fn saturate(d: u64) -> i32 {
    i32::try_from(d).unwrap_or(i32::MAX)
}

/// True if `target` lies inside the square of half-width `reach` centred on
/// `origin`. A negative reach never matches.
#[inline]
pub fn within_reach(origin: Position, target: Position, reach: i32) -> bool {
    reach >= 0 && distance_chebyshev(origin, target) <= reach
}

// =============================================================================
// RECT
// =============================================================================

/// An axis-aligned pixel rectangle (left, top, width, height).
///
/// Deserialises from a four-element JSON array `[x, y, w, h]`, which is how
/// sprite sheet coordinates are written in the sprite manifest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "[u32; 4]")]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u64 {
        self.x as u64 + self.w as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.h as u64
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// True if this rectangle lies entirely inside a `width` × `height` surface.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }
}

impl From<[u32; 4]> for Rect {
    fn from([x, y, w, h]: [u32; 4]) -> Self {
        Self { x, y, w, h }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let o = Position::new(0, 0);
        assert_eq!(distance_manhattan(o, Position::new(3, 4)), 7);
        assert_eq!(distance_manhattan(o, o), 0);
        assert_eq!(distance_manhattan(Position::new(-1, -1), Position::new(1, 1)), 4);
    }

    #[test]
    fn test_chebyshev_distance() {
        let o = Position::new(0, 0);
        assert_eq!(distance_chebyshev(o, Position::new(3, 4)), 4);
        assert_eq!(distance_chebyshev(o, Position::new(3, 3)), 3);
    }

    #[test]
    fn test_distances_saturate_at_extremes() {
        let far_left = Position::new(i32::MIN, 0);
        let far_right = Position::new(i32::MAX, i32::MAX);
        assert_eq!(distance_chebyshev(far_left, far_right), i32::MAX);
        assert_eq!(distance_manhattan(far_left, far_right), i32::MAX);
        assert_eq!(distance_chebyshev(Position::new(i32::MIN, 0), Position::new(i32::MIN + 3, 4)), 4);
        assert!(!within_reach(Position::new(10, 0), far_left, 48));
    }

    #[test]
    fn test_within_reach_is_inclusive() {
        let o = Position::new(100, 100);
        assert!(within_reach(o, Position::new(148, 52), 48));
        assert!(!within_reach(o, Position::new(149, 100), 48));
        assert!(!within_reach(o, o, -1));
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(Rect::new(0, 0, 16, 16).fits_within(16, 16));
        assert!(!Rect::new(1, 0, 16, 16).fits_within(16, 16));
        assert!(!Rect::new(u32::MAX, 0, 2, 1).fits_within(u32::MAX, 1));
    }

    #[test]
    fn test_rect_from_json_array() {
        let r: Rect = serde_json::from_str("[269, 333, 16, 16]").unwrap();
        assert_eq!(r, Rect::new(269, 333, 16, 16));
    }
}
