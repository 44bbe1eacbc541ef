use serde::{Deserialize, Serialize};

/// A position or offset on the board grid, in whole cells.
///
/// # Coordinate System
///
/// - (0, 0) is the top-left playable cell
/// - X increases rightward (columns)
/// - Y increases downward (rows)
///
/// `Coord` is a plain value type: adding two coords translates, scalar
/// `*=` scales both components. The same type is used for absolute cell
/// positions, movement deltas, and board limits.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
    derive_more::MulAssign,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ZERO: Self = Self::new(0, 0);
    pub const UP: Self = Self::new(0, -1);
    pub const DOWN: Self = Self::new(0, 1);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this coord with both components multiplied by `n`.
    #[must_use]
    pub const fn scaled(self, n: i32) -> Self {
        Self::new(self.x * n, self.y * n)
    }
}
