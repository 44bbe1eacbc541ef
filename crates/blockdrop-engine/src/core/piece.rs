use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{board::Square, coord::Coord};

/// Number of cells making up every piece.
pub const SQUARES_PER_PIECE: usize = 4;

/// One rotation state of a piece: 4 cell offsets relative to the piece's
/// pivot at spawn.
pub type RotationPattern = [Coord; SQUARES_PER_PIECE];

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

// Rotation tables, one entry per 90-degree-family state. Table lengths
// differ per shape: the square never changes, lines and S/Z shapes
// alternate between two states, L and T shapes cycle through four.
static ROTATIONS_SQUARE: [RotationPattern; 1] = [[c(0, 0), c(1, 0), c(0, 1), c(1, 1)]];

static ROTATIONS_LINE: [RotationPattern; 2] = [
    [c(-1, 0), c(0, 0), c(1, 0), c(2, 0)],
    [c(0, -1), c(0, 0), c(0, 1), c(0, 2)],
];

static ROTATIONS_L_RIGHT: [RotationPattern; 4] = [
    [c(0, 0), c(1, 0), c(2, 0), c(0, 1)],
    [c(0, 0), c(0, 1), c(0, 2), c(-1, 0)],
    [c(0, 0), c(-1, 0), c(-2, 0), c(0, -1)],
    [c(0, 0), c(0, -1), c(0, -2), c(1, 0)],
];

static ROTATIONS_L_LEFT: [RotationPattern; 4] = [
    [c(0, 0), c(-1, 0), c(-2, 0), c(0, 1)],
    [c(0, 0), c(0, -1), c(0, -2), c(-1, 0)],
    [c(0, 0), c(1, 0), c(2, 0), c(0, -1)],
    [c(0, 0), c(0, 1), c(0, 2), c(1, 0)],
];

static ROTATIONS_T: [RotationPattern; 4] = [
    [c(-1, 0), c(0, 0), c(1, 0), c(0, 1)],
    [c(0, -1), c(0, 0), c(0, 1), c(-1, 0)],
    [c(1, 0), c(0, 0), c(-1, 0), c(0, -1)],
    [c(0, 1), c(0, 0), c(0, -1), c(1, 0)],
];

static ROTATIONS_Z_RIGHT: [RotationPattern; 2] = [
    [c(-1, 0), c(0, 0), c(0, 1), c(1, 1)],
    [c(0, -1), c(0, 0), c(-1, 0), c(-1, 1)],
];

static ROTATIONS_Z_LEFT: [RotationPattern; 2] = [
    [c(-1, 1), c(0, 1), c(0, 0), c(1, 0)],
    [c(-1, -1), c(-1, 0), c(0, 0), c(0, 1)],
];

/// Enum representing the shape of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// 2x2 square.
    Square = 0,
    /// Straight line of 4.
    Line = 1,
    /// L bending right.
    LRight = 2,
    /// L bending left (mirrored).
    LLeft = 3,
    /// T shape.
    T = 4,
    /// S/Z shape, right-handed.
    ZRight = 5,
    /// S/Z shape, left-handed.
    ZLeft = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::Square,
            1 => PieceKind::Line,
            2 => PieceKind::LRight,
            3 => PieceKind::LLeft,
            4 => PieceKind::T,
            5 => PieceKind::ZRight,
            _ => PieceKind::ZLeft,
        }
    }
}

impl PieceKind {
    /// Number of piece shapes (7).
    pub const LEN: usize = 7;

    /// All shapes, in tag order.
    pub const ALL: [Self; Self::LEN] = [
        Self::Square,
        Self::Line,
        Self::LRight,
        Self::LLeft,
        Self::T,
        Self::ZRight,
        Self::ZLeft,
    ];

    /// Returns the rotation table for this shape.
    ///
    /// Each entry is one rotation state; tables wrap around modulo their
    /// length.
    #[must_use]
    pub fn rotation_table(self) -> &'static [RotationPattern] {
        match self {
            Self::Square => &ROTATIONS_SQUARE,
            Self::Line => &ROTATIONS_LINE,
            Self::LRight => &ROTATIONS_L_RIGHT,
            Self::LLeft => &ROTATIONS_L_LEFT,
            Self::T => &ROTATIONS_T,
            Self::ZRight => &ROTATIONS_Z_RIGHT,
            Self::ZLeft => &ROTATIONS_Z_LEFT,
        }
    }

    /// Returns the fixed color for this shape.
    #[must_use]
    pub const fn color(self) -> CellColor {
        match self {
            Self::Square => CellColor::Yellow,
            Self::Line => CellColor::Cyan,
            Self::LRight => CellColor::Orange,
            Self::LLeft => CellColor::Blue,
            Self::T => CellColor::Purple,
            Self::ZRight => CellColor::Green,
            Self::ZLeft => CellColor::Red,
        }
    }
}

/// Color tag of a cell, one per piece shape.
///
/// The `Display` form is the name a presentation layer uses to look up
/// the drawable asset for the cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
pub enum CellColor {
    #[display("yellow")]
    Yellow,
    #[display("cyan")]
    Cyan,
    #[display("orange")]
    Orange,
    #[display("blue")]
    Blue,
    #[display("purple")]
    Purple,
    #[display("green")]
    Green,
    #[display("red")]
    Red,
}

/// The falling 4-cell piece under player control.
///
/// A piece holds its 4 absolute cell coordinates plus the rotation state
/// they were derived from. The cells always form one of the shape's
/// rotation patterns offset by a uniform translation.
///
/// Pieces are immutable: movement and rotation return new `Piece` values,
/// so a failed placement attempt never leaves a half-updated piece behind.
/// Bounds and collision are the caller's concern ([`Board::can_place`]);
/// only [`Piece::rotated`] does its own (edge-only) adjustment.
///
/// [`Board::can_place`]: super::board::Board::can_place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: usize,
    cells: [Coord; SQUARES_PER_PIECE],
}

impl Piece {
    /// Creates a piece in its spawn state: rotation 0, translated right by
    /// `board_width / 2` so it starts horizontally centered at the top.
    #[must_use]
    pub fn new(kind: PieceKind, board_width: i32) -> Self {
        let mut cells = kind.rotation_table()[0];
        let movement = Coord::RIGHT.scaled(board_width / 2);
        for cell in &mut cells {
            *cell += movement;
        }
        Self {
            kind,
            rotation: 0,
            cells,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub fn cells(&self) -> &[Coord; SQUARES_PER_PIECE] {
        &self.cells
    }

    /// Returns the piece moved by `delta`. No bounds check here.
    #[must_use]
    pub fn translated(&self, delta: Coord) -> Self {
        let mut cells = self.cells;
        for cell in &mut cells {
            *cell += delta;
        }
        Self { cells, ..*self }
    }

    /// Returns the piece advanced to its next rotation state, kept inside
    /// the board edges.
    ///
    /// The rotation index advances modulo the shape's table length. Each
    /// cell maps to the next pattern entry plus the cell's current offset
    /// from its pattern entry, which preserves the piece's translation
    /// while swapping the shape pattern.
    ///
    /// Afterwards the whole piece is nudged one cell at a time back inside
    /// `[0, limits.x) x [0, limits.y)`. This is a simplified wall kick: it
    /// only consults the board edges, never the placed cells, so a
    /// rotation against the stack can overlap placed cells. Callers that
    /// care run the result through collision checks (see
    /// `GameSession::try_rotate`).
    #[must_use]
    pub fn rotated(&self, limits: Coord) -> Self {
        let table = self.kind.rotation_table();
        let next = (self.rotation + 1) % table.len();

        let mut cells = self.cells;
        for (i, cell) in cells.iter_mut().enumerate() {
            let offset = *cell - table[self.rotation][i];
            *cell = table[next][i] + offset;
        }

        let mut piece = Self {
            kind: self.kind,
            rotation: next,
            cells,
        };
        loop {
            if piece.cells.iter().any(|c| c.x < 0) {
                piece = piece.translated(Coord::RIGHT);
            } else if piece.cells.iter().any(|c| c.x >= limits.x) {
                piece = piece.translated(Coord::LEFT);
            } else if piece.cells.iter().any(|c| c.y < 0) {
                piece = piece.translated(Coord::DOWN);
            } else if piece.cells.iter().any(|c| c.y >= limits.y) {
                piece = piece.translated(Coord::UP);
            } else {
                break;
            }
        }
        piece
    }

    /// Returns the 4 (coordinate, color) cells of the current state.
    #[must_use]
    pub fn squares(&self) -> [Square; SQUARES_PER_PIECE] {
        let color = self.kind.color();
        self.cells.map(|coord| Square { coord, color })
    }
}
