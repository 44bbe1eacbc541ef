use serde::{Deserialize, Serialize};

use super::{
    coord::Coord,
    piece::{CellColor, Piece},
};

/// A single placed or falling unit cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Square {
    pub coord: Coord,
    pub color: CellColor,
}

/// The set of permanently placed cells, bounded by a fixed grid.
///
/// Placed squares are stored as an unordered list; lookups are O(n)
/// scans, which is fine at this scale (at most `width * height` cells,
/// 9x22 by default).
///
/// # Invariants
///
/// - No two placed squares share a coordinate.
/// - Every placed square lies inside `[0, width) x [0, height)`.
///
/// Both are upheld by callers going through [`Board::can_place`] before
/// [`Board::lock`].
#[derive(Debug, Clone)]
pub struct Board {
    limits: Coord,
    squares: Vec<Square>,
}

impl Board {
    /// Creates an empty board with the given width/height limits.
    #[must_use]
    pub fn new(limits: Coord) -> Self {
        Self {
            limits,
            squares: Vec::new(),
        }
    }

    /// Board limits: `x` is the width, `y` the height, in cells.
    #[must_use]
    pub fn limits(&self) -> Coord {
        self.limits
    }

    /// All placed squares, in no particular order.
    #[must_use]
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// True if a placed square occupies `coord`.
    #[must_use]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.squares.iter().any(|sq| sq.coord == coord)
    }

    /// True if `coord` lies inside the board grid.
    #[must_use]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        (0..self.limits.x).contains(&coord.x) && (0..self.limits.y).contains(&coord.y)
    }

    /// Checks whether `piece` translated by `delta` fits: every cell
    /// in bounds and unoccupied. No side effects.
    #[must_use]
    pub fn can_place(&self, piece: &Piece, delta: Coord) -> bool {
        piece.cells().iter().all(|&cell| {
            let target = cell + delta;
            self.in_bounds(target) && !self.is_occupied(target)
        })
    }

    /// Appends the piece's cells to the placed squares.
    ///
    /// Always succeeds; the caller must have verified placement legality
    /// beforehand (see [`Board::can_place`]).
    pub fn lock(&mut self, piece: &Piece) {
        self.squares.extend(piece.squares());
    }

    /// Removes fully occupied rows, shifts survivors down, and returns
    /// the number of rows cleared.
    ///
    /// Complete rows are processed from the bottom up. Each clear found
    /// while scanning upward means cells above it that have not yet been
    /// shifted for it must drop one extra row, so the shift threshold for
    /// the nth clear is `row + rows_lowered`: survivors already moved
    /// down by earlier (lower) clears sit below that line and are left
    /// alone, everything above compounds.
    pub fn clear_completed_rows(&mut self) -> usize {
        let height = usize::try_from(self.limits.y).unwrap_or(0);
        let mut row_counts = vec![0; height];
        for sq in &self.squares {
            row_counts[sq.coord.y as usize] += 1;
        }

        let mut remaining: Vec<Square> = self
            .squares
            .iter()
            .copied()
            .filter(|sq| row_counts[sq.coord.y as usize] < self.limits.x)
            .collect();

        let mut rows_lowered = 0;
        for row in (0..self.limits.y).rev() {
            if row_counts[row as usize] >= self.limits.x {
                for sq in &mut remaining {
                    if sq.coord.y < row + rows_lowered {
                        sq.coord += Coord::DOWN;
                    }
                }
                rows_lowered += 1;
            }
        }

        self.squares = remaining;
        rows_lowered as usize
    }

    /// Builds a board from ASCII art for tests: `#` is an occupied cell,
    /// `.` an empty one. Width and height are taken from the art; every
    /// row must have the same number of cells.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        let mut squares = Vec::new();
        let mut width = 0;

        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            if y == 0 {
                width = cells.len();
            }
            assert_eq!(
                cells.len(),
                width,
                "every row must have {width} cells, got {} at row {y}",
                cells.len()
            );
            for (x, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    squares.push(Square {
                        coord: Coord::new(x as i32, y as i32),
                        color: CellColor::Blue,
                    });
                }
            }
        }

        Self {
            limits: Coord::new(width as i32, lines.len() as i32),
            squares,
        }
    }
}

#[cfg(test)]
impl Board {
    /// Places one square directly, bypassing piece placement. Test
    /// scaffolding for priming board states.
    pub(crate) fn place_square(&mut self, square: Square) {
        assert!(
            self.in_bounds(square.coord) && !self.is_occupied(square.coord),
            "test setup placed an invalid square at {:?}",
            square.coord
        );
        self.squares.push(square);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::piece::PieceKind;

    const LIMITS: Coord = Coord::new(9, 22);

    fn positions(board: &Board) -> HashSet<(i32, i32)> {
        board.squares().iter().map(|sq| (sq.coord.x, sq.coord.y)).collect()
    }

    fn full_row(y: i32) -> impl Iterator<Item = Square> {
        (0..LIMITS.x).map(move |x| Square {
            coord: Coord::new(x, y),
            color: CellColor::Green,
        })
    }

    fn board_with(squares: impl IntoIterator<Item = Square>) -> Board {
        let mut board = Board::new(LIMITS);
        board.squares.extend(squares);
        board
    }

    #[test]
    fn test_in_bounds_edges() {
        let board = Board::new(LIMITS);
        assert!(board.in_bounds(Coord::new(0, 0)));
        assert!(board.in_bounds(Coord::new(8, 21)));
        assert!(!board.in_bounds(Coord::new(-1, 0)));
        assert!(!board.in_bounds(Coord::new(9, 0)));
        assert!(!board.in_bounds(Coord::new(0, -1)));
        assert!(!board.in_bounds(Coord::new(0, 22)));
    }

    #[test]
    fn test_can_place_rejects_out_of_bounds() {
        let board = Board::new(LIMITS);
        let piece = Piece::new(PieceKind::Square, LIMITS.x);
        assert!(board.can_place(&piece, Coord::ZERO));
        assert!(board.can_place(&piece, Coord::DOWN.scaled(20)));
        // Spawn cells sit at x 4..=5, y 0..=1.
        assert!(!board.can_place(&piece, Coord::LEFT.scaled(5)));
        assert!(!board.can_place(&piece, Coord::RIGHT.scaled(4)));
        assert!(!board.can_place(&piece, Coord::UP));
        assert!(!board.can_place(&piece, Coord::DOWN.scaled(21)));
    }

    #[test]
    fn test_can_place_rejects_overlap() {
        let board = board_with([Square {
            coord: Coord::new(4, 10),
            color: CellColor::Red,
        }]);
        let piece = Piece::new(PieceKind::Square, LIMITS.x);
        // Square spawn covers (4,0),(5,0),(4,1),(5,1); dropping 9 rows
        // puts a cell on (4,10).
        assert!(!board.can_place(&piece, Coord::DOWN.scaled(9)));
        assert!(board.can_place(&piece, Coord::DOWN.scaled(9) + Coord::RIGHT));
    }

    #[test]
    fn test_lock_appends_piece_cells() {
        let mut board = Board::new(LIMITS);
        let piece = Piece::new(PieceKind::T, LIMITS.x);
        board.lock(&piece);
        assert_eq!(board.squares().len(), 4);
        for square in piece.squares() {
            assert!(board.is_occupied(square.coord));
        }
    }

    #[test]
    fn test_clear_with_no_complete_rows_is_noop() {
        let mut board = board_with((0..LIMITS.x - 1).map(|x| Square {
            coord: Coord::new(x, 21),
            color: CellColor::Cyan,
        }));
        let before = positions(&board);
        assert_eq!(board.clear_completed_rows(), 0);
        assert_eq!(positions(&board), before);
    }

    #[test]
    fn test_clear_single_bottom_row() {
        let mut board = board_with(
            full_row(21).chain([Square {
                coord: Coord::new(3, 20),
                color: CellColor::Red,
            }]),
        );
        assert_eq!(board.clear_completed_rows(), 1);
        assert_eq!(positions(&board), HashSet::from([(3, 21)]));
    }

    #[test]
    fn test_clear_two_separated_rows_compounds_shift() {
        // Complete rows at 5 and 8. Survivors above row 8 drop 2, the
        // ones between 5 and 8 drop 1, the ones below stay.
        let mut board = board_with(
            full_row(5)
                .chain(full_row(8))
                .chain([
                    Square { coord: Coord::new(0, 3), color: CellColor::Red },
                    Square { coord: Coord::new(1, 6), color: CellColor::Red },
                    Square { coord: Coord::new(2, 7), color: CellColor::Red },
                    Square { coord: Coord::new(3, 9), color: CellColor::Red },
                ]),
        );
        assert_eq!(board.clear_completed_rows(), 2);
        assert_eq!(
            positions(&board),
            HashSet::from([(0, 5), (1, 7), (2, 8), (3, 9)])
        );
    }

    #[test]
    fn test_clear_adjacent_rows() {
        let mut board = board_with(
            full_row(20).chain(full_row(21)).chain([Square {
                coord: Coord::new(7, 19),
                color: CellColor::Red,
            }]),
        );
        assert_eq!(board.clear_completed_rows(), 2);
        assert_eq!(positions(&board), HashSet::from([(7, 21)]));
    }

    #[test]
    fn test_from_ascii_layout() {
        let board = Board::from_ascii(
            r"
            #....
            .....
            ..#..
            .....
            ",
        );
        assert_eq!(board.limits(), Coord::new(5, 4));
        assert_eq!(positions(&board), HashSet::from([(0, 0), (2, 2)]));
        assert!(board.is_occupied(Coord::new(2, 2)));
        assert!(!board.is_occupied(Coord::new(1, 1)));
    }

    #[test]
    fn test_from_ascii_clear_scenario() {
        let mut board = Board::from_ascii(
            r"
            ....
            #..#
            ####
            ####
            ",
        );
        assert_eq!(board.clear_completed_rows(), 2);
        assert_eq!(positions(&board), HashSet::from([(0, 3), (3, 3)]));
    }
}
