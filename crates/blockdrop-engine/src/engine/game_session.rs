use crate::core::{Board, Coord, Piece, SQUARES_PER_PIECE, Square};

use super::{config::GameConfig, piece_generator::PieceGenerator};

/// Whether a session is still simulating.
///
/// `GameOver` is terminal: ticks and key presses are ignored once a
/// freshly spawned piece collides at the spawn position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Running,
    GameOver,
}

/// Logical input keys delivered by the presentation layer.
///
/// Presses must be non-repeating; key repeat for held movement is the
/// session's own job (see [`GameConfig::shift_interval`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    /// Rotate the falling piece clockwise.
    RotateCw,
    Left,
    Right,
    /// Accelerated downward movement while held.
    SoftDrop,
    /// Manually shrink the fall interval (faster game).
    SpeedUp,
    /// Manually grow the fall interval (slower game).
    SpeedDown,
}

/// Named audio triggers emitted by the session.
///
/// The session queues cues; the presentation layer drains them with
/// [`GameSession::take_sound_cues`] and maps the `Display` names to
/// whatever playback it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SoundCue {
    #[display("piece-locked")]
    PieceLocked,
    #[display("rows-cleared-1")]
    SingleRowCleared,
    #[display("rows-cleared-2+")]
    MultiRowCleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeldDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
enum SpeedChange {
    Faster,
    Slower,
}

/// One in-progress game: the falling piece, the board, and the clocks.
///
/// The session is single-threaded and frame-stepped. Discrete key events
/// are applied immediately; [`GameSession::tick`] advances the two time
/// accumulators (one for falling, one for held left/right movement) by
/// an externally measured delta and performs whatever movement is due.
///
/// A grounded piece is not locked on the first failed downward move:
/// locking waits until the fall accumulator exceeds
/// `fall_interval * lock_delay_factor`, giving a short window to slide
/// the piece after it touches down.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    falling_piece: Piece,
    generator: PieceGenerator,
    state: SessionState,
    /// Current fall interval; shrinks as lines accumulate.
    fall_interval: f64,
    time_since_fall: f64,
    time_since_shift: f64,
    held_direction: Option<HeldDirection>,
    soft_drop: bool,
    lines_cleared: usize,
    sound_cues: Vec<SoundCue>,
}

impl GameSession {
    /// Starts a new game on an empty board.
    #[must_use]
    pub fn new(config: GameConfig, mut generator: PieceGenerator) -> Self {
        let board = Board::new(config.board_limits());
        let falling_piece = Piece::new(generator.next_kind(), config.board_width);
        Self {
            fall_interval: config.fall_interval,
            config,
            board,
            falling_piece,
            generator,
            state: SessionState::Running,
            time_since_fall: 0.0,
            time_since_shift: 0.0,
            held_direction: None,
            soft_drop: false,
            lines_cleared: 0,
            sound_cues: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    /// The falling piece's 4 cells, ready for rendering.
    #[must_use]
    pub fn falling_squares(&self) -> [Square; SQUARES_PER_PIECE] {
        self.falling_piece.squares()
    }

    /// All placed cells, ready for rendering.
    #[must_use]
    pub fn placed_squares(&self) -> &[Square] {
        self.board.squares()
    }

    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    /// Current time between automatic one-cell falls, in seconds.
    #[must_use]
    pub fn fall_interval(&self) -> f64 {
        self.fall_interval
    }

    /// Drains the sound cues queued since the last call.
    pub fn take_sound_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sound_cues)
    }

    /// Applies a non-repeating key press.
    pub fn key_pressed(&mut self, key: GameKey) {
        if self.state.is_game_over() {
            return;
        }
        match key {
            GameKey::RotateCw => {
                if let Some(piece) = try_rotate(&self.falling_piece, &self.board) {
                    self.falling_piece = piece;
                }
            }
            GameKey::Left => self.held_direction = Some(HeldDirection::Left),
            GameKey::Right => self.held_direction = Some(HeldDirection::Right),
            GameKey::SoftDrop => self.soft_drop = true,
            GameKey::SpeedUp => self.change_speed(SpeedChange::Faster),
            GameKey::SpeedDown => self.change_speed(SpeedChange::Slower),
        }
    }

    /// Applies a key release.
    ///
    /// A left/right release only clears the held direction if it matches
    /// the direction currently held, so releasing a key after pressing
    /// the opposite one does not cancel the newer press.
    pub fn key_released(&mut self, key: GameKey) {
        match key {
            GameKey::Left if self.held_direction == Some(HeldDirection::Left) => {
                self.held_direction = None;
            }
            GameKey::Right if self.held_direction == Some(HeldDirection::Right) => {
                self.held_direction = None;
            }
            GameKey::SoftDrop => self.soft_drop = false,
            _ => {}
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Held left/right movement repeats every
    /// [`shift_interval`](GameConfig::shift_interval); the piece falls
    /// one cell per [`fall_interval`](GameSession::fall_interval), or per
    /// shift interval while soft drop is held. A piece that cannot fall
    /// locks once the fall accumulator exceeds the lock-delay window,
    /// after which completed rows are cleared and the next piece spawns.
    pub fn tick(&mut self, dt: f64) {
        if self.state.is_game_over() {
            return;
        }

        self.time_since_fall += dt;
        self.time_since_shift += dt;

        if let Some(direction) = self.held_direction
            && self.time_since_shift > self.config.shift_interval
        {
            self.time_since_shift = 0.0;
            let delta = match direction {
                HeldDirection::Left => Coord::LEFT,
                HeldDirection::Right => Coord::RIGHT,
            };
            self.try_shift(delta);
        }

        let auto_fall = self.time_since_fall > self.fall_interval;
        let soft_fall = self.soft_drop && self.time_since_fall > self.config.shift_interval;
        if auto_fall || soft_fall {
            if self.try_shift(Coord::DOWN) {
                self.time_since_fall = 0.0;
            } else if self.time_since_fall > self.fall_interval * self.config.lock_delay_factor {
                self.time_since_fall = 0.0;
                self.lock_falling_piece();
            }
        }
    }

    /// Moves the falling piece by `delta` if the target cells are free.
    fn try_shift(&mut self, delta: Coord) -> bool {
        if self.board.can_place(&self.falling_piece, delta) {
            self.falling_piece = self.falling_piece.translated(delta);
            true
        } else {
            false
        }
    }

    fn change_speed(&mut self, change: SpeedChange) {
        match change {
            SpeedChange::Slower => self.fall_interval += self.config.speed_step,
            SpeedChange::Faster => {
                self.fall_interval = (self.fall_interval - self.config.speed_step)
                    .max(self.config.min_fall_interval);
            }
        }
    }

    /// Locks the grounded piece, clears rows, and spawns the next piece.
    ///
    /// A speed-up fires when the lines-cleared total crosses a multiple
    /// of `lines_per_speed_up`. The check compares `lines / n` before and
    /// after, so a multi-row clear that jumps past a boundary still
    /// triggers exactly one step.
    fn lock_falling_piece(&mut self) {
        self.board.lock(&self.falling_piece);
        self.sound_cues.push(SoundCue::PieceLocked);

        let cleared = self.board.clear_completed_rows();
        if cleared > 0 {
            let before = self.lines_cleared;
            self.lines_cleared += cleared;
            self.sound_cues.push(if cleared == 1 {
                SoundCue::SingleRowCleared
            } else {
                SoundCue::MultiRowCleared
            });

            let n = self.config.lines_per_speed_up;
            if self.lines_cleared / n > before / n {
                self.change_speed(SpeedChange::Faster);
            }
        }

        self.spawn_next_piece();
    }

    /// Spawns a fresh random piece at the spawn position.
    ///
    /// If the spawn position already collides with placed cells the
    /// session is over; the blocked piece is still exposed for rendering.
    fn spawn_next_piece(&mut self) {
        let piece = Piece::new(self.generator.next_kind(), self.config.board_width);
        if !self.board.can_place(&piece, Coord::ZERO) {
            self.state = SessionState::GameOver;
        }
        self.falling_piece = piece;
    }
}

/// Attempts a clockwise rotation of `piece` against `board`.
///
/// The rotated piece (already edge-kicked by [`Piece::rotated`]) is
/// tried in place, then shifted left, right, and up; the first placement
/// with no collision wins. Returns `None` if none fits, leaving the
/// caller's piece untouched.
fn try_rotate(piece: &Piece, board: &Board) -> Option<Piece> {
    const KICKS: [Coord; 4] = [Coord::ZERO, Coord::LEFT, Coord::RIGHT, Coord::UP];

    let rotated = piece.rotated(board.limits());
    KICKS
        .into_iter()
        .find(|&delta| board.can_place(&rotated, delta))
        .map(|delta| rotated.translated(delta))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::core::{CellColor, PieceKind};
    use crate::engine::piece_generator::PieceSeed;

    use super::*;

    const DT: f64 = 0.05;

    fn session() -> GameSession {
        GameSession::new(
            GameConfig::default(),
            PieceGenerator::with_seed(PieceSeed::new([42; 16])),
        )
    }

    fn cell_positions(piece: &Piece) -> HashSet<(i32, i32)> {
        piece.cells().iter().map(|c| (c.x, c.y)).collect()
    }

    fn square_at(x: i32, y: i32) -> Square {
        Square {
            coord: Coord::new(x, y),
            color: CellColor::Green,
        }
    }

    /// Fills row `y` except the columns in `gaps`.
    fn fill_row(board: &mut Board, y: i32, gaps: &[i32]) {
        for x in 0..board.limits().x {
            if !gaps.contains(&x) {
                board.place_square(square_at(x, y));
            }
        }
    }

    #[test]
    fn test_new_session_spawns_centered_piece() {
        let session = session();
        assert!(session.state().is_running());
        assert_eq!(session.lines_cleared(), 0);
        let kind = session.falling_piece().kind();
        assert_eq!(
            cell_positions(session.falling_piece()),
            cell_positions(&Piece::new(kind, 9)),
        );
    }

    #[test]
    fn test_soft_drop_until_lock_spawns_new_piece() {
        let mut session = session();
        session.key_pressed(GameKey::SoftDrop);

        let mut safety = 0;
        while session.placed_squares().is_empty() {
            session.tick(DT);
            safety += 1;
            assert!(safety < 2000, "piece never locked");
        }

        assert_eq!(session.placed_squares().len(), SQUARES_PER_PIECE);
        assert_eq!(session.lines_cleared(), 0);
        assert!(session.state().is_running());

        // The replacement piece sits at the canonical spawn position.
        let kind = session.falling_piece().kind();
        assert_eq!(
            cell_positions(session.falling_piece()),
            cell_positions(&Piece::new(kind, 9)),
        );

        let cues = session.take_sound_cues();
        assert_eq!(cues, vec![SoundCue::PieceLocked]);
        assert!(session.take_sound_cues().is_empty(), "cues drain once");
    }

    #[test]
    fn test_held_direction_moves_piece_on_tick() {
        let mut session = session();
        let before = session.falling_piece().cells()[0].x;
        session.key_pressed(GameKey::Left);
        session.tick(0.11);
        assert_eq!(session.falling_piece().cells()[0].x, before - 1);

        // Release stops further movement.
        session.key_released(GameKey::Left);
        session.tick(0.11);
        assert_eq!(session.falling_piece().cells()[0].x, before - 1);
    }

    #[test]
    fn test_stale_release_does_not_cancel_newer_press() {
        let mut session = session();
        session.key_pressed(GameKey::Left);
        session.key_pressed(GameKey::Right);
        session.key_released(GameKey::Left);
        assert_eq!(session.held_direction, Some(HeldDirection::Right));

        session.key_released(GameKey::Right);
        assert_eq!(session.held_direction, None);
    }

    #[test]
    fn test_manual_speed_keys_adjust_fall_interval() {
        let mut session = session();
        session.key_pressed(GameKey::SpeedDown);
        assert!((session.fall_interval() - 0.45).abs() < 1e-9);

        for _ in 0..20 {
            session.key_pressed(GameKey::SpeedUp);
        }
        assert!((session.fall_interval() - 0.1).abs() < 1e-9, "floored at minimum");
    }

    #[test]
    fn test_single_row_clear_counts_and_cues() {
        let mut session = session();
        session.falling_piece = Piece::new(PieceKind::Square, 9);
        fill_row(&mut session.board, 21, &[4, 5]);

        session.key_pressed(GameKey::SoftDrop);
        let mut safety = 0;
        while session.lines_cleared() == 0 {
            session.tick(DT);
            safety += 1;
            assert!(safety < 2000, "row never cleared");
        }

        assert_eq!(session.lines_cleared(), 1);
        // The square's top half survives and drops into the cleared row.
        let placed: HashSet<_> = session
            .placed_squares()
            .iter()
            .map(|sq| (sq.coord.x, sq.coord.y))
            .collect();
        assert_eq!(placed, HashSet::from([(4, 21), (5, 21)]));
        assert_eq!(
            session.take_sound_cues(),
            vec![SoundCue::PieceLocked, SoundCue::SingleRowCleared],
        );
    }

    #[test]
    fn test_speed_up_when_crossing_ten_lines() {
        let mut session = session();
        session.lines_cleared = 9;
        session.falling_piece = Piece::new(PieceKind::Square, 9);
        fill_row(&mut session.board, 21, &[4, 5]);

        session.key_pressed(GameKey::SoftDrop);
        while session.lines_cleared() == 9 {
            session.tick(DT);
        }

        assert_eq!(session.lines_cleared(), 10);
        assert!((session.fall_interval() - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_multi_clear_crossing_one_boundary_steps_once() {
        let mut session = session();
        session.lines_cleared = 19;
        session.falling_piece = Piece::new(PieceKind::Square, 9);
        fill_row(&mut session.board, 20, &[4, 5]);
        fill_row(&mut session.board, 21, &[4, 5]);

        session.key_pressed(GameKey::SoftDrop);
        while session.lines_cleared() == 19 {
            session.tick(DT);
        }

        // 19 -> 21 crosses only the 20-line boundary: one decrement.
        assert_eq!(session.lines_cleared(), 21);
        assert!((session.fall_interval() - 0.35).abs() < 1e-9);
        assert_eq!(
            session.take_sound_cues(),
            vec![SoundCue::PieceLocked, SoundCue::MultiRowCleared],
        );
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut session = session();
        fill_row(&mut session.board, 0, &[]);
        fill_row(&mut session.board, 1, &[]);

        session.spawn_next_piece();
        assert!(session.state().is_game_over());

        // Terminal: further ticks and presses change nothing.
        let frozen = cell_positions(session.falling_piece());
        session.key_pressed(GameKey::SoftDrop);
        for _ in 0..50 {
            session.tick(DT);
        }
        assert_eq!(cell_positions(session.falling_piece()), frozen);
    }

    #[test]
    fn test_rotation_committed_when_a_kick_fits() {
        let mut session = session();
        session.falling_piece = Piece::new(PieceKind::Line, 9);
        session.key_pressed(GameKey::RotateCw);
        let expected: HashSet<_> = (0..4).map(|y| (4, y)).collect();
        assert_eq!(cell_positions(session.falling_piece()), expected);
    }

    #[test]
    fn test_rotation_discarded_when_no_kick_fits() {
        let mut session = session();
        // Vertical line hugging the left wall at rows 10..=13.
        session.falling_piece = Piece::new(PieceKind::Line, 9)
            .rotated(Coord::new(9, 22))
            .translated(Coord::new(-4, 10));
        // Block the in-place and shift-right placements at row 11 and the
        // shift-up placement at row 10; shift-left is off the board.
        session.board.place_square(square_at(2, 11));
        session.board.place_square(square_at(1, 10));

        let before = *session.falling_piece();
        session.key_pressed(GameKey::RotateCw);
        assert_eq!(*session.falling_piece(), before);
    }

    #[test]
    fn test_fall_respects_lock_delay_grace() {
        let mut session = session();
        // Drop the piece straight to the floor.
        while session.try_shift(Coord::DOWN) {}

        // Grounded but within the grace window: one fall interval elapses
        // without locking.
        session.tick(0.41);
        assert!(session.placed_squares().is_empty());

        // Past fall_interval * 1.5 the piece locks.
        session.tick(0.41);
        assert_eq!(session.placed_squares().len(), SQUARES_PER_PIECE);
    }
}
