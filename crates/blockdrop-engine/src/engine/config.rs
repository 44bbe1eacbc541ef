use serde::{Deserialize, Serialize};

use crate::core::Coord;

/// Error returned by [`GameConfig::validate`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least 4x4 cells, got {width}x{height}")]
    BoardTooSmall { width: i32, height: i32 },
    #[display("fall interval must be positive, got {_0}")]
    NonPositiveFallInterval(#[error(not(source))] f64),
    #[display("minimum fall interval must be positive, got {_0}")]
    NonPositiveMinFallInterval(#[error(not(source))] f64),
    #[display("hold-repeat interval must be positive, got {_0}")]
    NonPositiveShiftInterval(#[error(not(source))] f64),
    #[display("lock delay factor must be at least 1, got {_0}")]
    LockDelayTooSmall(#[error(not(source))] f64),
    #[display("lines per speed-up must be at least 1")]
    ZeroLinesPerSpeedUp,
}

/// Tunable board and timing constants of a game session.
///
/// The defaults match the classic setup: a 9x22 board, a 0.4 s fall
/// interval tightened by 0.05 s per speed-up down to a 0.1 s floor, a
/// 0.1 s hold-repeat interval, a 1.5x lock-delay grace window, and one
/// speed-up per 10 cleared lines.
///
/// All intervals are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells.
    pub board_width: i32,
    /// Board height in cells.
    pub board_height: i32,
    /// Time between automatic one-cell falls at the start of a session.
    pub fall_interval: f64,
    /// Amount each speed change adds to or removes from the fall interval.
    pub speed_step: f64,
    /// Lower bound the fall interval is clamped to when speeding up.
    pub min_fall_interval: f64,
    /// Repeat interval for held left/right movement and soft drop.
    pub shift_interval: f64,
    /// Multiplier on the fall interval giving the grace window before a
    /// grounded piece locks.
    pub lock_delay_factor: f64,
    /// A speed-up triggers every time the lines-cleared total crosses a
    /// multiple of this.
    pub lines_per_speed_up: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 9,
            board_height: 22,
            fall_interval: 0.4,
            speed_step: 0.05,
            min_fall_interval: 0.1,
            shift_interval: 0.1,
            lock_delay_factor: 1.5,
            lines_per_speed_up: 10,
        }
    }
}

impl GameConfig {
    /// Board limits as a coordinate pair.
    #[must_use]
    pub const fn board_limits(&self) -> Coord {
        Coord::new(self.board_width, self.board_height)
    }

    /// Checks that the configuration describes a playable game.
    ///
    /// Pieces span up to 4 cells in either direction, so boards smaller
    /// than 4x4 would make the rotation kick loop in
    /// [`Piece::rotated`](crate::core::Piece::rotated) unable to settle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width < 4 || self.board_height < 4 {
            return Err(ConfigError::BoardTooSmall {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.fall_interval <= 0.0 {
            return Err(ConfigError::NonPositiveFallInterval(self.fall_interval));
        }
        if self.min_fall_interval <= 0.0 {
            return Err(ConfigError::NonPositiveMinFallInterval(
                self.min_fall_interval,
            ));
        }
        if self.shift_interval <= 0.0 {
            return Err(ConfigError::NonPositiveShiftInterval(self.shift_interval));
        }
        if self.lock_delay_factor < 1.0 {
            return Err(ConfigError::LockDelayTooSmall(self.lock_delay_factor));
        }
        if self.lines_per_speed_up == 0 {
            return Err(ConfigError::ZeroLinesPerSpeedUp);
        }
        Ok(())
    }
}
