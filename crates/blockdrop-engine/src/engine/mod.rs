//! Game logic and session state management.
//!
//! This module drives the core data structures through actual gameplay:
//!
//! - [`GameSession`] - owns the falling piece and the board, consumes
//!   input events and per-frame elapsed time
//! - [`GameConfig`] - board size and timing constants, all overridable
//! - [`PieceGenerator`] / [`PieceSeed`] - seedable random shape source
//!
//! # Game Flow
//!
//! 1. Build a [`GameConfig`] (or use the defaults) and a [`PieceGenerator`]
//! 2. Create a [`GameSession`]; the first piece spawns centered at the top
//! 3. Feed it key presses/releases and call [`GameSession::tick`] once per
//!    frame with the elapsed seconds
//! 4. Each frame, read the falling and placed squares back for rendering
//!    and drain the queued sound cues
//! 5. The session ends when a freshly spawned piece collides at the spawn
//!    position ([`SessionState::GameOver`])
//!
//! The session never blocks, spawns threads, or performs I/O; time only
//! advances through the deltas handed to `tick`.

pub use self::{config::*, game_session::*, piece_generator::*};

mod config;
mod game_session;
mod piece_generator;
