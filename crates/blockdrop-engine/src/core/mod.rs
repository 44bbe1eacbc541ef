pub use self::{board::*, coord::*, piece::*};

pub(crate) mod board;
pub(crate) mod coord;
pub(crate) mod piece;
