//! Ayu: connect all of your pieces into a single unit.

mod error;
mod game;
mod notation;
pub mod rules;
mod types;

pub use error::{GameError, MoveError, ParseError};
pub use game::GameState;
pub use types::{
    Board, Coord, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE, Move, Player, Square, render_fields,
};
