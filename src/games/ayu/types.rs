//! Core domain types for Ayu.

use super::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Smallest supported board size.
pub const MIN_SIZE: usize = 3;

/// Largest supported board size.
pub const MAX_SIZE: usize = 19;

/// Board size used when a game is created without one.
pub const DEFAULT_SIZE: usize = 11;

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Side A, moves first.
    White,
    /// Side B.
    Black,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Index used for keys, clocks and scores (0 = White, 1 = Black).
    pub fn index(self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    /// Player to move after `ply` moves have been played.
    pub fn for_ply(ply: usize) -> Self {
        if ply % 2 == 0 {
            Player::White
        } else {
            Player::Black
        }
    }

    /// Signed field value of this player's pieces.
    pub fn sign(self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Wire value of the square: 0, +1 or -1.
    pub fn value(self) -> i8 {
        match self {
            Square::Empty => 0,
            Square::Occupied(player) => player.sign(),
        }
    }
}

/// Location of a square, 0-indexed from the top-left corner.
///
/// Components are signed so that coordinates received from clients can be
/// represented and rejected by range checks instead of failing to decode.
/// On the wire a coordinate is the pair `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    /// Row, counted from the top.
    pub row: i32,
    /// Column, counted from the left.
    pub col: i32,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two coordinates, saturating at `u32::MAX`.
    pub fn manhattan(self, other: Coord) -> u32 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }

    /// Orthogonal neighbours, which may lie off the board.
    pub fn neighbors(self) -> [Coord; 4] {
        [
            Coord::new(self.row - 1, self.col),
            Coord::new(self.row + 1, self.col),
            Coord::new(self.row, self.col - 1),
            Coord::new(self.row, self.col + 1),
        ]
    }
}

/// Moving the piece on `src` to `dst`, written `[src, dst]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[Coord; 2]", into = "[Coord; 2]")]
pub struct Move {
    /// Square the piece leaves.
    pub src: Coord,
    /// Square the piece arrives on.
    pub dst: Coord,
}

impl From<[i32; 2]> for Coord {
    fn from([row, col]: [i32; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<Coord> for [i32; 2] {
    fn from(coord: Coord) -> Self {
        [coord.row, coord.col]
    }
}

impl From<[Coord; 2]> for Move {
    fn from([src, dst]: [Coord; 2]) -> Self {
        Self::new(src, dst)
    }
}

impl From<Move> for [Coord; 2] {
    fn from(mv: Move) -> Self {
        [mv.src, mv.dst]
    }
}

impl Move {
    /// Creates a move.
    pub const fn new(src: Coord, dst: Coord) -> Self {
        Self { src, dst }
    }
}

/// All coordinates of a `size × size` board in row-major order.
pub(crate) fn coords(size: usize) -> impl Iterator<Item = Coord> {
    let size = size as i32;
    (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
}

/// Square `size × size` Ayu board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Squares in row-major order.
    squares: Vec<Square>,
}

impl Board {
    /// Creates a board with the starting pattern.
    ///
    /// White occupies squares on even rows and odd columns, Black occupies
    /// squares on odd rows and even columns, everything else is empty.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] unless `size` is odd and in `[3, 19]`.
    #[instrument]
    pub fn new(size: usize) -> Result<Self, GameError> {
        let mut board = Self::empty(size)?;
        for coord in coords(size) {
            let square = match coord.col % 2 - coord.row % 2 {
                1 => Square::Occupied(Player::White),
                -1 => Square::Occupied(Player::Black),
                _ => Square::Empty,
            };
            board.set(coord, square)?;
        }
        Ok(board)
    }

    /// Creates a board with no pieces on it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] unless `size` is odd and in `[3, 19]`.
    pub fn empty(size: usize) -> Result<Self, GameError> {
        if size % 2 == 0 || !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GameError::InvalidSize(size));
        }
        Ok(Self {
            size,
            squares: vec![Square::Empty; size * size],
        })
    }

    /// Board side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the coordinate lies on the board.
    pub fn contains(&self, coord: Coord) -> bool {
        self.index(coord).is_some()
    }

    /// Row-major index of an on-board coordinate.
    pub(crate) fn index(&self, coord: Coord) -> Option<usize> {
        let size = self.size as i32;
        if (0..size).contains(&coord.row) && (0..size).contains(&coord.col) {
            Some((coord.row * size + coord.col) as usize)
        } else {
            None
        }
    }

    /// Gets the square at the given coordinate.
    pub fn get(&self, coord: Coord) -> Option<Square> {
        self.index(coord).map(|i| self.squares[i])
    }

    /// Sets the square at the given coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] if the coordinate is off the board.
    pub fn set(&mut self, coord: Coord, square: Square) -> Result<(), GameError> {
        let index = self.index(coord).ok_or(GameError::OutOfBounds(coord))?;
        self.squares[index] = square;
        Ok(())
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Some(Square::Empty))
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Board as rows of wire values (0 empty, +1 White, -1 Black).
    pub fn fields(&self) -> Vec<Vec<i8>> {
        self.squares
            .chunks(self.size)
            .map(|row| row.iter().map(|square| square.value()).collect())
            .collect()
    }

    /// Formats the board as one text line per row.
    pub fn display(&self) -> String {
        render_fields(&self.fields())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Renders a grid of wire values, one line per row.
///
/// `.` is empty, `+` is White, `-` is Black and `#` marks any value that is
/// not a valid square.
pub fn render_fields(fields: &[Vec<i8>]) -> String {
    let mut out = String::new();
    for row in fields {
        out.extend(row.iter().map(|value| match value {
            0 => '.',
            1 => '+',
            -1 => '-',
            _ => '#',
        }));
        out.push('\n');
    }
    out
}
