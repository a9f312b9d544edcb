//! Text notation for coordinates and moves.
//!
//! A coordinate is written as a column letter (`A` is the leftmost column)
//! followed by a row number counted from the bottom of the board, so the
//! notation depends on the board size. A move is written as `SRC-DST`.

use super::error::ParseError;
use super::types::{Coord, Move};

impl Coord {
    /// Writes the coordinate in letter+number form for a board of `size`.
    pub fn notation(self, size: usize) -> String {
        let letter = u32::try_from(self.col)
            .ok()
            .and_then(|col| char::from_u32(u32::from(b'A') + col))
            .unwrap_or('?');
        format!("{}{}", letter, size as i32 - self.row)
    }

    /// Parses letter+number notation for a board of `size`.
    ///
    /// The number must be positive and written without leading zeros. The
    /// result is not range checked: `A12` on an 11-board yields row -1.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text is not a single upper-case letter
    /// followed by a row number.
    pub fn parse(text: &str, size: usize) -> Result<Self, ParseError> {
        let mut chars = text.chars();
        let letter = chars
            .next()
            .filter(char::is_ascii_uppercase)
            .ok_or_else(|| ParseError::new(text))?;
        let digits = chars.as_str();
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParseError::new(text));
        }
        let number: i32 = digits.parse().map_err(|_| ParseError::new(text))?;
        let col = letter as i32 - 'A' as i32;
        Ok(Coord::new(size as i32 - number, col))
    }
}

impl Move {
    /// Writes the move as `SRC-DST` for a board of `size`.
    pub fn notation(self, size: usize) -> String {
        format!("{}-{}", self.src.notation(size), self.dst.notation(size))
    }

    /// Parses `SRC-DST` notation for a board of `size`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the separator is missing or either
    /// coordinate is malformed.
    pub fn parse(text: &str, size: usize) -> Result<Self, ParseError> {
        let (src, dst) = text.split_once('-').ok_or_else(|| ParseError::new(text))?;
        let src = Coord::parse(src, size).map_err(|_| ParseError::new(text))?;
        let dst = Coord::parse(dst, size).map_err(|_| ParseError::new(text))?;
        Ok(Move::new(src, dst))
    }
}
