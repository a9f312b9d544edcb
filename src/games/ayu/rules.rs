//! Move validation using only local board connectivity.
//!
//! A unit is a set of same-coloured pieces connected through orthogonal
//! neighbours. A move picks up one piece of a unit and puts it on an empty
//! square such that
//!
//! - the unit stays in one piece (a lone piece may only step to an adjacent
//!   square), and
//! - the moved piece ends strictly closer to the nearest friendly piece that
//!   does not belong to its own unit.
//!
//! All traversals use explicit stacks or queues with a visited mask local to
//! the call, so validation never mutates the board it inspects.

use super::error::MoveError;
use super::types::{Board, Coord, Move, Player, Square};
use std::collections::VecDeque;
use tracing::{instrument, trace};

/// Squares belonging to one unit, as a mask over board indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    mask: Vec<bool>,
    size: usize,
}

impl Unit {
    /// Number of pieces in the unit.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the coordinate belongs to the unit.
    pub fn contains(&self, board: &Board, coord: Coord) -> bool {
        board.index(coord).is_some_and(|i| self.mask[i])
    }
}

/// Floods out from `start` over orthogonal neighbours accepted by `member`.
fn flood_fill(board: &Board, start: Coord, member: impl Fn(Coord) -> bool) -> Unit {
    let mut mask = vec![false; board.squares().len()];
    let mut size = 0;

    let Some(start_index) = board.index(start) else {
        return Unit { mask, size };
    };
    if !member(start) {
        return Unit { mask, size };
    }

    mask[start_index] = true;
    let mut stack = vec![start];
    while let Some(coord) = stack.pop() {
        size += 1;
        for next in coord.neighbors() {
            if let Some(i) = board.index(next) {
                if !mask[i] && member(next) {
                    mask[i] = true;
                    stack.push(next);
                }
            }
        }
    }

    Unit { mask, size }
}

/// Returns the unit containing the piece at `coord`, if there is one.
pub fn unit_at(board: &Board, coord: Coord) -> Option<Unit> {
    match board.get(coord)? {
        Square::Empty => None,
        occupant => Some(flood_fill(board, coord, |c| board.get(c) == Some(occupant))),
    }
}

/// BFS distance from `from` to the nearest piece of `player` outside `unit`.
///
/// Every square is passable. Returns `None` when no such piece exists.
pub fn distance_to_friend(
    board: &Board,
    from: Coord,
    player: Player,
    unit: &Unit,
) -> Option<u32> {
    let start = board.index(from)?;
    let mut seen = vec![false; board.squares().len()];
    let mut queue = VecDeque::from([(from, 0)]);
    seen[start] = true;

    while let Some((coord, distance)) = queue.pop_front() {
        if coord != from
            && board.get(coord) == Some(Square::Occupied(player))
            && !unit.contains(board, coord)
        {
            return Some(distance);
        }
        for next in coord.neighbors() {
            if let Some(i) = board.index(next) {
                if !seen[i] {
                    seen[i] = true;
                    queue.push_back((next, distance + 1));
                }
            }
        }
    }

    None
}

/// Both squares of the move lie on the board.
pub fn is_in_range(board: &Board, mv: &Move) -> bool {
    board.contains(mv.src) && board.contains(mv.dst)
}

/// The square holds a piece of `player`.
pub fn is_own_piece(board: &Board, src: Coord, player: Player) -> bool {
    board.get(src) == Some(Square::Occupied(player))
}

/// The square is on the board and empty.
pub fn is_empty(board: &Board, dst: Coord) -> bool {
    board.is_empty(dst)
}

/// The move keeps the moved unit whole and approaches a friendly unit.
pub fn keeps_group_valid(board: &Board, mv: &Move, player: Player) -> bool {
    simulate(board, mv, player).is_ok()
}

/// Checks the connectivity and distance rules and returns the board after
/// the move.
///
/// Range, ownership and emptiness are assumed to hold; use [`validate`] for
/// the full check.
///
/// # Errors
///
/// Returns the first rule the move violates.
pub fn simulate(board: &Board, mv: &Move, player: Player) -> Result<Board, MoveError> {
    let unit = flood_fill(board, mv.src, |c| board.get(c) == Some(Square::Occupied(player)));
    let before =
        distance_to_friend(board, mv.src, player, &unit).ok_or(MoveError::NoFriendlyUnit)?;

    if unit.size() == 1 && mv.src.manhattan(mv.dst) > 1 {
        return Err(MoveError::SingletonTooFar);
    }

    let mut after_board = board.clone();
    after_board
        .set(mv.src, Square::Empty)
        .map_err(|_| MoveError::OutOfRange)?;
    after_board
        .set(mv.dst, Square::Occupied(player))
        .map_err(|_| MoveError::OutOfRange)?;

    let moved = flood_fill(&after_board, mv.dst, |c| {
        c == mv.dst || (c != mv.src && unit.contains(board, c))
    });
    if moved.size() != unit.size() {
        trace!(before = unit.size(), after = moved.size(), "Unit split");
        return Err(MoveError::SplitsUnit);
    }

    let after = distance_to_friend(&after_board, mv.dst, player, &moved);
    match after {
        Some(after) if after < before => Ok(after_board),
        _ => {
            trace!(before, ?after, "Distance not reduced");
            Err(MoveError::DoesNotApproach)
        }
    }
}

/// Runs every legality check for `player` moving `mv` on `board`.
///
/// # Errors
///
/// Returns the first rule the move violates.
#[instrument(level = "trace", skip(board), fields(size = board.size()))]
pub fn validate(board: &Board, mv: &Move, player: Player) -> Result<Board, MoveError> {
    if !is_in_range(board, mv) {
        return Err(MoveError::OutOfRange);
    }
    if !is_own_piece(board, mv.src, player) {
        return Err(MoveError::NotOwnPiece);
    }
    if !is_empty(board, mv.dst) {
        return Err(MoveError::DestinationOccupied);
    }
    simulate(board, mv, player)
}
