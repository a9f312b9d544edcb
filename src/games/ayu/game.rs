//! Game state: board, move history and turn order.

use super::error::{GameError, MoveError};
use super::rules;
use super::types::{Board, Move, Player, Square, coords};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Complete state of one Ayu game.
///
/// The board always equals the starting position with the history replayed
/// on top of it. The serialized form stores only the board size and the
/// history; deserializing replays every move and fails on the first illegal
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GameRecord", try_from = "GameRecord")]
pub struct GameState {
    board: Board,
    history: Vec<Move>,
}

/// Persisted form of a [`GameState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GameRecord {
    size: usize,
    history: Vec<Move>,
}

impl From<GameState> for GameRecord {
    fn from(state: GameState) -> Self {
        Self {
            size: state.board.size(),
            history: state.history,
        }
    }
}

impl TryFrom<GameRecord> for GameState {
    type Error = GameError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        GameState::replay(record.size, record.history)
    }
}

impl GameState {
    /// Creates a game in the starting position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] for unsupported board sizes.
    #[instrument]
    pub fn new(size: usize) -> Result<Self, GameError> {
        Ok(Self {
            board: Board::new(size)?,
            history: Vec::new(),
        })
    }

    /// Builds a game by playing `moves` from the starting position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] for unsupported board sizes and
    /// [`GameError::Replay`] for the first move that is illegal.
    #[instrument(skip(moves))]
    pub fn replay(size: usize, moves: impl IntoIterator<Item = Move>) -> Result<Self, GameError> {
        let mut state = Self::new(size)?;
        for mv in moves {
            let ply = state.version() + 1;
            state
                .apply(mv)
                .map_err(|reason| GameError::Replay { ply, reason })?;
        }
        Ok(state)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of moves played so far.
    pub fn version(&self) -> usize {
        self.history.len()
    }

    /// Player whose turn it is.
    pub fn player(&self) -> Player {
        Player::for_ply(self.history.len())
    }

    /// Checks a move for the player to move without applying it.
    ///
    /// # Errors
    ///
    /// Returns the first rule the move violates.
    pub fn validate(&self, mv: &Move) -> Result<(), MoveError> {
        rules::validate(&self.board, mv, self.player()).map(|_| ())
    }

    /// Whether the player to move may play `mv`.
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.validate(mv).is_ok()
    }

    /// Plays a move for the player to move.
    ///
    /// Either the move is recorded and the board updated, or nothing changes.
    ///
    /// # Errors
    ///
    /// Returns the first rule the move violates.
    #[instrument(level = "debug", skip(self), fields(ply = self.history.len() + 1))]
    pub fn apply(&mut self, mv: Move) -> Result<(), MoveError> {
        let board = rules::validate(&self.board, &mv, self.player())?;
        self.board = board;
        self.history.push(mv);
        debug!(notation = %mv.notation(self.board.size()), "Move applied");
        Ok(())
    }

    /// All legal moves for the player to move, in row-major `(src, dst)` order.
    ///
    /// The iterator is lazy; call again to restart the scan.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        let size = self.board.size();
        let own = Square::Occupied(self.player());
        coords(size)
            .filter(move |src| self.board.get(*src) == Some(own))
            .flat_map(move |src| coords(size).map(move |dst| Move::new(src, dst)))
            .filter(move |mv| self.is_legal(mv))
    }

    /// The game is over when the player to move has no legal move.
    pub fn is_terminal(&self) -> bool {
        self.legal_moves().next().is_none()
    }

    /// Points per player, indexed by [`Player::index`].
    ///
    /// A finished game awards one point to the player who is not to move.
    pub fn score(&self) -> [u32; 2] {
        let mut score = [0, 0];
        if self.is_terminal() {
            score[self.player().opponent().index()] = 1;
        }
        score
    }

    /// Move list as numbered White/Black pairs, one pair per line.
    pub fn render_log(&self) -> String {
        let size = self.board.size();
        let mut out = String::new();
        for (i, pair) in self.history.chunks(2).enumerate() {
            let line = match pair {
                [white, black] => format!(
                    "{:>3}. {:<8} {}\n",
                    i + 1,
                    white.notation(size),
                    black.notation(size)
                ),
                [white] => format!("{:>3}. {}\n", i + 1, white.notation(size)),
                _ => continue,
            };
            out.push_str(&line);
        }
        out
    }
}
