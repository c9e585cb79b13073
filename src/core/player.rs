use num::Integer;
use serde::{Deserialize, Serialize};
use std::fmt;
use tsify::Tsify;

/// One side of the game. `X` always opens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Tsify)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Player to move from the position at `move_index` in the history.
    /// Even indices belong to `X`, so the board at index `i > 0` was filled by
    /// `X` when `i` is odd.
    pub fn to_move_at(move_index: usize) -> Self {
        if move_index.is_even() {
            Player::X
        } else {
            Player::O
        }
    }

    pub fn mark(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mark())
    }
}
