use crate::core::{
    board::{Board, Cell},
    player::Player,
    rule_helper,
};
use serde::Serialize;
use tracing::instrument;
use tsify::Tsify;

/// Result of scanning a board for three in a row.
///
/// A full board without a line is still `InProgress`; draws are not a
/// separate state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Tsify)]
#[serde(rename_all = "camelCase", tag = "state", content = "winner")]
pub enum Outcome {
    InProgress,
    Won(Player),
}

impl Outcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::InProgress => None,
            Outcome::Won(player) => Some(player),
        }
    }

    pub fn is_won(self) -> bool {
        matches!(self, Outcome::Won(_))
    }
}

/// First winning line in `WIN_LINES` order decides the winner.
#[instrument(level = "trace", skip_all, fields(board = %board))]
pub fn calculate_outcome(board: &Board) -> Outcome {
    let cells = board.cells();
    for [a, b, c] in rule_helper::WIN_LINES {
        if let Cell::Occupied(player) = cells[a] {
            if cells[b] == cells[a] && cells[c] == cells[a] {
                return Outcome::Won(player);
            }
        }
    }

    Outcome::InProgress
}
