use crate::core::{board::Board, outcome::Outcome, player::Player};
use serde::Serialize;
use tsify::Tsify;

/// Everything a view layer needs to draw one frame, derived fresh from the
/// history on every request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    #[tsify(type = "(\"X\" | \"O\" | null)[]")]
    pub board: Board,
    pub active_player: Player,
    pub outcome: Outcome,
    pub move_list: Vec<String>,
    pub current_move: usize,
    pub status: String,
}

impl GameView {
    pub fn status_text(outcome: Outcome, active_player: Player) -> String {
        match outcome {
            Outcome::Won(winner) => format!("Winner: {winner}"),
            Outcome::InProgress => format!("Next player: {active_player}"),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
