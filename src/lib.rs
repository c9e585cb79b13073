use tracing::debug;
use wasm_bindgen::prelude::*;

pub mod core;

use crate::core::{game_state_machine::GameStateMachine, game_view::GameView};

fn to_cell_index(cell_index: i32) -> Option<usize> {
    usize::try_from(cell_index).ok()
}

/// A game session owned by the JavaScript view layer. Every mutating call is
/// followed by a fresh `getView` on the JS side.
#[wasm_bindgen]
#[derive(Default)]
pub struct GameHandle {
    machine: GameStateMachine,
}

#[wasm_bindgen]
impl GameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(js_name = "applyMove")]
    pub fn apply_move(&mut self, cell_index: i32) {
        match to_cell_index(cell_index) {
            Some(cell_index) => self.machine.apply_move(cell_index),
            None => debug!(cell_index, "ignoring move with negative cell index"),
        }
    }

    #[wasm_bindgen(js_name = "jumpTo")]
    pub fn jump_to(&mut self, move_index: i32) {
        self.machine.jump_to(i64::from(move_index));
    }

    /// Empty string when the move would be accepted, otherwise the reason.
    #[wasm_bindgen(js_name = "validateMove")]
    pub fn validate_move(&self, cell_index: i32) -> String {
        let Some(idx) = to_cell_index(cell_index) else {
            return format!("cell {cell_index} is not on the board");
        };

        match self.machine.check_move(idx) {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        }
    }

    #[wasm_bindgen(js_name = "getView")]
    pub fn get_view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.machine.view()).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "viewJson")]
    pub fn view_json(&self) -> String {
        self.machine.view().to_json()
    }

    #[wasm_bindgen(js_name = "moveLabels")]
    pub fn move_labels(&self) -> js_sys::Array {
        self.machine
            .view()
            .move_list
            .iter()
            .map(|label| JsValue::from_str(label))
            .collect()
    }

    /// Marks of the viewed board, `null` for empty cells.
    pub fn squares(&self) -> js_sys::Array {
        self.machine
            .current_board()
            .marks()
            .map(|mark| mark.map_or(JsValue::NULL, JsValue::from_str))
            .collect()
    }

    #[wasm_bindgen(js_name = "activePlayer")]
    pub fn active_player(&self) -> String {
        self.machine.active_player().mark().to_string()
    }

    #[wasm_bindgen(js_name = "hasWinner")]
    pub fn has_winner(&self) -> bool {
        self.machine.outcome().is_won()
    }

    pub fn winner(&self) -> String {
        self.machine
            .outcome()
            .winner()
            .map(|player| player.mark().to_string())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "statusText")]
    pub fn status_text(&self) -> String {
        GameView::status_text(self.machine.outcome(), self.machine.active_player())
    }

    #[wasm_bindgen(js_name = "currentMove")]
    pub fn current_move(&self) -> u32 {
        self.machine.current_move as u32
    }

    #[wasm_bindgen(js_name = "historyLength")]
    pub fn history_length(&self) -> u32 {
        self.machine.history.len() as u32
    }

    #[wasm_bindgen(js_name = "resetGame")]
    pub fn reset_game(&mut self) {
        self.machine.reset();
    }

    pub fn summary(&self, indentation_level: usize) -> String {
        self.machine.summary(indentation_level)
    }
}

#[wasm_bindgen(js_name = "newGame")]
pub fn new_game() -> GameHandle {
    GameHandle::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_forwards_moves_and_jumps() {
        let mut handle = new_game();
        for cell_index in [0, 3, 1, 4, 2] {
            handle.apply_move(cell_index);
        }

        assert!(handle.has_winner());
        assert_eq!(handle.winner(), "X");
        assert_eq!(handle.status_text(), "Winner: X");
        assert_eq!(handle.history_length(), 6);

        handle.jump_to(2);
        assert_eq!(handle.current_move(), 2);
        assert_eq!(handle.active_player(), "X");
        assert!(!handle.has_winner());
        assert_eq!(handle.winner(), "");
    }

    #[test]
    fn negative_indices_are_ignored() {
        let mut handle = GameHandle::new();
        handle.apply_move(-1);
        handle.jump_to(-5);

        assert_eq!(handle.history_length(), 1);
        assert_eq!(handle.current_move(), 0);
        assert_eq!(handle.validate_move(-1), "cell -1 is not on the board");
    }

    #[test]
    fn validate_move_explains_rejections() {
        let mut handle = GameHandle::new();
        assert_eq!(handle.validate_move(4), "");

        handle.apply_move(4);
        assert_eq!(handle.validate_move(4), "cell 4 is already taken by X");
        assert_eq!(handle.validate_move(9), "cell 9 is not on the board");
    }

    #[test]
    fn view_json_snapshot_after_one_move() {
        let mut handle = GameHandle::new();
        handle.apply_move(8);

        assert_eq!(
            handle.view_json(),
            concat!(
                r#"{"board":[null,null,null,null,null,null,null,null,"X"],"#,
                r#""activePlayer":"O","outcome":{"state":"inProgress"},"#,
                r#""moveList":["Go to game start","Go to move #1"],"#,
                r#""currentMove":1,"status":"Next player: O"}"#
            )
        );
    }

    #[test]
    fn reset_game_starts_over() {
        let mut handle = GameHandle::new();
        handle.apply_move(0);
        handle.apply_move(1);
        handle.reset_game();

        assert_eq!(handle.history_length(), 1);
        assert_eq!(handle.summary(0).lines().next(), Some("Move 0 of 0, Next player: X"));
    }
}
