use crate::core::{
    board::{Board, Cell},
    game_view::GameView,
    outcome::{Outcome, calculate_outcome},
    player::Player,
    rule_helper,
};
use thiserror::Error;
use tracing::{debug, instrument, trace};

/// Reason a move or jump request was not applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cell {cell_index} is not on the board")]
    CellOutOfRange { cell_index: usize },
    #[error("cell {cell_index} is already taken by {occupant}")]
    CellOccupied { cell_index: usize, occupant: Player },
    #[error("{winner} won already, moves not accepted")]
    GameOver { winner: Player },
    #[error("move {move_index} is not in the history (0..{history_len})")]
    MoveIndexOutOfRange { move_index: i64, history_len: usize },
}

/// History of board snapshots plus the position being viewed.
///
/// `history[0]` is always the empty board and `current_move` always indexes
/// into `history`. Both fields are readable from outside but only change
/// through the methods below.
#[derive(Clone, Debug, PartialEq, Eq)]
#[readonly::make]
pub struct GameStateMachine {
    pub history: Vec<Board>,
    pub current_move: usize,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStateMachine {
    pub fn new() -> Self {
        Self {
            history: vec![Board::empty()],
            current_move: rule_helper::GAME_START_MOVE_INDEX,
        }
    }

    pub fn reset(&mut self) {
        debug!(history_len = self.history.len(), "resetting game");
        *self = Self::new();
    }

    pub fn current_board(&self) -> &Board {
        &self.history[self.current_move]
    }

    pub fn active_player(&self) -> Player {
        Player::to_move_at(self.current_move)
    }

    pub fn outcome(&self) -> Outcome {
        calculate_outcome(self.current_board())
    }

    pub fn latest_move(&self) -> usize {
        self.history.len() - 1
    }

    pub fn is_at_latest_move(&self) -> bool {
        self.current_move == self.latest_move()
    }

    /// Cell that was filled to reach `history[move_index]`.
    pub fn cell_played_at(&self, move_index: usize) -> Option<usize> {
        let prev_idx = move_index.checked_sub(1)?;
        let board = self.history.get(move_index)?;
        board.changed_cells(&self.history[prev_idx]).first().copied()
    }

    pub fn check_move(&self, cell_index: usize) -> Result<(), TransitionError> {
        if let Outcome::Won(winner) = self.outcome() {
            return Err(TransitionError::GameOver { winner });
        }

        match self.current_board().get(cell_index) {
            None => Err(TransitionError::CellOutOfRange { cell_index }),
            Some(Cell::Occupied(occupant)) => Err(TransitionError::CellOccupied {
                cell_index,
                occupant,
            }),
            Some(Cell::Empty) => Ok(()),
        }
    }

    /// Plays the active player's mark at `cell_index`. Any snapshots after
    /// the viewed position are discarded first.
    pub fn try_apply_move(&mut self, cell_index: usize) -> Result<(), TransitionError> {
        self.check_move(cell_index)?;

        let player = self.active_player();
        let next_board = self.current_board().with_mark(cell_index, player);
        let discarded = self.latest_move() - self.current_move;

        self.history.truncate(self.current_move + 1);
        self.history.push(next_board);
        self.current_move = self.latest_move();

        trace!(
            cell_index,
            %player,
            current_move = self.current_move,
            discarded,
            "move applied"
        );
        Ok(())
    }

    /// Invalid moves are ignored.
    #[instrument(level = "trace", skip(self))]
    pub fn apply_move(&mut self, cell_index: usize) {
        if let Err(err) = self.try_apply_move(cell_index) {
            debug!(cell_index, %err, "ignoring move");
        }
    }

    pub fn try_jump_to(&mut self, move_index: i64) -> Result<usize, TransitionError> {
        let history_len = self.history.len();
        let target = usize::try_from(move_index)
            .ok()
            .filter(|idx| *idx < history_len)
            .ok_or(TransitionError::MoveIndexOutOfRange {
                move_index,
                history_len,
            })?;

        self.current_move = target;
        trace!(current_move = target, "jumped");
        Ok(target)
    }

    /// Out-of-range requests leave the viewed position where it is.
    #[instrument(level = "trace", skip(self))]
    pub fn jump_to(&mut self, move_index: i64) {
        if let Err(err) = self.try_jump_to(move_index) {
            debug!(move_index, %err, "ignoring jump");
        }
    }

    pub fn view(&self) -> GameView {
        let outcome = self.outcome();
        let active_player = self.active_player();

        GameView {
            board: *self.current_board(),
            active_player,
            outcome,
            move_list: rule_helper::move_labels(self.history.len()),
            current_move: self.current_move,
            status: GameView::status_text(outcome, active_player),
        }
    }

    /// Move list line with the mark that was played, e.g. `Go to move #2 (O@4)`.
    pub fn move_entry_text(&self, move_index: usize) -> String {
        let label = rule_helper::move_label(move_index);
        match self.cell_played_at(move_index) {
            Some(cell_index) => format!(
                "{label} ({}@{cell_index})",
                Player::to_move_at(move_index - 1)
            ),
            None => label,
        }
    }

    pub fn summary(&self, indentation_level: usize) -> String {
        self.state_summary(&" ".repeat(indentation_level), |player| {
            player.mark().to_string()
        })
    }

    pub fn state_summary(
        &self,
        leading_text: &str,
        render_mark: impl Fn(Player) -> String,
    ) -> String {
        let mut sb = format!(
            "{leading_text}Move {} of {}, {}",
            self.current_move,
            self.latest_move(),
            GameView::status_text(self.outcome(), self.active_player())
        );

        for line in self.current_board().grid_text(render_mark).lines() {
            sb.push_str(&format!("\n{leading_text}  {line}"));
        }

        for move_index in 0..self.history.len() {
            let marker = if move_index == self.current_move { '>' } else { ' ' };
            sb.push_str(&format!(
                "\n{leading_text}{marker} {}",
                self.move_entry_text(move_index)
            ));
        }

        sb
    }
}
