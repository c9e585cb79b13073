pub mod board;
pub mod game_state_machine;
pub mod game_view;
pub mod outcome;
pub mod player;
pub mod rule_helper;
