use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};
use tic_tac_toe_rust::core::{
    game_state_machine::GameStateMachine,
    outcome::Outcome,
    player::Player,
    rule_helper,
};

pub struct Session<W: Write> {
    out: W,
    game: GameStateMachine,
    use_color: bool,
    should_quit: bool,
}

impl<W: Write> Session<W> {
    pub fn new(out: W, use_color: bool) -> Self {
        Self {
            out,
            game: GameStateMachine::new(),
            use_color,
            should_quit: false,
        }
    }

    pub fn start(&mut self) -> io::Result<()> {
        self.print_game()
    }

    pub fn interpretation_loop(&mut self, mut input: impl BufRead) -> io::Result<()> {
        loop {
            let prompt = self.user_prompt_text();
            write!(self.out, "{prompt}")?;
            self.out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            self.run_line(line.trim_end_matches(['\r', '\n']))?;
            if self.should_quit {
                return Ok(());
            }
        }
    }

    pub fn run_line(&mut self, line: &str) -> io::Result<()> {
        for subline in line.split(';') {
            self.interpret_directive(subline)?;
            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn without_comments(directive: &str) -> String {
        let mut working = directive.to_string();
        while let Some(start_idx) = working.find('(') {
            if let Some(end_rel) = working[start_idx..].find(')') {
                let end_idx = start_idx + end_rel;
                working.replace_range(start_idx..=end_idx, "");
            } else {
                working.truncate(start_idx);
                break;
            }
        }
        working
    }

    fn interpret_directive(&mut self, directive: &str) -> io::Result<()> {
        const TAG_QUIT: &str = "q";
        const TAG_DISPLAY: &str = "d";
        const TAG_RESET: &str = "r";
        const TAG_REPEAT: &str = "x";
        const TAG_HISTORY: &str = "h";
        const TAG_UNDO: &str = "u";
        const TAG_LATEST: &str = "l";
        const TAG_JUMP: &str = "j";
        const TAG_JUMP_LONG: &str = "jump";
        const MAX_REPEATS: usize = rule_helper::BOARD_CELL_COUNT * 4;

        let directive = Self::without_comments(directive);
        let tokens = directive.split_whitespace().collect::<Vec<_>>();
        let Some(directive_tag) = tokens.first().map(|token| token.to_lowercase()) else {
            return Ok(());
        };

        if directive_tag == TAG_QUIT {
            self.should_quit = true;
        } else if directive_tag == TAG_DISPLAY {
            self.print_game()?;
        } else if directive_tag == TAG_RESET {
            writeln!(self.out, "(RESET)")?;
            self.game.reset();
            self.print_game()?;
        } else if directive_tag == TAG_UNDO {
            writeln!(self.out, "(UNDO)")?;
            match self.game.current_move.checked_sub(1) {
                Some(prev_move) => self.jump(prev_move as i64)?,
                None => writeln!(self.out, "  already at game start")?,
            }
        } else if directive_tag == TAG_LATEST {
            let latest = self.game.latest_move();
            self.jump(latest as i64)?;
        } else if directive_tag == TAG_JUMP || directive_tag == TAG_JUMP_LONG {
            match tokens.get(1).map(|token| token.parse::<i64>()) {
                Some(Ok(move_index)) if tokens.len() == 2 => self.jump(move_index)?,
                _ => writeln!(self.out, "  {TAG_JUMP_LONG} directive needs one integer token")?,
            }
        } else if directive_tag == TAG_REPEAT {
            match tokens.get(1).map(|token| token.parse::<usize>()) {
                Some(Ok(num_repeats)) if tokens.len() > 2 && num_repeats <= MAX_REPEATS => {
                    let directive_text = tokens[2..].join(" ");
                    writeln!(self.out, "(REPEAT {num_repeats}: {directive_text})")?;
                    for _ in 0..num_repeats {
                        self.interpret_directive(&directive_text)?;
                        if self.should_quit {
                            break;
                        }
                    }
                }
                _ => writeln!(
                    self.out,
                    "directive {directive_tag} needs repetition count (at most {MAX_REPEATS}) and directive to repeat"
                )?,
            }
        } else if directive_tag == TAG_HISTORY {
            for move_index in 0..self.game.history.len() {
                let marker = if move_index == self.game.current_move { '>' } else { ' ' };
                writeln!(self.out, "{marker} {}", self.game.move_entry_text(move_index))?;
            }
        } else if directive_tag.starts_with(|ch: char| ch.is_ascii_digit()) {
            self.do_moves_tokens(&tokens)?;
        } else {
            let mut explanations = vec![
                "[cellIndex] [cellIndex] [...] | play cells 0-8 in order",
                "d       | display game state",
                "h       | display move list",
                "j/jump [int] | jump to move [int] of the move list",
                "l       | jump to latest move",
                "q       | quit",
                "r       | reset game",
                "u       | step back one move",
                "x [n] [cmd] | repeat [cmd] n times, n at most 36",
            ];
            explanations.sort();
            writeln!(self.out, "  unrecognized directive '{}'", directive.trim())?;
            for explanation in explanations {
                writeln!(self.out, "  {explanation}")?;
            }
        }

        Ok(())
    }

    fn jump(&mut self, move_index: i64) -> io::Result<()> {
        match self.game.try_jump_to(move_index) {
            Ok(_) => self.print_game(),
            Err(err) => writeln!(self.out, "  invalid jump: {err}"),
        }
    }

    fn do_moves_tokens(&mut self, tokens: &[&str]) -> io::Result<()> {
        let mut cell_indices = Vec::with_capacity(tokens.len());
        let mut has_parse_errors = false;

        for token in tokens {
            match token.parse::<usize>() {
                Ok(cell_index) => cell_indices.push(cell_index),
                Err(_) => {
                    writeln!(self.out, "  failed parse for cell index from '{token}'")?;
                    has_parse_errors = true;
                }
            }
        }

        if has_parse_errors {
            return Ok(());
        }

        for cell_index in cell_indices {
            if let Err(err) = self.game.try_apply_move(cell_index) {
                writeln!(self.out, "  invalid move: {err}")?;
                break;
            }
        }

        self.print_game()
    }

    fn render_mark(use_color: bool, player: Player) -> String {
        if !use_color {
            return player.mark().to_string();
        }

        match player {
            Player::X => player.mark().red().bold().to_string(),
            Player::O => player.mark().blue().bold().to_string(),
        }
    }

    fn print_game(&mut self) -> io::Result<()> {
        let use_color = self.use_color;
        let summary = self
            .game
            .state_summary("  ", |player| Self::render_mark(use_color, player));
        writeln!(self.out, "{summary}")
    }

    fn user_prompt_text(&self) -> String {
        match self.game.outcome() {
            Outcome::Won(winner) => format!("{winner} WON> "),
            Outcome::InProgress => format!("{}> ", self.game.active_player()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session() -> Session<Vec<u8>> {
        Session::new(Vec::new(), false)
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8_lossy(&session.out).into_owned()
    }

    #[test]
    fn semicolon_separated_moves_win_for_x() {
        let mut session = session();
        session.run_line("0;3;1;4;2").unwrap();

        assert_eq!(session.game.outcome(), Outcome::Won(Player::X));
        assert_eq!(session.user_prompt_text(), "X WON> ");
        assert!(output(&session).contains("Winner: X"));
    }

    #[test]
    fn several_cells_in_one_directive_stop_at_first_rejection() {
        let mut session = session();
        session.run_line("4 4 0").unwrap();

        assert_eq!(session.game.history.len(), 2);
        assert!(output(&session).contains("  invalid move: cell 4 is already taken by X"));
        assert_eq!(session.user_prompt_text(), "O> ");
    }

    #[test]
    fn parse_errors_reject_whole_directive() {
        let mut session = session();
        session.run_line("1 2x").unwrap();

        assert_eq!(session.game.history.len(), 1);
        assert!(output(&session).contains("failed parse for cell index from '2x'"));
    }

    #[test]
    fn undo_latest_and_jump_move_through_history() {
        let mut session = session();
        session.run_line("0 1 2").unwrap();

        session.run_line("x 2 u").unwrap();
        assert_eq!(session.game.current_move, 1);

        session.run_line("l").unwrap();
        assert_eq!(session.game.current_move, 3);

        session.run_line("jump 0").unwrap();
        assert_eq!(session.game.current_move, 0);

        session.run_line("u").unwrap();
        assert_eq!(session.game.current_move, 0);
        assert!(output(&session).contains("already at game start"));

        session.run_line("j 7").unwrap();
        assert_eq!(session.game.current_move, 0);
        assert!(output(&session).contains("  invalid jump: move 7 is not in the history (0..4)"));
    }

    #[test]
    fn move_after_undo_rewrites_future() {
        let mut session = session();
        session.run_line("0;1;2;j 1;4").unwrap();

        assert_eq!(session.game.history.len(), 3);
        assert_eq!(session.game.current_board().to_string(), "X...O....");
    }

    #[test]
    fn history_directive_marks_current_entry() {
        let mut session = session();
        session.run_line("4 0;u").unwrap();
        let before = output(&session).len();

        session.run_line("h (show list)").unwrap();

        assert_eq!(
            &output(&session)[before..],
            "  Go to game start\n> Go to move #1 (X@4)\n  Go to move #2 (O@0)\n"
        );
    }

    #[test]
    fn reset_and_quit() {
        let mut session = session();
        session.run_line("0 1;r;q;5").unwrap();

        assert_eq!(session.game, GameStateMachine::new());
        assert!(session.should_quit);
    }

    #[test]
    fn repeat_count_is_capped() {
        let mut session = session();
        session.run_line("x 18446744073709551615 d").unwrap();
        assert!(output(&session).contains("needs repetition count (at most 36)"));
        assert!(!output(&session).contains("(REPEAT"));

        session.run_line("x 37 u").unwrap();
        assert!(!output(&session).contains("(REPEAT"));

        session.run_line("x 36 u").unwrap();
        assert!(output(&session).contains("(REPEAT 36: u)"));
    }

    #[test]
    fn unrecognized_directive_prints_help() {
        let mut session = session();
        session.run_line("zz").unwrap();

        let text = output(&session);
        assert!(text.contains("unrecognized directive 'zz'"));
        assert!(text.contains("q       | quit"));
    }

    #[test]
    fn interpretation_loop_reads_until_quit() {
        let mut session = session();
        session
            .interpretation_loop(Cursor::new("0\n1 (O answers)\nq\n2\n"))
            .unwrap();

        assert_eq!(session.game.history.len(), 3);
        assert!(output(&session).starts_with("X> "));
    }

    #[test]
    fn colored_marks_differ_from_plain() {
        let plain = Session::<Vec<u8>>::render_mark(false, Player::X);
        let colored = Session::<Vec<u8>>::render_mark(true, Player::X);

        assert_eq!(plain, "X");
        assert_ne!(colored, plain);
        assert!(colored.contains('X'));
    }
}
