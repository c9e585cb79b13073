pub const BOARD_SIDE: usize = 3;
pub const BOARD_CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

pub const GAME_START_MOVE_INDEX: usize = 0;
pub const GAME_START_LABEL: &str = "Go to game start";

// rows, then columns, then diagonals; scan order decides which line is reported
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub fn move_label(move_index: usize) -> String {
    if move_index == GAME_START_MOVE_INDEX {
        GAME_START_LABEL.to_string()
    } else {
        format!("Go to move #{move_index}")
    }
}

pub fn move_labels(history_len: usize) -> Vec<String> {
    (0..history_len).map(move_label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn move_label_matches_move_list_text() {
        assert_eq!(move_label(0), "Go to game start");
        assert_eq!(move_label(1), "Go to move #1");
        assert_eq!(move_label(9), "Go to move #9");
    }

    #[test]
    fn move_labels_cover_every_history_entry() {
        assert_eq!(
            move_labels(3),
            vec!["Go to game start", "Go to move #1", "Go to move #2"]
        );
        assert!(move_labels(0).is_empty());
    }

    #[test]
    fn win_lines_are_distinct_and_on_board() {
        let distinct = WIN_LINES
            .iter()
            .map(|line| {
                let mut sorted = *line;
                sorted.sort_unstable();
                sorted
            })
            .collect::<HashSet<_>>();
        assert_eq!(distinct.len(), WIN_LINES.len());
        assert!(WIN_LINES.iter().flatten().all(|idx| *idx < BOARD_CELL_COUNT));
    }
}
