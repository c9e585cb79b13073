use crate::core::{player::Player, rule_helper};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One square of the grid. Serializes as `null`, `"X"` or `"O"`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "Option<Player>", into = "Option<Player>")]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn occupant(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }
}

impl From<Option<Player>> for Cell {
    fn from(occupant: Option<Player>) -> Self {
        occupant.map_or(Cell::Empty, Cell::Occupied)
    }
}

impl From<Cell> for Option<Player> {
    fn from(cell: Cell) -> Self {
        cell.occupant()
    }
}

/// A 3x3 snapshot, cells in row-major order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; rule_helper::BOARD_CELL_COUNT],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell; rule_helper::BOARD_CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, cell_index: usize) -> Option<Cell> {
        self.cells.get(cell_index).copied()
    }

    pub fn is_all_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Copy of this board with `player`'s mark at `cell_index`. The caller has
    /// already checked that the index is on the board.
    pub fn with_mark(&self, cell_index: usize, player: Player) -> Self {
        let mut cells = self.cells;
        cells[cell_index] = Cell::Occupied(player);
        Self { cells }
    }

    /// Indices whose cell differs between the two boards.
    pub fn changed_cells(&self, other: &Board) -> Vec<usize> {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .positions(|(a, b)| a != b)
            .collect()
    }

    pub fn marks(&self) -> impl Iterator<Item = Option<&'static str>> + '_ {
        self.cells
            .iter()
            .map(|cell| cell.occupant().map(Player::mark))
    }

    /// Grid text with rows on separate lines. Empty cells show their index so
    /// a terminal player knows what to type.
    pub fn grid_text(&self, render_mark: impl Fn(Player) -> String) -> String {
        self.cells
            .chunks(rule_helper::BOARD_SIDE)
            .enumerate()
            .map(|(row_idx, row)| {
                row.iter()
                    .enumerate()
                    .map(|(col_idx, cell)| match cell {
                        Cell::Empty => (row_idx * rule_helper::BOARD_SIDE + col_idx).to_string(),
                        Cell::Occupied(player) => render_mark(*player),
                    })
                    .join("|")
            })
            .join("\n-+-+-\n")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .cells
            .iter()
            .map(|cell| cell.occupant().map_or(".", Player::mark))
            .join("");
        f.write_str(&text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("expected {expected} cells, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("unrecognized cell character '{0}'")]
    BadCell(char),
}

/// Parses the compact form produced by `Display`, e.g. `"XO.X.O..."`.
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let chars = text.trim().chars().collect::<Vec<_>>();
        if chars.len() != rule_helper::BOARD_CELL_COUNT {
            return Err(BoardParseError::WrongLength {
                expected: rule_helper::BOARD_CELL_COUNT,
                found: chars.len(),
            });
        }

        let mut cells = [Cell::Empty; rule_helper::BOARD_CELL_COUNT];
        for (cell, ch) in cells.iter_mut().zip(chars) {
            *cell = match ch {
                '.' | '-' | ' ' => Cell::Empty,
                'X' | 'x' => Cell::Occupied(Player::X),
                'O' | 'o' => Cell::Occupied(Player::O),
                other => return Err(BoardParseError::BadCell(other)),
            };
        }

        Ok(Self { cells })
    }
}
