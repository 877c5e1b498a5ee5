//! Connect Four board with column-drop placement.

use super::types::{Cell, Player};
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;
use tracing::instrument;

/// Rows on a standard board.
pub const DEFAULT_ROWS: usize = 6;
/// Columns on a standard board.
pub const DEFAULT_COLS: usize = 7;
/// Pieces in a row needed to win.
pub const WIN_LENGTH: usize = 4;

/// Error building a board or placing a piece on it.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// Board would be too small or is not rectangular.
    #[display("Invalid board dimensions {rows}x{cols}")]
    InvalidDimension {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// Column index outside `0..cols`.
    #[display("Column {column} is out of range (board has {cols} columns)")]
    ColumnOutOfRange {
        /// Offending column.
        column: usize,
        /// Column count of the board.
        cols: usize,
    },

    /// The column has no empty cell left.
    #[display("Column {_0} is full")]
    ColumnFull(usize),

    /// A board picture contained something other than `.`, `X` or `O`.
    #[display("Unexpected symbol {symbol:?} on picture line {line}")]
    InvalidPicture {
        /// 1-based line within the picture.
        line: usize,
        /// The character that could not be read.
        symbol: char,
    },
}

impl std::error::Error for BoardError {}

/// Rectangular Connect Four grid.
///
/// Row 0 is the top row; pieces fall towards the highest row index.
/// Column indices are 0-based, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>")]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// Fails with [`BoardError::InvalidDimension`] when either side is
    /// shorter than a winning line.
    #[instrument]
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows < WIN_LENGTH || cols < WIN_LENGTH {
            return Err(BoardError::InvalidDimension { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        })
    }

    /// Creates an empty 6x7 board.
    pub fn standard() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cells: vec![Cell::Empty; DEFAULT_ROWS * DEFAULT_COLS],
        }
    }

    /// Builds a board from raw rows, top row first.
    ///
    /// Neither gravity nor the minimum size is enforced, so any
    /// hand-constructed position can be fed to the rules. Only empty
    /// or ragged input is rejected.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let row_count = rows.len();
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if row_count == 0 || cols == 0 || rows.iter().any(|row| row.len() != cols) {
            return Err(BoardError::InvalidDimension {
                rows: row_count,
                cols,
            });
        }
        Ok(Self {
            rows: row_count,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Gets the cell at `(row, col)`, or `None` off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// Returns the rows, top first.
    pub fn row_slices(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols)
    }

    /// Returns true if the top cell of `col` is occupied.
    ///
    /// Columns off the board report full so they are never offered as moves.
    pub fn is_column_full(&self, col: usize) -> bool {
        !matches!(self.get(0, col), Some(Cell::Empty))
    }

    /// Row a piece dropped into `col` would land on.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows)
            .rev()
            .find(|&row| matches!(self.get(row, col), Some(Cell::Empty)))
    }

    /// Columns that can still take a piece, in ascending order.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..self.cols).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Lowest-indexed column that can still take a piece.
    pub fn first_open_column(&self) -> Option<usize> {
        (0..self.cols).find(|&col| !self.is_column_full(col))
    }

    /// Returns true when every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Counts the pieces a player has on the board.
    pub fn piece_count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.player() == Some(player))
            .count()
    }

    /// Returns a new board with `player`'s piece in the lowest empty cell of `col`.
    ///
    /// `self` is left untouched.
    #[instrument(skip(self), fields(rows = self.rows, cols = self.cols))]
    pub fn drop_piece(&self, col: usize, player: Player) -> Result<Board, BoardError> {
        if col >= self.cols {
            return Err(BoardError::ColumnOutOfRange {
                column: col,
                cols: self.cols,
            });
        }
        if self.is_column_full(col) {
            return Err(BoardError::ColumnFull(col));
        }
        let row = self.landing_row(col).ok_or(BoardError::ColumnFull(col))?;

        let mut next = self.clone();
        next.cells[row * self.cols + col] = Cell::Occupied(player);
        Ok(next)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

// Serialized as an array of rows, top to bottom.
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.row_slices())
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.row_slices() {
            let line: Vec<String> = row.iter().map(|cell| cell.symbol().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        let footer: Vec<String> = (0..self.cols).map(|col| (col % 10).to_string()).collect();
        write!(f, "{}", footer.join(" "))
    }
}

/// Reads the picture produced by `Display`.
///
/// One row per line, top first; `.` is empty, `X` and `O` are pieces.
/// Whitespace and an all-digit footer line are ignored.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (idx, line) in s.lines().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.is_empty() || symbols.iter().all(char::is_ascii_digit) {
                continue;
            }
            let row = symbols
                .into_iter()
                .map(|symbol| match symbol {
                    '.' => Ok(Cell::Empty),
                    other => Player::from_symbol(other)
                        .map(Cell::Occupied)
                        .ok_or(BoardError::InvalidPicture {
                            line: idx + 1,
                            symbol: other,
                        }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(6, 7).unwrap();
        assert_eq!(board.rows(), 6);
        assert_eq!(board.cols(), 7);
        assert!(board.row_slices().flatten().all(|cell| cell.is_empty()));
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_too_small_rejected() {
        assert_eq!(
            Board::new(3, 7),
            Err(BoardError::InvalidDimension { rows: 3, cols: 7 })
        );
        assert_eq!(
            Board::new(6, 3),
            Err(BoardError::InvalidDimension { rows: 6, cols: 3 })
        );
        assert!(Board::new(4, 4).is_ok());
    }

    #[test]
    fn test_drop_lands_at_bottom_and_stacks() {
        let board = Board::standard();
        let once = board.drop_piece(2, Player::Human).unwrap();
        let twice = once.drop_piece(2, Player::Ai).unwrap();

        assert_eq!(twice.get(5, 2), Some(Cell::Occupied(Player::Human)));
        assert_eq!(twice.get(4, 2), Some(Cell::Occupied(Player::Ai)));
        assert_eq!(twice.get(3, 2), Some(Cell::Empty));
    }

    #[test]
    fn test_drop_does_not_mutate_original() {
        let board = Board::standard();
        let _ = board.drop_piece(0, Player::Human).unwrap();
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_drop_out_of_range() {
        let board = Board::standard();
        assert_eq!(
            board.drop_piece(7, Player::Human),
            Err(BoardError::ColumnOutOfRange { column: 7, cols: 7 })
        );
    }

    #[test]
    fn test_drop_full_column() {
        let mut board = Board::new(4, 4).unwrap();
        for _ in 0..4 {
            board = board.drop_piece(1, Player::Ai).unwrap();
        }
        assert!(board.is_column_full(1));
        assert_eq!(board.drop_piece(1, Player::Human), Err(BoardError::ColumnFull(1)));
        assert_eq!(board.open_columns(), vec![0, 2, 3]);
        assert_eq!(board.first_open_column(), Some(0));
    }

    #[test]
    fn test_off_board_column_reports_full() {
        let board = Board::standard();
        assert!(board.is_column_full(99));
        assert_eq!(board.landing_row(99), None);
    }

    #[test]
    fn test_picture_round_trip() {
        let picture = "\
. . . .
. . . .
. O . .
X X O .";
        let board: Board = picture.parse().unwrap();
        assert_eq!(board.get(2, 1), Some(Cell::Occupied(Player::Ai)));
        assert_eq!(board.get(3, 0), Some(Cell::Occupied(Player::Human)));
        assert_eq!(board.piece_count(Player::Human), 2);

        let reparsed: Board = board.to_string().parse().unwrap();
        assert_eq!(reparsed, board);
    }

    #[test]
    fn test_picture_rejects_unknown_symbol() {
        let result = "..\n.Z".parse::<Board>();
        assert_eq!(
            result,
            Err(BoardError::InvalidPicture { line: 2, symbol: 'Z' })
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![Cell::Empty; 4], vec![Cell::Empty; 3]];
        assert!(matches!(
            Board::from_rows(rows),
            Err(BoardError::InvalidDimension { .. })
        ));
        assert!(Board::from_rows(Vec::new()).is_err());
    }

    #[test]
    fn test_serializes_rows_top_to_bottom() {
        let board = Board::new(4, 4).unwrap().drop_piece(0, Player::Human).unwrap();
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json[3][0], serde_json::json!(1));
        assert_eq!(json[0][0], serde_json::Value::Null);
        assert_eq!(json.as_array().map(Vec::len), Some(4));

        let back: Board = serde_json::from_value(json).unwrap();
        assert_eq!(back, board);
    }
}
