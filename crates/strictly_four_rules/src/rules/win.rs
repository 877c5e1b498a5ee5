//! Win detection logic for Connect Four.

use crate::{Board, Cell, Player, WIN_LENGTH};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Direction a line of four runs in, from its first cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Along the row, left to right.
    Right,
    /// Down the column.
    Down,
    /// Diagonal towards the bottom right.
    DownRight,
    /// Diagonal towards the top right.
    UpRight,
}

impl Direction {
    /// Scan order used by [`find_winning_line`].
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::DownRight,
        Direction::UpRight,
    ];

    /// Row and column step for one cell along this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::UpRight => (-1, 1),
        }
    }
}

/// A four-in-a-row found on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine {
    /// Owner of the line.
    pub player: Player,
    /// `(row, col)` of the first cell.
    pub start: (usize, usize),
    /// Direction the line runs from `start`.
    pub direction: Direction,
}

impl WinningLine {
    /// All cells of the line, starting at `start`.
    pub fn cells(&self) -> Vec<(usize, usize)> {
        (0..WIN_LENGTH)
            .filter_map(|step| offset(self.start, self.direction, step))
            .collect()
    }
}

fn offset(start: (usize, usize), direction: Direction, step: usize) -> Option<(usize, usize)> {
    let (dr, dc) = direction.delta();
    let step = isize::try_from(step).ok()?;
    let row = start.0.checked_add_signed(dr * step)?;
    let col = start.1.checked_add_signed(dc * step)?;
    Some((row, col))
}

/// Owner of the line of four starting at `start`, if there is one.
fn line_owner(board: &Board, start: (usize, usize), direction: Direction) -> Option<Player> {
    let Some(Cell::Occupied(player)) = board.get(start.0, start.1) else {
        return None;
    };
    let complete = (1..WIN_LENGTH).all(|step| {
        offset(start, direction, step)
            .and_then(|(row, col)| board.get(row, col))
            == Some(Cell::Occupied(player))
    });
    complete.then_some(player)
}

/// Finds the first four-in-a-row on the board.
///
/// Cells are scanned in row-major order and, for each cell, directions
/// in [`Direction::ALL`] order. The first complete line wins, which
/// keeps hand-built boards with several lines reproducible.
#[instrument(skip(board), fields(rows = board.rows(), cols = board.cols()))]
pub fn find_winning_line(board: &Board) -> Option<WinningLine> {
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            for direction in Direction::ALL {
                if let Some(player) = line_owner(board, (row, col), direction) {
                    return Some(WinningLine {
                        player,
                        start: (row, col),
                        direction,
                    });
                }
            }
        }
    }
    None
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player has four in a row,
/// `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Player> {
    find_winning_line(board).map(|line| line.player)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(picture: &str) -> Board {
        picture.parse().unwrap()
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::standard()), None);
    }

    #[test]
    fn test_horizontal() {
        let b = board(
            "\
.......
.......
.......
.......
.......
.XXXX..",
        );
        let line = find_winning_line(&b).unwrap();
        assert_eq!(line.player, Player::Human);
        assert_eq!(line.start, (5, 1));
        assert_eq!(line.direction, Direction::Right);
    }

    #[test]
    fn test_vertical() {
        let b = board(
            "\
.......
.......
......O
......O
......O
X.X...O",
        );
        let line = find_winning_line(&b).unwrap();
        assert_eq!(line.player, Player::Ai);
        assert_eq!(line.direction, Direction::Down);
        assert_eq!(line.cells(), vec![(2, 6), (3, 6), (4, 6), (5, 6)]);
    }

    #[test]
    fn test_down_right_diagonal() {
        let b = board(
            "\
.......
.......
X......
OX.....
OOX....
OXOX...",
        );
        let line = find_winning_line(&b).unwrap();
        assert_eq!(line.player, Player::Human);
        assert_eq!(line.start, (2, 0));
        assert_eq!(line.direction, Direction::DownRight);
    }

    #[test]
    fn test_up_right_diagonal() {
        let b = board(
            "\
.......
.......
......O
.....OX
....OXX
...OXXX",
        );
        let line = find_winning_line(&b).unwrap();
        assert_eq!(line.player, Player::Ai);
        assert_eq!(line.start, (5, 3));
        assert_eq!(line.direction, Direction::UpRight);
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let b = board(
            "\
.......
.......
.......
O......
O.....X
OXX..X.",
        );
        assert_eq!(check_winner(&b), None);
    }

    #[test]
    fn test_first_line_in_scan_order_wins() {
        // Both players have a line; the row-major scan meets O's first.
        let b = board(
            "\
OOOO
....
....
XXXX",
        );
        assert_eq!(check_winner(&b), Some(Player::Ai));
    }

    #[test]
    fn test_small_boards_do_not_panic() {
        let b = board(
            "\
XXX
XXX
XXX",
        );
        assert_eq!(check_winner(&b), None);

        let wide = board("XXXX");
        assert_eq!(check_winner(&wide), Some(Player::Human));

        let single = board("O");
        assert_eq!(check_winner(&single), None);
    }
}
