//! Core domain types for Connect Four.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Player {
    /// The human at the keyboard (moves first).
    Human,
    /// The external move source.
    Ai,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Ai,
            Player::Ai => Player::Human,
        }
    }

    /// Numeric token used when the board is serialized.
    pub fn token(self) -> u8 {
        match self {
            Player::Human => 1,
            Player::Ai => 2,
        }
    }

    /// Inverse of [`Player::token`].
    pub fn from_token(token: u8) -> Option<Self> {
        match token {
            1 => Some(Player::Human),
            2 => Some(Player::Ai),
            _ => None,
        }
    }

    /// Single character used in board pictures.
    pub fn symbol(self) -> char {
        match self {
            Player::Human => 'X',
            Player::Ai => 'O',
        }
    }

    /// Inverse of [`Player::symbol`], case-insensitive.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'X' => Some(Player::Human),
            'O' => Some(Player::Ai),
            _ => None,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nothing dropped here yet.
    #[default]
    Empty,
    /// Cell holding a player's piece.
    Occupied(Player),
}

impl Cell {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    /// Returns true if nothing occupies this cell.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Picture character: `.` for empty, otherwise the player's symbol.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(player) => player.symbol(),
        }
    }
}

// Cells go over the wire as `null` or the player's numeric token.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Occupied(player) => serializer.serialize_some(&player.token()),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<u8>::deserialize(deserializer)? {
            None => Ok(Cell::Empty),
            Some(token) => Player::from_token(token)
                .map(Cell::Occupied)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown player token {token}"))),
        }
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Game is ongoing.
    InProgress,
    /// Game ended with four in a row.
    Won(Player),
    /// Board filled up with no winner.
    Draw,
}

impl GameOutcome {
    /// Returns true once the game has a result.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::Won(player) => Some(*player),
            GameOutcome::InProgress | GameOutcome::Draw => None,
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::Won(player) => write!(f, "{player} wins"),
            GameOutcome::Draw => write!(f, "Draw"),
        }
    }
}
