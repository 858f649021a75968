//! Player identification and per-player data storage.
//!
//! ## Player
//!
//! The two sides of a Contrast game. Player one starts on the bottom row and
//! races to the top row; player two does the opposite.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `Player`, used for tile stocks and
//! per-player rewards.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::board::BOARD_SIZE;

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    /// Moves first, home row is the bottom row (`y = 4`). Arena symbol `X`.
    One,
    /// Moves second, home row is the top row (`y = 0`). Arena symbol `O`.
    Two,
}

impl Player {
    /// Both players in turn order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// The other player.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Zero-based index (0 for player one, 1 for player two).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Row this player's pieces start on.
    #[must_use]
    pub const fn home_row(self) -> usize {
        match self {
            Player::One => BOARD_SIZE - 1,
            Player::Two => 0,
        }
    }

    /// Row that wins the game when one of this player's pieces reaches it.
    #[must_use]
    pub const fn goal_row(self) -> usize {
        self.opponent().home_row()
    }

    /// Single-letter symbol used by the arena protocol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }

    /// Parse an arena symbol (`X` or `O`, case-insensitive).
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'X' => Some(Player::One),
            'O' => Some(Player::Two),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use contrast_zero::core::{Player, PlayerMap};
///
/// let mut stock: PlayerMap<u8> = PlayerMap::with_value(3);
/// stock[Player::Two] -= 1;
///
/// assert_eq!(stock[Player::One], 3);
/// assert_eq!(stock[Player::Two], 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(Player) -> T) -> Self {
        Self {
            data: [factory(Player::One), factory(Player::Two)],
        }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: Player) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: Player) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (Player, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        Player::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Player> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PlayerMap<T> {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_basics() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
        assert_eq!(Player::One.index(), 0);
        assert_eq!(Player::Two.index(), 1);
        assert_eq!(format!("{}", Player::Two), "Player 2");
    }

    #[test]
    fn test_rows() {
        assert_eq!(Player::One.home_row(), 4);
        assert_eq!(Player::One.goal_row(), 0);
        assert_eq!(Player::Two.home_row(), 0);
        assert_eq!(Player::Two.goal_row(), 4);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Player::from_symbol('x'), Some(Player::One));
        assert_eq!(Player::from_symbol('O'), Some(Player::Two));
        assert_eq!(Player::from_symbol('-'), None);
        assert_eq!(Player::One.symbol(), 'X');
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<usize> = PlayerMap::new(|p| p.index() * 10);

        assert_eq!(map[Player::One], 0);
        assert_eq!(map[Player::Two], 10);
    }

    #[test]
    fn test_player_map_mutation_and_iter() {
        let mut map: PlayerMap<i32> = PlayerMap::with_value(0);
        map[Player::Two] = 7;

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Player::One, &0), (Player::Two, &7)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
