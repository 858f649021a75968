//! Board model: pieces, tile overlay, tile stock, turn and history.
//!
//! ## Layout
//!
//! Cells are addressed by a row-major `Square` index `0..25` where
//! `x = index % 5` and `y = index / 5`. Row `y = 0` is the top of the board
//! (player two's home row), row `y = 4` the bottom (player one's home row).
//!
//! ## Cloning
//!
//! Search clones the board once per simulation. Everything but the history
//! is a small fixed-size array; the history lives in an `im::Vector` so the
//! clone shares its snapshots instead of copying them.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerMap};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 5;

/// Number of cells on the board.
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Number of snapshots kept for temporal feature encoding.
pub const HISTORY_LEN: usize = 8;

/// Black tiles each player starts with.
pub const INITIAL_BLACK_TILES: u8 = 3;

/// Gray tiles each player starts with.
pub const INITIAL_GRAY_TILES: u8 = 1;

/// Pieces each player owns for the whole game.
pub const PIECES_PER_PLAYER: usize = BOARD_SIZE;

// =============================================================================
// Squares
// =============================================================================

/// A cell of the board, stored as its row-major index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square(u8);

impl Square {
    /// Create a square from a row-major index, `None` if off the board.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < NUM_SQUARES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Create a square from column `x` and row `y`, `None` if off the board.
    #[must_use]
    pub const fn from_xy(x: usize, y: usize) -> Option<Self> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(Self((y * BOARD_SIZE + x) as u8))
        } else {
            None
        }
    }

    /// Row-major index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column, 0 on the left.
    #[inline]
    #[must_use]
    pub const fn x(self) -> usize {
        self.0 as usize % BOARD_SIZE
    }

    /// Row, 0 at the top.
    #[inline]
    #[must_use]
    pub const fn y(self) -> usize {
        self.0 as usize / BOARD_SIZE
    }

    /// The square one step away in direction `(dx, dy)`, `None` past an edge.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x() as i8 + dx;
        let y = self.y() as i8 + dy;
        if (0..BOARD_SIZE as i8).contains(&x) && (0..BOARD_SIZE as i8).contains(&y) {
            Self::from_xy(x as usize, y as usize)
        } else {
            None
        }
    }

    /// Iterate over every square in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES as u8).map(Square)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x(), self.y())
    }
}

// =============================================================================
// Cell contents
// =============================================================================

/// Occupant of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    #[default]
    Empty,
    Owned(Player),
}

impl Piece {
    /// Owner of the piece, if any.
    #[must_use]
    pub const fn owner(self) -> Option<Player> {
        match self {
            Piece::Empty => None,
            Piece::Owned(player) => Some(player),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Piece::Empty)
    }

    const fn code(self) -> u8 {
        match self {
            Piece::Empty => 0,
            Piece::Owned(Player::One) => 1,
            Piece::Owned(Player::Two) => 2,
        }
    }
}

/// Tile color of a cell. Determines how a piece standing on it moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Orthogonal moves.
    #[default]
    White,
    /// Diagonal moves.
    Black,
    /// Orthogonal and diagonal moves.
    Gray,
}

impl Tile {
    const fn code(self) -> u8 {
        match self {
            Tile::White => 0,
            Tile::Black => 1,
            Tile::Gray => 2,
        }
    }
}

// =============================================================================
// Tile stock
// =============================================================================

/// Unplaced tiles held by one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stock {
    pub black: u8,
    pub gray: u8,
}

impl Stock {
    /// The stock every player starts with.
    pub const INITIAL: Stock = Stock {
        black: INITIAL_BLACK_TILES,
        gray: INITIAL_GRAY_TILES,
    };

    /// Remaining tiles of a placeable color. White tiles are never held.
    #[must_use]
    pub const fn count(&self, tile: Tile) -> u8 {
        match tile {
            Tile::White => 0,
            Tile::Black => self.black,
            Tile::Gray => self.gray,
        }
    }

    /// Whether any tile at all can still be placed.
    #[must_use]
    pub const fn has_any(&self) -> bool {
        self.black > 0 || self.gray > 0
    }

    /// Remove one tile of the given color. Returns `false` if none is left.
    pub fn take(&mut self, tile: Tile) -> bool {
        let slot = match tile {
            Tile::White => return false,
            Tile::Black => &mut self.black,
            Tile::Gray => &mut self.gray,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

impl Default for Stock {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Tile stock of both players.
pub type TileStock = PlayerMap<Stock>;

// =============================================================================
// Outcome
// =============================================================================

/// Whether the game is still running and who won.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Ongoing,
    Winner(Player),
    Draw,
}

impl Outcome {
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(player),
            _ => None,
        }
    }

    /// Final reward from `player`'s point of view: +1 win, -1 loss, 0 draw.
    /// Ongoing games score 0.
    #[must_use]
    pub fn reward_for(self, player: Player) -> f32 {
        match self {
            Outcome::Winner(winner) if winner == player => 1.0,
            Outcome::Winner(_) => -1.0,
            Outcome::Ongoing | Outcome::Draw => 0.0,
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// Immutable copy of the positional part of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    pub pieces: [Piece; NUM_SQUARES],
    pub tiles: [Tile; NUM_SQUARES],
    pub stock: TileStock,
}

/// The most recent snapshots, newest first, capped at `HISTORY_LEN`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    frames: Vector<Snapshot>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new snapshot, evicting the oldest one on overflow.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.frames.push_front(snapshot);
        if self.frames.len() > HISTORY_LEN {
            self.frames.truncate(HISTORY_LEN);
        }
    }

    /// Snapshot `age` steps back (0 = newest). Ages past the end repeat
    /// the oldest snapshot. `None` only when the history is empty.
    #[must_use]
    pub fn frame(&self, age: usize) -> Option<&Snapshot> {
        self.frames.get(age).or_else(|| self.frames.last())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.frames.iter()
    }
}

// =============================================================================
// Transposition key
// =============================================================================

/// Exact identity of a search node.
///
/// Packs pieces and tiles at four bits per cell, so two keys are equal
/// exactly when pieces, tiles, stock, side to move and move count all are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    cells: u128,
    stock: [u8; 4],
    to_move: Player,
    move_count: u32,
}

// =============================================================================
// Board
// =============================================================================

/// Complete game position.
///
/// Mutated only through the rules (`Board::step`); the setters below exist
/// for building arbitrary positions and do not enforce the piece-count
/// invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) pieces: [Piece; NUM_SQUARES],
    pub(crate) tiles: [Tile; NUM_SQUARES],
    pub(crate) stock: TileStock,
    pub(crate) to_move: Player,
    pub(crate) move_count: u32,
    pub(crate) outcome: Outcome,
    pub(crate) history: History,
}

impl Board {
    /// The starting position: player one fills the bottom row, player two
    /// the top row, every tile white, full stocks, player one to move.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        for x in 0..BOARD_SIZE {
            board.pieces[Player::One.home_row() * BOARD_SIZE + x] = Piece::Owned(Player::One);
            board.pieces[Player::Two.home_row() * BOARD_SIZE + x] = Piece::Owned(Player::Two);
        }
        board.history.push(board.snapshot());
        board
    }

    /// A board with no pieces, all-white tiles, full stocks and an empty
    /// history. Used as a base for constructed positions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pieces: [Piece::Empty; NUM_SQUARES],
            tiles: [Tile::White; NUM_SQUARES],
            stock: TileStock::with_value(Stock::INITIAL),
            to_move: Player::One,
            move_count: 0,
            outcome: Outcome::Ongoing,
            history: History::new(),
        }
    }

    // === Accessors ===

    #[inline]
    #[must_use]
    pub fn piece(&self, square: Square) -> Piece {
        self.pieces[square.index()]
    }

    #[inline]
    #[must_use]
    pub fn tile(&self, square: Square) -> Tile {
        self.tiles[square.index()]
    }

    #[must_use]
    pub fn stock(&self, player: Player) -> Stock {
        self.stock[player]
    }

    #[must_use]
    pub fn tile_stock(&self) -> &TileStock {
        &self.stock
    }

    /// Player whose turn it is.
    #[inline]
    #[must_use]
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    #[inline]
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[inline]
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_over()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Squares holding a piece of `player`, in row-major order.
    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(move |&sq| self.piece(sq) == Piece::Owned(player))
    }

    /// Copy of the positional state for the history.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: self.pieces,
            tiles: self.tiles,
            stock: self.stock,
        }
    }

    /// Transposition key of this position.
    #[must_use]
    pub fn key(&self) -> StateKey {
        let mut cells = 0u128;
        for i in 0..NUM_SQUARES {
            let code = self.pieces[i].code() | (self.tiles[i].code() << 2);
            cells |= (code as u128) << (4 * i);
        }
        let one = self.stock[Player::One];
        let two = self.stock[Player::Two];
        StateKey {
            cells,
            stock: [one.black, one.gray, two.black, two.gray],
            to_move: self.to_move,
            move_count: self.move_count,
        }
    }

    // === Position construction ===

    pub fn set_piece(&mut self, square: Square, piece: Piece) {
        self.pieces[square.index()] = piece;
    }

    pub fn set_tile(&mut self, square: Square, tile: Tile) {
        self.tiles[square.index()] = tile;
    }

    pub fn set_stock(&mut self, player: Player, stock: Stock) {
        self.stock[player] = stock;
    }

    pub fn set_to_move(&mut self, player: Player) {
        self.to_move = player;
    }

    pub fn set_move_count(&mut self, move_count: u32) {
        self.move_count = move_count;
    }

    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }

    pub fn set_history(&mut self, history: History) {
        self.history = history;
    }

    /// Restart the history from the current position alone.
    pub fn reset_history(&mut self) {
        self.history.clear();
        self.history.push(self.snapshot());
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let index = y * BOARD_SIZE + x;
                let piece = match self.pieces[index] {
                    Piece::Empty => '.',
                    Piece::Owned(player) => player.symbol(),
                };
                let tile = match self.tiles[index] {
                    Tile::White => ' ',
                    Tile::Black => 'b',
                    Tile::Gray => 'g',
                };
                write!(f, "{piece}{tile}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "to move: {}, move {}, stock X {}b/{}g O {}b/{}g",
            self.to_move.symbol(),
            self.move_count,
            self.stock[Player::One].black,
            self.stock[Player::One].gray,
            self.stock[Player::Two].black,
            self.stock[Player::Two].gray,
        )
    }
}
