//! `STATE` block parsing.
//!
//! A block is a run of `key=value` lines between `STATE` and `END`:
//!
//! | key       | value                                     |
//! |-----------|-------------------------------------------|
//! | `turn`    | `X` or `O` (first character, any case)    |
//! | `status`  | `ongoing`, `x_win`, `o_win`, `draw`, ...  |
//! | `last`    | last move text, opaque                    |
//! | `pieces`  | `a1:x,b1:x,...`                           |
//! | `tiles`   | `c3:b,d4:g,...` (cells not listed are white) |
//! | `stock_b` | `X:3,O:2`                                 |
//! | `stock_g` | `X:1,O:0`                                 |
//!
//! Unknown keys and lines without `=` are ignored. Malformed entries are
//! skipped with a warning rather than failing the whole block.

use tracing::warn;

use crate::core::{Board, History, Outcome, Piece, Player, PlayerMap, Square, Stock, Tile};

/// Game status as reported by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Ongoing,
    Won(Player),
    Draw,
    /// Any other marker. The game is over without a known result.
    Other(String),
}

impl GameStatus {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text == "ongoing" {
            return GameStatus::Ongoing;
        }
        match text.to_ascii_lowercase().as_str() {
            "x_win" | "xwin" => GameStatus::Won(Player::One),
            "o_win" | "owin" => GameStatus::Won(Player::Two),
            "draw" => GameStatus::Draw,
            _ => GameStatus::Other(text.to_string()),
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    /// Board outcome for this status. Unknown markers count as a draw.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self {
            GameStatus::Ongoing => Outcome::Ongoing,
            GameStatus::Won(player) => Outcome::Winner(*player),
            GameStatus::Draw | GameStatus::Other(_) => Outcome::Draw,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Won(player) => write!(f, "{}_win", player.symbol()),
            GameStatus::Draw => write!(f, "draw"),
            GameStatus::Other(text) => write!(f, "{text}"),
        }
    }
}

/// Parsed contents of one `STATE` block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Side to move. Anything but `X` reads as player two.
    pub turn: Player,

    pub status: GameStatus,

    /// Raw `last` value, empty before the first move.
    pub last_move: String,

    /// Occupied squares. Later entries for a square override earlier ones.
    pub pieces: Vec<(Square, Player)>,

    /// Non-default tiles. Later entries for a square override earlier ones.
    pub tiles: Vec<(Square, Tile)>,

    /// Reported black stock, `None` where the server sent nothing.
    pub stock_black: PlayerMap<Option<u8>>,

    /// Reported gray stock, `None` where the server sent nothing.
    pub stock_gray: PlayerMap<Option<u8>>,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            turn: Player::One,
            status: GameStatus::Ongoing,
            last_move: String::new(),
            pieces: Vec::new(),
            tiles: Vec::new(),
            stock_black: PlayerMap::with_value(None),
            stock_gray: PlayerMap::with_value(None),
        }
    }
}

impl StateSnapshot {
    /// Parse the lines of a block, without the `STATE`/`END` markers.
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut snapshot = Self::default();

        for line in lines {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "turn" => {
                    if let Some(first) = value.chars().next() {
                        snapshot.turn = Player::from_symbol(first).unwrap_or(Player::Two);
                    }
                }
                "status" => snapshot.status = GameStatus::parse(value),
                "last" => snapshot.last_move = value.to_string(),
                "pieces" => snapshot.pieces = parse_pieces(value),
                "tiles" => snapshot.tiles = parse_tiles(value),
                "stock_b" => snapshot.stock_black = parse_counts(value),
                "stock_g" => snapshot.stock_gray = parse_counts(value),
                _ => {}
            }
        }

        snapshot
    }

    /// Rebuild the full position.
    ///
    /// `history` holds earlier positions newest first; the rebuilt board's
    /// history is this position followed by them. Stock the server did not
    /// report falls back to the initial stock.
    #[must_use]
    pub fn to_board(&self, move_count: u32, history: &History) -> Board {
        let mut board = Board::empty();

        for &(square, player) in &self.pieces {
            board.set_piece(square, Piece::Owned(player));
        }
        for &(square, tile) in &self.tiles {
            board.set_tile(square, tile);
        }
        for player in Player::ALL {
            let stock = Stock {
                black: self.stock_black[player].unwrap_or(Stock::INITIAL.black),
                gray: self.stock_gray[player].unwrap_or(Stock::INITIAL.gray),
            };
            board.set_stock(player, stock);
        }

        board.set_to_move(self.turn);
        board.set_move_count(move_count);
        board.set_outcome(self.status.outcome());

        let mut frames = history.clone();
        frames.push(board.snapshot());
        board.set_history(frames);
        board
    }
}

// =============================================================================
// Entry lists
// =============================================================================

/// Split `k:v,k:v` into trimmed pairs, skipping items without `:`.
fn entries(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.split(',').filter_map(|item| {
        let (key, value) = item.split_once(':')?;
        Some((key.trim(), value.trim()))
    })
}

/// Player for a one-letter `X`/`O` token.
pub(crate) fn symbol_player(token: &str) -> Option<Player> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Player::from_symbol(symbol),
        _ => None,
    }
}

fn parse_pieces(text: &str) -> Vec<(Square, Player)> {
    entries(text)
        .filter_map(|(coord, symbol)| {
            let square = match Square::from_coord(coord) {
                Ok(square) => square,
                Err(err) => {
                    warn!("Skipping piece entry: {err}");
                    return None;
                }
            };
            symbol_player(symbol).map(|player| (square, player))
        })
        .collect()
}

fn parse_tiles(text: &str) -> Vec<(Square, Tile)> {
    entries(text)
        .filter_map(|(coord, color)| {
            let square = match Square::from_coord(coord) {
                Ok(square) => square,
                Err(err) => {
                    warn!("Skipping tile entry: {err}");
                    return None;
                }
            };
            let tile = match color.to_ascii_lowercase().as_str() {
                "b" => Tile::Black,
                "g" => Tile::Gray,
                _ => Tile::White,
            };
            Some((square, tile))
        })
        .collect()
}

fn parse_counts(text: &str) -> PlayerMap<Option<u8>> {
    let mut counts = PlayerMap::with_value(None);
    for (role, value) in entries(text) {
        let Ok(count) = value.parse::<u8>() else {
            warn!("Skipping stock entry {role}:{value}");
            continue;
        };
        if let Some(player) = symbol_player(role) {
            counts[player] = Some(count);
        }
    }
    counts
}
