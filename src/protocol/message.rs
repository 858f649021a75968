//! Client-to-server messages.
//!
//! ```text
//! ROLE <X|O|spectator|-> <name> <model>
//! MOVE <origin>,<target> <-1 | <square><b|g>>
//! GET_STATE
//! ```

use std::fmt;

use crate::core::{Action, Placement, Player, Square};

use super::snapshot::symbol_player;
use super::ProtocolError;

/// Seat requested in the `ROLE` handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleRequest {
    Player(Player),
    Spectator,
    /// Let the server pick.
    Any,
}

impl RoleRequest {
    /// Parse a role token, case-insensitively: `X`, `O`, `spectator`
    /// (or `spec`), `-`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.to_ascii_uppercase().as_str() {
            "-" => Some(RoleRequest::Any),
            "SPECTATOR" | "SPEC" => Some(RoleRequest::Spectator),
            _ => symbol_player(text).map(RoleRequest::Player),
        }
    }
}

impl fmt::Display for RoleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRequest::Player(player) => write!(f, "{}", player.symbol()),
            RoleRequest::Spectator => write!(f, "spectator"),
            RoleRequest::Any => write!(f, "-"),
        }
    }
}

/// A line sent by the client. `Display` renders it without the newline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    Role {
        role: RoleRequest,
        name: String,
        model: String,
    },
    Move(Action),
    GetState,
}

impl ClientMessage {
    /// The message with its trailing newline, ready to write to the socket.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientMessage::Role { role, name, model } => {
                let name = if name.is_empty() { "-" } else { name };
                write!(f, "ROLE {role} {name} {model}")
            }
            ClientMessage::Move(action) => write!(f, "MOVE {}", format_move_text(*action)),
            ClientMessage::GetState => write!(f, "GET_STATE"),
        }
    }
}

/// Render the payload of a `MOVE` line, e.g. `a1,a2 c3g` or `b1,b2 -1`.
#[must_use]
pub fn format_move_text(action: Action) -> String {
    let tile = match action.placement() {
        Placement::None => "-1".to_string(),
        Placement::Black(square) => format!("{}b", square.to_coord()),
        Placement::Gray(square) => format!("{}g", square.to_coord()),
    };
    format!("{},{} {}", action.from().to_coord(), action.to().to_coord(), tile)
}

/// Parse the payload of a `MOVE` line back into an action.
///
/// Only the notation is checked; legality is up to the rules.
pub fn parse_move_text(text: &str) -> Result<Action, ProtocolError> {
    let invalid = || ProtocolError::InvalidMove(text.to_string());

    let mut words = text.split_whitespace();
    let (Some(squares), Some(tile), None) = (words.next(), words.next(), words.next()) else {
        return Err(invalid());
    };
    let (origin, target) = squares.split_once(',').ok_or_else(invalid)?;
    let from = Square::from_coord(origin)?;
    let to = Square::from_coord(target)?;

    let placement = if tile == "-1" {
        Placement::None
    } else {
        if !tile.is_ascii() || tile.len() != 3 {
            return Err(invalid());
        }
        let (cell, color) = tile.split_at(2);
        let square = Square::from_coord(cell)?;
        match color {
            "b" => Placement::Black(square),
            "g" => Placement::Gray(square),
            _ => return Err(invalid()),
        }
    };

    Ok(Action::from_parts(from, to, placement))
}
