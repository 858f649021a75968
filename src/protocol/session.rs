//! Client-side session state machine.
//!
//! `ArenaSession` consumes server text, either as raw chunks (`feed`) or
//! as complete lines (`handle_line`), and turns it into `SessionEvent`s.
//! It tracks the bot's role, counts moves from changes of the `last` key
//! and keeps the recent positions so a rebuilt `Board` carries the same
//! history planes as a locally played game.

use tracing::{error, info};

use crate::core::{Board, History, Player};

use super::snapshot::{GameStatus, StateSnapshot};

/// Something the driver may need to act on.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// An `INFO` line, without the prefix.
    Info(String),

    /// An `ERROR` line, without the prefix.
    Error(String),

    /// A snapshot with a finished game.
    GameOver(GameStatus),

    /// A running position with the opponent to move.
    Waiting(Board),

    /// A running position with this client to move.
    ToMove(Board),
}

/// Line buffering and game tracking for one server connection.
#[derive(Clone, Debug, Default)]
pub struct ArenaSession {
    /// Bytes received after the last newline.
    pending: String,

    /// Inside a `STATE` block.
    collecting: bool,
    block: Vec<String>,

    role: Option<Player>,
    awaiting_response: bool,
    last_status: Option<GameStatus>,
    last_move: Option<String>,
    move_count: u32,

    /// Positions seen so far, newest first.
    history: History,
}

impl ArenaSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a known role instead of waiting for the server to say.
    #[must_use]
    pub fn with_role(mut self, role: Player) -> Self {
        self.role = Some(role);
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn role(&self) -> Option<Player> {
        self.role
    }

    /// Moves observed through `last` changes.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// A `MOVE` was sent and no snapshot or error has answered it yet.
    #[must_use]
    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    #[must_use]
    pub fn last_status(&self) -> Option<&GameStatus> {
        self.last_status.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Record that a `MOVE` line went out.
    pub fn mark_move_sent(&mut self) {
        self.awaiting_response = true;
    }

    // === Input ===

    /// Append raw text and handle every complete line in it.
    ///
    /// A trailing partial line is kept until the next call.
    pub fn feed(&mut self, chunk: &str) -> Vec<SessionEvent> {
        self.pending.push_str(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            if let Some(event) = self.handle_line(&line[..pos]) {
                events.push(event);
            }
        }
        events
    }

    /// Handle one line, with or without its line terminator.
    pub fn handle_line(&mut self, line: &str) -> Option<SessionEvent> {
        let line = line.trim_end_matches(['\n', '\r']);

        if self.collecting {
            if line == "END" {
                self.collecting = false;
                let snapshot = StateSnapshot::parse(self.block.iter().map(String::as_str));
                self.block.clear();
                return Some(self.handle_snapshot(snapshot));
            }
            self.block.push(line.to_string());
            return None;
        }

        if line == "STATE" {
            self.collecting = true;
            self.block.clear();
            return None;
        }

        if let Some(text) = line.strip_prefix("INFO ") {
            info!("{line}");
            if let Some(role) = announced_role(text) {
                self.role = Some(role);
            }
            Some(SessionEvent::Info(text.to_string()))
        } else if let Some(text) = line.strip_prefix("ERROR ") {
            error!("{line}");
            self.awaiting_response = false;
            Some(SessionEvent::Error(text.to_string()))
        } else {
            if !line.is_empty() {
                info!("{line}");
            }
            None
        }
    }

    fn handle_snapshot(&mut self, snapshot: StateSnapshot) -> SessionEvent {
        self.awaiting_response = false;
        self.last_status = Some(snapshot.status.clone());

        if !snapshot.last_move.is_empty()
            && self.last_move.as_deref() != Some(snapshot.last_move.as_str())
        {
            self.move_count += 1;
            self.last_move = Some(snapshot.last_move.clone());
        }

        if snapshot.status.is_over() {
            info!("Game finished: {}", snapshot.status);
            return SessionEvent::GameOver(snapshot.status);
        }

        let role = *self.role.get_or_insert(snapshot.turn);
        let board = snapshot.to_board(self.move_count, &self.history);
        self.history.push(board.snapshot());

        if snapshot.turn == role {
            SessionEvent::ToMove(board)
        } else {
            SessionEvent::Waiting(board)
        }
    }
}

/// Role from an `INFO You are X ...` line.
fn announced_role(text: &str) -> Option<Player> {
    let (_, rest) = text.split_once("You are")?;
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }
    let symbol = trimmed.chars().next().filter(char::is_ascii_uppercase)?;
    Player::from_symbol(symbol)
}
