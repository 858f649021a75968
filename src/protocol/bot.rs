//! Arena client that answers positions with MCTS.

use tracing::{error, info};

use crate::core::{Action, Board};
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::nn::Oracle;

use super::message::{format_move_text, ClientMessage, RoleRequest};
use super::session::{ArenaSession, SessionEvent};
use super::ProtocolError;

/// Default simulations per move.
pub const DEFAULT_SIMULATIONS: u32 = 100;

/// An `ArenaSession` plus a search engine.
///
/// Feed it server text; it returns the lines to send back. Socket handling
/// stays with the caller.
///
/// ## Example
///
/// ```
/// use contrast_zero::mcts::MCTSConfig;
/// use contrast_zero::nn::UniformOracle;
/// use contrast_zero::protocol::ArenaBot;
///
/// let mut bot = ArenaBot::new(UniformOracle, MCTSConfig::for_evaluation()).with_simulations(8);
/// assert_eq!(bot.handshake_line(), "ROLE - AlphaZero alphazero\n");
///
/// let state = "STATE\nturn=X\nstatus=ongoing\n\
///     pieces=a1:x,b1:x,c1:x,d1:x,e1:x,a5:o,b5:o,c5:o,d5:o,e5:o\nEND\n";
/// let replies = bot.feed(state).unwrap();
/// assert!(replies[0].starts_with("MOVE "));
/// ```
pub struct ArenaBot<O: Oracle> {
    session: ArenaSession,
    search: MCTSSearch<O>,
    simulations: u32,
    role: RoleRequest,
    name: String,
    model: String,
}

impl<O: Oracle> ArenaBot<O> {
    pub fn new(oracle: O, config: MCTSConfig) -> Self {
        Self {
            session: ArenaSession::new(),
            search: MCTSSearch::new(oracle, config),
            simulations: DEFAULT_SIMULATIONS,
            role: RoleRequest::Any,
            name: "AlphaZero".to_string(),
            model: "alphazero".to_string(),
        }
    }

    /// Set the number of simulations per move.
    #[must_use]
    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.simulations = simulations;
        self
    }

    /// Set the role requested in the handshake.
    #[must_use]
    pub fn with_role(mut self, role: RoleRequest) -> Self {
        self.role = role;
        self
    }

    /// Set the nickname reported to the server.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the model name reported to the server.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn session(&self) -> &ArenaSession {
        &self.session
    }

    #[must_use]
    pub fn search(&self) -> &MCTSSearch<O> {
        &self.search
    }

    /// The `ROLE` line to send right after connecting.
    #[must_use]
    pub fn handshake_line(&self) -> String {
        ClientMessage::Role {
            role: self.role,
            name: self.name.clone(),
            model: self.model.clone(),
        }
        .to_line()
    }

    /// Handle raw server text; returns the lines to send, in order.
    pub fn feed(&mut self, chunk: &str) -> Result<Vec<String>, ProtocolError> {
        let mut replies = Vec::new();
        for event in self.session.feed(chunk) {
            if let Some(line) = self.respond(event)? {
                replies.push(line);
            }
        }
        Ok(replies)
    }

    /// Handle one server line; returns the `MOVE` line if one is due.
    pub fn handle_line(&mut self, line: &str) -> Result<Option<String>, ProtocolError> {
        match self.session.handle_line(line) {
            Some(event) => self.respond(event),
            None => Ok(None),
        }
    }

    /// Pick the most visited action for `board`, `None` if it has no legal
    /// action.
    pub fn choose_action(&mut self, board: &Board) -> Result<Option<Action>, ProtocolError> {
        info!("Running MCTS ({} sims)...", self.simulations);
        let result = self.search.search(board, self.simulations)?;
        let Some(action) = result.best_action() else {
            return Ok(None);
        };

        info!(
            "AI action ({}): {} Q={:.3} visits={} net_root={:.3}",
            board.to_move().symbol(),
            format_move_text(action),
            result.value(action).unwrap_or(0.0),
            result.total_visits,
            result.root_value,
        );
        Ok(Some(action))
    }

    fn respond(&mut self, event: SessionEvent) -> Result<Option<String>, ProtocolError> {
        match event {
            SessionEvent::ToMove(board) => {
                let Some(action) = self.choose_action(&board)? else {
                    error!("No action available");
                    return Ok(None);
                };
                let line = ClientMessage::Move(action).to_line();
                info!("Sending move: {}", format_move_text(action));
                self.session.mark_move_sent();
                Ok(Some(line))
            }
            SessionEvent::GameOver(_) => {
                self.search.clear();
                Ok(None)
            }
            SessionEvent::Info(_) | SessionEvent::Error(_) | SessionEvent::Waiting(_) => Ok(None),
        }
    }
}
