//! Countdown: an N-player take-away game.
//!
//! Players take turns removing one or two tokens from a shared pile. Whoever
//! takes the last token wins. The pile only shrinks, so every game ends.
//! With more than two players the search cannot rely on simple value
//! negation between plies, which makes this a check on resolver-based backup.

use serde::Serialize;
use std::fmt;
use zero_core::{Game, Outcome};

/// Countdown position.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct CountdownState {
    tokens: u8,
    to_move: u8,
}

impl CountdownState {
    pub fn new(tokens: u8, to_move: u8) -> Self {
        Self { tokens, to_move }
    }

    /// Tokens left on the pile.
    pub fn tokens(&self) -> u8 {
        self.tokens
    }
}

impl fmt::Display for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tokens, player {} to move", self.tokens, self.to_move)
    }
}

/// Countdown with a fixed number of players and starting pile.
#[derive(Clone, Debug)]
pub struct Countdown {
    players: u8,
    tokens: u8,
}

impl Countdown {
    /// Create a game for `players` players (at least 2) starting at `tokens`.
    pub fn new(players: u8, tokens: u8) -> Self {
        Self {
            players: players.max(2),
            tokens,
        }
    }

    pub fn players(&self) -> u8 {
        self.players
    }
}

impl Game for Countdown {
    type State = CountdownState;
    type Action = u8; // number of tokens taken: 1 or 2
    type Player = u8;

    fn initial_state(&self) -> Self::State {
        CountdownState::new(self.tokens, 0)
    }

    fn player_to_move(&self, state: &Self::State) -> Self::Player {
        state.to_move
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        (1..=2).filter(|take| *take <= state.tokens).collect()
    }

    fn apply_action(&self, state: &Self::State, action: Self::Action) -> Self::State {
        CountdownState {
            tokens: state.tokens.saturating_sub(action),
            to_move: (state.to_move + 1) % self.players,
        }
    }

    fn terminal_result(&self, state: &Self::State) -> Option<Outcome<Self::Player>> {
        // The previous player took the last token.
        let previous = state.to_move.checked_sub(1).unwrap_or(self.players - 1);
        (state.tokens == 0).then_some(Outcome::Win(previous))
    }

    fn action_to_index(&self, action: Self::Action) -> usize {
        (action - 1) as usize
    }

    fn index_to_action(&self, index: usize) -> Option<Self::Action> {
        (index < 2).then_some(index as u8 + 1)
    }

    fn num_actions(&self) -> usize {
        2
    }
}
