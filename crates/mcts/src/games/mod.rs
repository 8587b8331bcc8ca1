//! Test game implementations for MCTS validation.
//!
//! Small games with known answers, used to check the search before it is
//! pointed at anything larger.

pub mod countdown;
pub mod tictactoe;

pub use countdown::{Countdown, CountdownState};
pub use tictactoe::{Player, TicTacToe, TicTacToeAction, TicTacToeState};
